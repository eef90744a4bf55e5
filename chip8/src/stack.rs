use std::fmt;

use crate::ErrorKind;

pub const STACK_DEPTH: usize = 16;

/// Return-address stack. `sp` is the number of frames in use.
pub struct Stack {
    sp: usize,
    frames: [u16; STACK_DEPTH],
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            sp: 0,
            frames: [0; STACK_DEPTH],
        }
    }

    pub fn pop(&mut self) -> crate::Result<u16> {
        if self.sp == 0 {
            bail!(ErrorKind::StackUnderflow);
        }

        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn push(&mut self, value: u16) -> crate::Result<()> {
        if self.sp == STACK_DEPTH {
            bail!(ErrorKind::StackOverflow);
        }

        self.frames[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frames: Vec<String> = self.frames[..self.sp]
            .iter()
            .map(|frame| format!("{:03x}", frame))
            .collect();

        f.debug_struct("Stack")
            .field("sp", &self.sp)
            .field("frames", &frames)
            .finish()
    }
}
