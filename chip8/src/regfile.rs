use std::fmt;
use std::ops::{Index, IndexMut};

use crate::instruction::Reg;

/// General purpose registers V0..VF. VF doubles as the flag register.
pub struct RegFile {
    gpr: [u8; 16],
}

impl RegFile {
    pub fn new() -> RegFile {
        RegFile { gpr: [0; 16] }
    }

    pub fn read_at_index(&self, index: usize) -> u8 {
        self.gpr[index]
    }

    pub fn write_at_index(&mut self, index: usize, value: u8) {
        self.gpr[index] = value;
    }

    /// Writes a flag value (0 or 1) into VF.
    pub fn set_flag(&mut self, flag: bool) {
        self[Reg::Vf] = flag as u8;
    }
}

impl Index<Reg> for RegFile {
    type Output = u8;

    fn index(&self, index: Reg) -> &u8 {
        &self.gpr[index.index() as usize]
    }
}

impl IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, index: Reg) -> &mut u8 {
        &mut self.gpr[index.index() as usize]
    }
}

impl fmt::Debug for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(
                self.gpr
                    .iter()
                    .enumerate()
                    .map(|(i, value)| (format!("V{:X}", i), format!("{:02x}", value))),
            )
            .finish()
    }
}
