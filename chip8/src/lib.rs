// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate enum_primitive;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

mod keypad;
mod regfile;
mod stack;
mod timer;
mod vm;

pub mod display;
pub mod instruction;

pub use self::instruction::Reg;
pub use self::vm::{Chip8, Mode, FONT_BASE, MEMORY_SIZE, PROGRAM_SPACE, PROGRAM_START};

error_chain! {
    links {
        Instruction(instruction::Error, instruction::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        StackUnderflow {
            description("stack underflow")
            display("return with an empty call stack")
        }
        StackOverflow {
            description("stack overflow")
            display("call with all {} stack frames in use", stack::STACK_DEPTH)
        }
        RomTooLarge(len: usize) {
            description("rom too large")
            display("rom of {} bytes does not fit into {} bytes of program memory", len, PROGRAM_SPACE)
        }
    }
}
