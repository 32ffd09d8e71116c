// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate byteorder;
#[macro_use]
extern crate enum_primitive;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate rand;

mod config;
mod interpreter;
mod keypad;
mod memory;
mod regfile;
mod snapshot;
mod stack;
mod timer;
mod vm;

pub mod display;
pub mod instruction;

pub use self::config::{Config, ShiftQuirk, TimerMode};
pub use self::interpreter::{Interpreter, Observer};
pub use self::snapshot::{Registers, Snapshot};
pub use self::vm::{Cycle, Vm};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Address the program is loaded at and where `pc` starts.
pub const PROGRAM_START: u16 = 0x200;
pub const MEMORY_SIZE: usize = 4096;

error_chain! {
    errors {
        Decode(word: u16, pc: u16) {
            description("unknown instruction")
            display("unknown instruction {:04x} at {:03x}", word, pc)
        }
        StackOverflow(pc: u16) {
            description("call stack overflow")
            display("call stack overflow at {:03x}", pc)
        }
        StackUnderflow(pc: u16) {
            description("return with empty call stack")
            display("return with empty call stack at {:03x}", pc)
        }
        AddressOutOfRange(addr: usize) {
            description("memory address out of range")
            display("memory address {:#x} is out of range", addr)
        }
        ProtectedWrite(addr: usize) {
            description("write to reserved memory")
            display("write to reserved interpreter memory at {:#05x}", addr)
        }
        RomTooLarge(len: usize) {
            description("rom does not fit into memory")
            display("rom is {} bytes, at most {} fit into memory", len, MEMORY_SIZE - PROGRAM_START as usize)
        }
        WorkerPanicked {
            description("interpreter thread panicked")
            display("interpreter thread panicked")
        }
    }
}
