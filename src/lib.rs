// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 virtual machine as if it were a real CPU architecture.
//!
//! The [CPU] owns everything: 4 KiB of [Mem]ory, the registers and stack,
//! the [Timers], the [Keys], and the 64x32 [Screen]. A host drives it a frame at a time:
//!
//! ```rust
//! use chirp8::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::default();
//! cpu.load_program_bytes(&[
//!     0x6a, 0x02, // mov  #02, vA
//!     0xfa, 0x29, // font vA, I
//!     0xd0, 0x05, // draw #5, v0, v0
//!     0x12, 0x06, // jmp  206
//! ])?;
//! // run 15 instructions, then tick the timers
//! cpu.frame(15)?;
//! // the digit "2" was drawn in the corner of the screen
//! assert!(cpu.screen().get(0, 0));
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod mem;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    keys::Keys,
    timers::Timers,
    CPU,
};
pub use error::{Error, Result};
pub use mem::{Mem, Region};
pub use screen::Screen;
