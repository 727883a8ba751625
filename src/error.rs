// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Chirp8

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Chirp8.
///
/// [Error::ProgramTooLarge] and [Error::InvalidKeyIndex] are recoverable: the
/// call is rejected and the CPU is left untouched. The rest are raised by
/// [CPU::tick](crate::cpu::CPU::tick) and mean the run cannot continue.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to load a program which doesn't fit in program memory
    #[error("program of {len} bytes does not fit in {max} bytes of program memory")]
    ProgramTooLarge {
        /// The length of the offending program
        len: usize,
        /// The number of bytes available
        max: usize,
    },
    /// Tried to fetch an instruction from outside of memory
    #[error("pc {pc:04x} is outside of memory")]
    PcOutOfBounds {
        /// The offending program counter
        pc: u16,
    },
    /// Represents an opcode which isn't part of the instruction set
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    IllegalInstruction {
        /// The address of the offending word
        addr: u16,
        /// The offending word
        word: u16,
    },
    /// Tried to call a subroutine with a full stack
    #[error("stack overflow: call at {addr:03x} exceeds 16 levels")]
    StackOverflow {
        /// The address of the offending call
        addr: u16,
    },
    /// Tried to return with an empty stack
    #[error("stack underflow: return at {addr:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the offending return
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKeyIndex {
        /// The offending key
        key: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Reports whether this error ends the run
    ///
    /// # Examples
    /// ```rust
    /// # use chirp8::error::Error;
    /// assert!(Error::StackUnderflow { addr: 0x200 }.is_fatal());
    /// assert!(!Error::InvalidKeyIndex { key: 0x10 }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::PcOutOfBounds { .. }
                | Error::IllegalInstruction { .. }
                | Error::StackOverflow { .. }
                | Error::StackUnderflow { .. }
        )
    }
}
