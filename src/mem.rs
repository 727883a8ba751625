// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! One flat 4 KiB address space, with a couple of named [Region]s laid over it.

use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::Range,
};

/// Size of the address space, in bytes
pub const MEM_SIZE: usize = 0x1000;

/// The built-in hexadecimal font, 5 bytes per glyph
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the range of addresses covered by this [Region]
    ///
    /// # Examples
    /// ```rust
    /// # use chirp8::mem::Region;
    /// assert_eq!(0x000..0x050, Region::Charset.range());
    /// assert_eq!(0x200..0x1000, Region::Program.range());
    /// ```
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0x000..FONT.len(),
            Region::Program => 0x200..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// A hexdump view into a slice of [Mem]
pub struct MemWindow<'a> {
    start: usize,
    mem: &'a [u8],
}

impl<'a> Display for MemWindow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green().on_black();
        for (index, byte) in self.mem.iter().enumerate() {
            let addr = self.start + index;
            if index == 0 || addr % 16 == 0 {
                write!(f, "{}{} ", format_args!("{addr:03x}").style(term), ":".style(term))?
            }
            write!(f, "{byte:02x}")?;
            write!(
                f,
                "{}",
                match addr % 16 {
                    0xf => "\n",
                    0x7 => "  ",
                    _ if addr % 2 == 1 => " ",
                    _ => "",
                }
            )?
        }
        Ok(())
    }
}

/// Stores the 4 KiB address space
///
/// Instruction fetches are bounds checked (see [Mem::fetch]).
/// Data accesses through [Mem::read] and [Mem::write] wrap at the top
/// of the 12-bit address space.
#[derive(Clone, PartialEq, Eq)]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a new, zeroed [Mem] with the font installed
    /// # Examples
    /// ```rust
    /// # use chirp8::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(MEM_SIZE, mem.len());
    /// assert_eq!(&FONT[..], mem.get_region(Region::Charset));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.install_font();
        mem
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Because clippy is so kind:
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Zeroes all memory, then reinstalls the font
    pub fn reset(&mut self) -> &mut Self {
        self.memory.fill(0);
        self.install_font()
    }

    fn install_font(&mut self) -> &mut Self {
        self.memory[Region::Charset.range()].copy_from_slice(&FONT);
        self
    }

    /// Reads the byte at `addr`, wrapping at the end of memory
    /// # Examples
    /// ```rust
    /// # use chirp8::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0x000));
    /// // 0x1000 wraps around to 0x000
    /// assert_eq!(0xf0, mem.read(0x1000));
    /// ```
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEM_SIZE]
    }

    /// Writes `data` to `addr`, wrapping at the end of memory
    #[inline(always)]
    pub fn write(&mut self, addr: u16, data: u8) {
        self.memory[addr as usize % MEM_SIZE] = data;
    }

    /// Fetches the big-endian word at `addr`.
    ///
    /// Unlike [Mem::read], this does not wrap: returns [None] if either byte
    /// lies outside memory.
    /// # Examples
    /// ```rust
    /// # use chirp8::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(Some(0xf090), mem.fetch(0x000));
    /// assert_eq!(None, mem.fetch(0xfff));
    /// ```
    #[inline(always)]
    pub fn fetch(&self, addr: u16) -> Option<u16> {
        let addr = addr as usize;
        let word = self.memory.get(addr..addr + 2)?;
        Some(u16::from_be_bytes([word[0], word[1]]))
    }

    /// Gets a slice of memory, or [None] if the range leaves memory
    pub fn get(&self, range: Range<usize>) -> Option<&[u8]> {
        self.memory.get(range)
    }

    /// Gets the slice of memory backing a named [Region]
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.memory[name.range()]
    }

    /// Loads data into the start of a named [Region]
    ///
    /// Fails with [Error::ProgramTooLarge] if `data` doesn't fit.
    /// Memory past the end of `data` is left alone.
    /// # Examples
    /// ```rust
    /// # use chirp8::{mem::*, error::Result};
    /// # fn main() -> Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_region(Region::Program, b"Hello, world!")?;
    /// assert_eq!(Some(&b"Hello"[..]), mem.get(0x200..0x205));
    ///
    /// let huge = vec![0xff; 0x1000];
    /// assert!(mem.load_region(Region::Program, &huge).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let range = name.range();
        if data.len() > range.len() {
            return Err(Error::ProgramTooLarge {
                len: data.len(),
                max: range.len(),
            });
        }
        self.memory[range.start..range.start + data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.memory[name.range()].fill(0);
        self
    }

    /// Creates a window into the Mem which implements Display
    ///
    /// The range is clamped to the end of memory.
    pub fn window(&self, range: Range<usize>) -> MemWindow<'_> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        MemWindow {
            start,
            mem: &self.memory[start..end],
        }
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl Display for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.window(0..self.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_installed() {
        let mem = Mem::new();
        assert_eq!(&FONT[0..5], &[0xf0, 0x90, 0x90, 0x90, 0xf0]);
        assert_eq!(mem.get(0..80), Some(&FONT[..]));
    }

    #[test]
    fn reset_restores_font() {
        let mut mem = Mem::new();
        for addr in 0..0x1000 {
            mem.write(addr, 0xa5);
        }
        mem.reset();
        assert_eq!(mem.get_region(Region::Charset), &FONT[..]);
        assert!(mem.get(0x50..0x1000).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn data_access_wraps() {
        let mut mem = Mem::new();
        mem.write(0x1234, 0x42);
        assert_eq!(0x42, mem.read(0x234));
        assert_eq!(0x42, mem.read(0xf234));
    }

    #[test]
    fn fetch_is_bounded() {
        let mut mem = Mem::new();
        mem.write(0xffe, 0x12);
        mem.write(0xfff, 0x34);
        assert_eq!(Some(0x1234), mem.fetch(0xffe));
        assert_eq!(None, mem.fetch(0xfff));
        assert_eq!(None, mem.fetch(0x1000));
        assert_eq!(None, mem.fetch(0xffff));
    }

    #[test]
    fn load_program_exactly_fits() {
        let mut mem = Mem::new();
        let rom = vec![0xaa; 0xe00];
        mem.load_region(Region::Program, &rom)
            .expect("0xe00 bytes should fit in program memory");
        assert_eq!(0xaa, mem.read(0xfff));
    }

    #[test]
    fn load_program_too_large() {
        let mut mem = Mem::new();
        let before = mem.clone();
        let rom = vec![0xaa; 0xe01];
        match mem.load_region(Region::Program, &rom) {
            Err(Error::ProgramTooLarge { len, max }) => {
                assert_eq!((0xe01, 0xe00), (len, max));
            }
            other => panic!("expected ProgramTooLarge, got {other:?}"),
        }
        assert!(mem == before);
    }

    #[test]
    fn clear_region() {
        let mut mem = Mem::new();
        mem.load_region(Region::Program, &[1, 2, 3]).unwrap();
        mem.clear_region(Region::Program);
        assert_eq!(Some(&[0, 0, 0][..]), mem.get(0x200..0x203));
        // the font is untouched
        assert_eq!(mem.get_region(Region::Charset), &FONT[..]);
    }

    #[test]
    fn window_display() {
        let mem = Mem::new();
        let dump = format!("{}", mem.window(0x000..0x010));
        assert!(dump.contains("f090 9090 f020 6020  2070 f010 f080 f0f0\n"));
        // windows past the end of memory are clamped
        assert_eq!("", format!("{}", mem.window(0x2000..0x3000)));
    }

    #[test]
    fn region_display() {
        assert_eq!("Charset", Region::Charset.to_string());
        assert_eq!("Program", Region::Program.to_string());
    }
}
