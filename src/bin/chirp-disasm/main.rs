// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Chirp8: Disassembles a chip-8 ROM

use chirp8::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(
        help = "Load address (usually 200)",
        parse(try_from_str = "parse_hex"),
        default = "200"
    )]
    pub loadaddr: u16,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    print!("{}", disassemble(&contents, &options));
    Ok(())
}

/// Disassembles `rom` one 2-byte word at a time, starting at `options.offset`
fn disassemble(rom: &[u8], options: &Arguments) -> String {
    let disassembler = Dis::default();
    let start = options.loadaddr as usize + options.offset;
    rom.get(options.offset..)
        .unwrap_or_default()
        .chunks_exact(2)
        .enumerate()
        .map(|(index, word)| {
            let word = u16::from_be_bytes([word[0], word[1]]);
            format!(
                "{:03x}: {} {:04x}\n",
                start + 2 * index,
                disassembler.once(word),
                word.bright_black(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> Arguments {
        Arguments::parse_args_default(args).unwrap()
    }

    #[test]
    fn one_line_per_word() {
        let out = disassemble(b"\x00\xe0\x12\x02\xff", &options(&["rom.ch8"]));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("200: "));
        assert!(lines[0].contains("cls"));
        assert!(lines[1].starts_with("202: "));
        assert!(lines[1].contains("jmp    202"));
    }

    #[test]
    fn offset_and_loadaddr() {
        let out = disassemble(
            b"\x00\xe0\x60\x01",
            &options(&["rom.ch8", "--offset", "2", "--loadaddr", "600"]),
        );
        assert!(out.starts_with("602: "));
        assert!(out.contains("mov    #01, v0"));
    }

    #[test]
    fn offset_past_end() {
        assert!(disassemble(b"\x00\xe0", &options(&["rom.ch8", "--offset", "9"])).is_empty());
    }
}
