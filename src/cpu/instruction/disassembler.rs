// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use super::Insn;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        if let Some(insn) = Insn::from_word(insn) {
            format!("{}", insn.style(self.normal))
        } else {
            format!("{}", format_args!("inval  {insn:04x}").style(self.invalid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid() {
        let dis = Dis::default();
        assert!(dis.once(0x6a02).contains("mov    #02, vA"));
        assert!(dis.once(0xd125).contains("draw   #5, v1, v2"));
        assert!(dis.once(0x2300).contains("call   300"));
    }

    #[test]
    fn invalid() {
        let dis = Dis::default();
        assert!(dis.once(0x5001).contains("inval  5001"));
        assert!(dis.once(0xffff).contains("inval  ffff"));
    }

    #[test]
    fn styled_is_decorated() {
        let line = Dis::default().once(0x00e0);
        assert!(line.contains("cls"));
        assert_ne!("cls    ", line);
    }
}
