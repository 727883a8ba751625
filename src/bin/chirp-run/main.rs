// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Chirp8: A headless chip-8 runner
//!
//! Runs a ROM for a fixed number of frames, then prints the screen and registers.

use chirp8::{error::Result, *};
use gumdrop::*;
use log::{debug, info};
use owo_colors::OwoColorize;
use std::{path::PathBuf, str::FromStr};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Chirp8.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Seed the random number generator.")]
    pub seed: Option<u64>,
    #[options(help = "Run for this many frames.", default = "600", meta = "N")]
    pub frames: usize,
    #[options(help = "Set the instructions-per-frame rate.", default = "15", meta = "IPF")]
    pub ipf: usize,
    #[options(
        help = "Press hex key K for one frame, starting at FRAME.",
        meta = "K@FRAME"
    )]
    pub key: Vec<KeyPress>,
}

/// A scripted key press, written `K@FRAME`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct KeyPress {
    pub frame: usize,
    pub key: usize,
}

impl FromStr for KeyPress {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (key, frame) = s
            .split_once('@')
            .ok_or_else(|| format!("expected K@FRAME, got {s:?}"))?;
        Ok(KeyPress {
            key: usize::from_str_radix(key, 16).map_err(|e| format!("key {key:?}: {e}"))?,
            frame: frame.parse().map_err(|e| format!("frame {frame:?}: {e}"))?,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();

    let mut cpu = match options.seed {
        Some(seed) => CPU::with_seed(seed),
        None => CPU::new(),
    };
    cpu.flags.debug = options.debug;
    cpu.load_program(&options.file)?;
    info!("Running {} for {} frames", options.file.display(), options.frames);

    if let Err(e) = run(&mut cpu, &options) {
        eprintln!("{}", e.bold().red());
        cpu.dump();
        std::process::exit(1);
    }

    println!("{}", cpu.screen());
    cpu.dump();
    Ok(())
}

/// Drives the CPU one frame at a time, pressing scripted keys as it goes
fn run(cpu: &mut CPU, options: &Arguments) -> Result<()> {
    for frame in 0..options.frames {
        for press in options.key.iter().filter(|press| press.frame == frame) {
            debug!("frame {frame}: pressing {:X}", press.key);
            cpu.press(press.key)?;
        }
        cpu.frame(options.ipf)?;
        cpu.release_all();
        if cpu.flags.pause {
            info!("Halted after {} frames", frame + 1);
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_press() {
        assert_eq!(
            Ok(KeyPress { key: 0xa, frame: 30 }),
            "a@30".parse::<KeyPress>()
        );
        assert!("a30".parse::<KeyPress>().is_err());
        assert!("g@30".parse::<KeyPress>().is_err());
        assert!("a@x".parse::<KeyPress>().is_err());
    }

    #[test]
    fn run_until_halt() {
        let mut cpu = CPU::with_seed(0);
        // mov #5, v0; halt
        cpu.load_program_bytes(b"\x60\x05\x12\x02").unwrap();
        let options = Arguments::parse_args_default::<&str>(&["rom.ch8"]).unwrap();
        run(&mut cpu, &options).unwrap();
        assert_eq!(5, cpu.v()[0]);
        assert!(cpu.flags.pause);
    }

    #[test]
    fn scripted_key_resolves_wait() {
        let mut cpu = CPU::with_seed(0);
        // waitk v1; halt
        cpu.load_program_bytes(b"\xf1\x0a\x12\x02").unwrap();
        let options =
            Arguments::parse_args_default::<&str>(&["rom.ch8", "--frames", "10", "--key", "c@3"])
                .unwrap();
        run(&mut cpu, &options).unwrap();
        assert_eq!(0xc, cpu.v()[1]);
    }
}
