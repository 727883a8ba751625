// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod keys;
pub mod timers;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    keys::Keys,
    timers::Timers,
};
use crate::{
    error::{Error, Result},
    mem::{Mem, Region},
    screen::Screen,
};
use log::{debug, info, trace, warn};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;
/// Address at which programs are loaded, and execution begins
pub const PROGRAM_START: Adr = 0x200;
/// Address of the built-in font
pub const FONT_ADDR: Adr = 0x000;

/// Represents the internal state of the CPU interpreter
///
/// The CPU exclusively owns the memory, screen, timers and keypad.
/// None of them can be changed from outside except through the methods below.
#[derive(Clone)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes debug mode and pause.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    timers: Timers,
    // I/O
    keys: Keys,
    // Execution data
    cycle: usize,
    rng: StdRng,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU, with the random number generator seeded from entropy
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let cpu = CPU::new();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Constructs a new CPU whose `Cxbb` instruction produces a repeatable sequence
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// # fn main() -> Result<()> {
    /// let rom = [0xc0, 0xff, 0xc1, 0xff, 0xc2, 0xff];
    /// let (mut a, mut b) = (CPU::with_seed(8), CPU::with_seed(8));
    /// a.load_program_bytes(&rom)?.multistep(3)?;
    /// b.load_program_bytes(&rom)?.multistep(3)?;
    /// assert_eq!(a.v(), b.v());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::new(),
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            timers: Timers::default(),
            keys: Keys::default(),
            cycle: 0,
            rng,
            disassembler: Dis::default(),
        }
    }

    /// Loads a program from a file into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, starting at 0x200.
    ///
    /// Returns [Error::ProgramTooLarge] (and changes nothing) if the program
    /// would run past the end of memory.
    /// Releases [Flags::pause], so a program which halted itself doesn't
    /// stall the next one. Doesn't otherwise reset the CPU; call [CPU::reset]
    /// first for a clean run.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x6a, 0x02]).unwrap();
    /// assert!(cpu.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_region(Region::Program, rom)?;
        // release any halt left by the previous program
        self.flags.pause = false;
        info!("Loaded {} byte program at {PROGRAM_START:03x}", rom.len());
        Ok(self)
    }

    /// Sets the state of a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKeyIndex].
    ///
    /// If the CPU is waiting on `Fx0A`, any key reported as pressed (held or not)
    /// is recorded in [Flags::lastkey], and stored in vX on the next cycle.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// assert!(cpu.set_key(0x7, true).unwrap());
    /// // press key `7` again, even though it's already pressed
    /// assert!(!cpu.set_key(0x7, true).unwrap());
    /// // release it
    /// assert!(cpu.set_key(0x7, false).unwrap());
    /// // there is no key `10`
    /// assert!(cpu.set_key(0x10, true).is_err());
    /// ```
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let changed = self.keys.set(key, pressed)?;
        trace!("key {key:X} {}", if pressed { "down" } else { "up" });
        if pressed && self.flags.keypause.take().is_some() {
            self.flags.lastkey = Some(key);
        }
        Ok(changed)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// See [CPU::set_key]
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// See [CPU::set_key]
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, false)
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.keys.release_all();
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(cpu.v(), [0; 16]);
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.i());
    /// ```
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the return addresses on the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.stack.len()
    }

    /// Gets the value in the Sound Timer register
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.sound());
    /// ```
    pub fn sound(&self) -> u8 {
        self.timers.sound
    }

    /// Gets the value in the Delay Timer register
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn delay(&self) -> u8 {
        self.timers.delay
    }

    /// Gets both timers
    pub fn timers(&self) -> Timers {
        self.timers
    }

    /// Gets the state of the keypad
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Gets read-only access to the display buffer.
    ///
    /// Clone the [Screen] to keep a snapshot.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets read-only access to memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the number of cycles the CPU has executed
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Resets the emulator.
    ///
    /// Zeroes memory (then reinstalls the font), the screen, stack, registers,
    /// timers, keys, and cycle count, and sets the program counter to 0x200.
    /// Releases pause and keypause.
    ///
    /// Does not touch [Flags::debug] or the random number generator.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x12, 0x34]).unwrap();
    /// cpu.tick().unwrap();
    /// assert_eq!(0x234, cpu.pc());
    /// cpu.reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(0, cpu.mem().read(0x200));
    /// ```
    pub fn reset(&mut self) {
        self.flags = Flags {
            pause: false,
            keypause: None,
            lastkey: None,
            ..self.flags
        };
        self.mem.reset();
        self.screen.clear();
        // clear the stack
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.timers = Timers::default();
        // I/O
        self.keys.release_all();
        // Execution data
        self.cycle = 0;
        info!("Reset");
    }

    /// Ticks the delay and sound timers.
    ///
    /// The host should call this 60 times a second, independent of [CPU::tick].
    pub fn tick_timers(&mut self) {
        self.timers.tick();
        trace!("DLY: {}, SND: {}", self.timers.delay, self.timers.sound);
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::IllegalInstruction]
    /// if the instruction is unimplemented.
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.flags.pause = true;
    /// cpu.singlestep().unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// assert!(cpu.flags.pause);
    /// ```
    pub fn singlestep(&mut self) -> Result<&mut Self> {
        let pause = self.flags.pause;
        self.flags.pause = false;
        let result = self.tick().map(|_| ());
        self.flags.pause |= pause;
        result.map(|_| self)
    }

    /// Runs `steps` instructions, stopping at the first error
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x04, // jump 0x204
    ///     0x12, 0x02, // jump 0x202
    /// ]).unwrap();
    /// cpu.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        Ok(self)
    }

    /// Runs one frame: `ipf` instructions, then one tick of the timers
    ///
    /// The timers are ticked even when an instruction fails.
    pub fn frame(&mut self, ipf: usize) -> Result<&mut Self> {
        let result = self.multistep(ipf).map(|_| ());
        self.tick_timers();
        result.map(|_| self)
    }

    /// Executes a single instruction
    ///
    /// Does nothing if [Flags::pause] is set.
    ///
    /// Returns [Error::PcOutOfBounds] if the instruction at `pc` doesn't fit in memory,
    /// [Error::IllegalInstruction] if it isn't part of the instruction set,
    /// and [Error::StackOverflow] or [Error::StackUnderflow] if a call or return fails.
    ///
    /// On error, the failing instruction has no effect: pc still points at it.
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::IllegalInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// # cpu.flags.debug = true;        // enable live disassembly
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick())
    ///     .expect_err("Should return Error::IllegalInstruction { 0xffff }");
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        if let Err(e) = self.step() {
            warn!("{e}");
            return Err(e);
        }
        Ok(self)
    }

    /// Fetches, decodes, and executes one instruction
    fn step(&mut self) -> Result<()> {
        let pc = self.pc;
        // fetch opcode
        let word = self.mem.fetch(pc).ok_or(Error::PcOutOfBounds { pc })?;

        // Print opcode disassembly:
        if self.flags.debug {
            debug!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                pc,
                self.disassembler.once(word)
            );
        }

        // decode opcode
        let insn = Insn::from_word(word).ok_or(Error::IllegalInstruction { addr: pc, word })?;
        self.pc = pc.wrapping_add(2);
        if let Err(e) = self.execute(insn) {
            self.pc = pc;
            return Err(e);
        }
        self.cycle += 1;
        Ok(())
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chirp8::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.timers.delay,
            self.timers.sound,
            self.cycle,
        );
    }
}

impl PartialEq for CPU {
    /// Compares the architectural state of two CPUs.
    ///
    /// The random number generator and disassembler are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.mem == other.mem
            && self.screen == other.screen
            && self.stack == other.stack
            && self.pc == other.pc
            && self.i == other.i
            && self.v == other.v
            && self.timers == other.timers
            && self.keys == other.keys
            && self.cycle == other.cycle
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("timers", &self.timers)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("disassembler", &self.disassembler)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chirp8::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        Self::new()
    }
}
