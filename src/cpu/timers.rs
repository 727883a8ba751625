// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The delay and sound timers

/// The delay and sound timers.
///
/// Both count down by one per [Timers::tick], and stop at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timers {
    /// Delay timer, readable by the program
    pub delay: u8,
    /// Sound timer. The buzzer sounds while this is non-zero.
    pub sound: u8,
}

impl Timers {
    /// Counts both timers down by one, stopping at zero
    /// # Examples
    /// ```rust
    /// # use chirp8::cpu::timers::Timers;
    /// let mut timers = Timers { delay: 1, sound: 0 };
    /// timers.tick();
    /// assert_eq!(Timers { delay: 0, sound: 0 }, timers);
    /// timers.tick();
    /// assert_eq!(Timers { delay: 0, sound: 0 }, timers);
    /// ```
    #[inline(always)]
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Reports whether the buzzer should be sounding
    pub fn beeping(&self) -> bool {
        self.sound > 0
    }
}
