// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const SCREEN_WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const SCREEN_HEIGHT: usize = 32;

/// The 64x32 monochrome display buffer.
///
/// Each row is packed into a [u64], with the leftmost pixel in the most significant bit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    rows: [u64; SCREEN_HEIGHT],
}

impl Screen {
    /// Constructs a blank [Screen]
    pub fn new() -> Self {
        Screen {
            rows: [0; SCREEN_HEIGHT],
        }
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.rows = [0; SCREEN_HEIGHT];
    }

    /// Gets the pixel at (x, y). Coordinates wrap around the edges of the screen.
    /// # Examples
    /// ```rust
    /// # use chirp8::screen::Screen;
    /// let mut screen = Screen::new();
    /// screen.draw_sprite(0, 0, &[0x80]);
    /// assert!(screen.get(0, 0));
    /// assert!(screen.get(64, 32));
    /// assert!(!screen.get(1, 0));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x % SCREEN_WIDTH, y % SCREEN_HEIGHT);
        self.rows[y] & (1 << (SCREEN_WIDTH - 1 - x)) != 0
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y), one byte per line.
    ///
    /// The sprite wraps around both edges of the screen.
    /// Returns `true` if any lit pixel was turned off.
    /// # Examples
    /// ```rust
    /// # use chirp8::screen::Screen;
    /// let mut screen = Screen::new();
    /// assert!(!screen.draw_sprite(62, 0, &[0xf0]));
    /// // the sprite wrapped around to the left edge
    /// assert!(screen.get(63, 0) && screen.get(0, 0) && screen.get(1, 0));
    /// // drawing it again erases it, and reports the collision
    /// assert!(screen.draw_sprite(62, 0, &[0xf0]));
    /// assert_eq!(0, screen.count_lit());
    /// ```
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let (x, y) = (x % SCREEN_WIDTH, y % SCREEN_HEIGHT);
        let mut collision = false;
        for (line, &byte) in sprite.iter().enumerate() {
            let row = &mut self.rows[(y + line) % SCREEN_HEIGHT];
            let sprite = ((byte as u64) << (SCREEN_WIDTH - 8)).rotate_right(x as u32);
            collision |= *row & sprite != 0;
            *row ^= sprite;
        }
        collision
    }

    /// Gets the packed rows of the screen
    pub fn rows(&self) -> &[u64; SCREEN_HEIGHT] {
        &self.rows
    }

    /// Iterates over every pixel, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..SCREEN_WIDTH * SCREEN_HEIGHT).map(|index| {
            let (x, y) = Self::to_xy(index);
            self.get(x, y)
        })
    }

    /// Converts a row-major pixel index into (x, y) coordinates
    pub fn to_xy(index: usize) -> (usize, usize) {
        (index % SCREEN_WIDTH, index / SCREEN_WIDTH)
    }

    /// Counts the lit pixels
    pub fn count_lit(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Screen {
    /// Draws the screen with the drawille library, if available
    #[cfg(feature = "drawille")]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use drawille::Canvas;
        let mut canvas = Canvas::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
        self.iter()
            .enumerate()
            .filter(|(_, lit)| *lit)
            .map(|(index, _)| Self::to_xy(index))
            .for_each(|(x, y)| canvas.set(x as u32, y as u32));
        write!(f, "{}", canvas.frame())
    }

    #[cfg(not(feature = "drawille"))]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.rows.iter() {
            for x in (0..SCREEN_WIDTH).rev() {
                write!(f, "{}", if row >> x & 1 != 0 { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
