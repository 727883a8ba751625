// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The hexadecimal keypad

use crate::error::{Error, Result};

/// Number of keys on the keypad
pub const KEY_COUNT: usize = 16;

/// Tracks which of the 16 keys are held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keys {
    keys: [bool; KEY_COUNT],
}

impl Keys {
    /// Sets the state of a key, and reports whether it changed.
    ///
    /// If the key does not exist, returns [Error::InvalidKeyIndex].
    /// # Examples
    /// ```rust
    /// # use chirp8::cpu::keys::Keys;
    /// let mut keys = Keys::default();
    /// assert!(keys.set(0x7, true).unwrap());
    /// // already held, so nothing changed
    /// assert!(!keys.set(0x7, true).unwrap());
    /// assert!(keys.set(0x10, true).is_err());
    /// ```
    pub fn set(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self
            .keys
            .get_mut(key)
            .ok_or(Error::InvalidKeyIndex { key })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    /// Reports whether a key is held. Keys outside the keypad are never held.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Iterates over the state of each key, in order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.keys.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = Keys::default();
        for key in 0..KEY_COUNT {
            assert!(keys.set(key, true).unwrap());
            assert!(keys.is_pressed(key));
            assert!(keys.set(key, false).unwrap());
            assert!(!keys.set(key, false).unwrap());
            assert!(!keys.is_pressed(key));
        }
    }

    #[test]
    fn invalid_key() {
        let mut keys = Keys::default();
        keys.set(3, true).unwrap();
        let before = keys;
        for key in [0x10, 0xff, usize::MAX] {
            match keys.set(key, true) {
                Err(Error::InvalidKeyIndex { key: k }) => assert_eq!(key, k),
                other => panic!("expected InvalidKeyIndex, got {other:?}"),
            }
            assert!(!keys.is_pressed(key));
        }
        assert_eq!(before, keys);
    }

    #[test]
    fn release_all() {
        let mut keys = Keys::default();
        keys.set(0x0, true).unwrap();
        keys.set(0xf, true).unwrap();
        assert_eq!(2, keys.iter().filter(|&held| held).count());
        keys.release_all();
        assert_eq!(Keys::default(), keys);
    }
}
