//! Character-keyed collections without hashing.
//!
//! Two families live here:
//! - fixed-alphabet [`LetterSet`] / [`LetterMap`] / [`LetterTable`] over
//!   `[0-9a-zA-Z]`, where each letter owns one bit (or slot) of a 64-wide array;
//! - general [`CharMap`] / [`CharTable`] over any `char`, specialized for the
//!   very common 0 and 1 entry cases.
//!
//! All of them can be frozen; mutation of a frozen collection fails with
//! [`Error::Immutable`] and leaves it untouched.

use std::fmt;

use crate::error::{Error, Result};

mod char_map;
mod table;

pub use char_map::CharMap;
pub use table::{CharTable, LetterTable};

/// Number of letters in the fixed alphabet: 10 digits, 26 lower, 26 upper.
pub const ALPHABET_SIZE: usize = 62;

const LOWERCASE_SHIFT: usize = 10;
const UPPERCASE_SHIFT: usize = 36;

/// Slot of the letter within the fixed alphabet, `None` when out of range.
pub(crate) fn letter_index(c: char) -> Option<usize> {
    match c {
        '0'..='9' => Some(c as usize - '0' as usize),
        'a'..='z' => Some(c as usize - 'a' as usize + LOWERCASE_SHIFT),
        'A'..='Z' => Some(c as usize - 'A' as usize + UPPERCASE_SHIFT),
        _ => None,
    }
}

fn checked_index(c: char) -> Result<usize> {
    letter_index(c).ok_or(Error::OutOfAlphabet(c))
}

fn letter_at(idx: usize) -> char {
    let (base, offset) = if idx >= UPPERCASE_SHIFT {
        (b'A', idx - UPPERCASE_SHIFT)
    } else if idx >= LOWERCASE_SHIFT {
        (b'a', idx - LOWERCASE_SHIFT)
    } else {
        (b'0', idx)
    };
    (base + offset as u8) as char
}

/// Immutable bit set of `[0-9a-zA-Z]` letters packed into one `u64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LetterSet {
    bits: u64,
}

impl LetterSet {
    pub const EMPTY: LetterSet = LetterSet { bits: 0 };

    /// Set of all letters of `chars`; fails on the first out-of-range one.
    pub fn of(chars: &str) -> Result<LetterSet> {
        let mut bits = 0u64;
        for c in chars.chars() {
            bits |= 1 << checked_index(c)?;
        }
        Ok(LetterSet { bits })
    }

    /// Set holding a single letter.
    pub fn single(c: char) -> Result<LetterSet> {
        Ok(LetterSet { bits: 1 << checked_index(c)? })
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Membership test; characters outside of the alphabet are never members.
    pub fn contains(&self, c: char) -> bool {
        match letter_index(c) {
            Some(idx) => self.bits & (1 << idx) != 0,
            None => false,
        }
    }

    /// Do the two sets share at least one letter?
    pub fn intersects(&self, other: &LetterSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Letters in alphabet order: digits, lowercase, uppercase.
    pub fn iter(&self) -> LetterSetIter {
        LetterSetIter { bits: self.bits }
    }
}

impl IntoIterator for LetterSet {
    type Item = char;
    type IntoIter = LetterSetIter;

    fn into_iter(self) -> LetterSetIter {
        self.iter()
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for c in self.iter() {
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterSet{}", self)
    }
}

pub struct LetterSetIter {
    bits: u64,
}

impl Iterator for LetterSetIter {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        /* Clear lowest set bit */
        self.bits &= self.bits - 1;
        Some(letter_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

/// Map keyed by `[0-9a-zA-Z]` letters, one slot per letter.
#[derive(Debug, Clone)]
pub struct LetterMap<V> {
    values: [Option<V>; ALPHABET_SIZE],
    frozen: bool,
}

impl<V> LetterMap<V> {
    pub fn new() -> LetterMap<V> {
        LetterMap {
            values: std::array::from_fn(|_| None),
            frozen: false,
        }
    }

    /// Number of letters holding a value.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Value stored for the letter; out-of-range characters are simply absent.
    pub fn get(&self, c: char) -> Option<&V> {
        letter_index(c).and_then(|idx| self.values[idx].as_ref())
    }

    pub fn contains_key(&self, c: char) -> bool {
        self.get(c).is_some()
    }

    pub(crate) fn get_mut(&mut self, c: char) -> Option<&mut V> {
        letter_index(c).and_then(move |idx| self.values[idx].as_mut())
    }

    /// Store a value, replacing any previous one.
    pub fn put(&mut self, c: char, value: V) -> Result<&mut Self> {
        self.check_mutable()?;
        let idx = checked_index(c)?;
        self.values[idx] = Some(value);
        Ok(self)
    }

    /// Store several values in order; stops at the first failing key.
    pub fn put_all<I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (char, V)>,
    {
        for (c, value) in entries {
            self.put(c, value)?;
        }
        Ok(self)
    }

    /// Drop the value of the letter; out-of-range characters are ignored.
    pub fn remove(&mut self, c: char) -> Result<&mut Self> {
        self.check_mutable()?;
        if let Some(idx) = letter_index(c) {
            self.values[idx] = None;
        }
        Ok(self)
    }

    /// Forbid any further mutation.
    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Entries in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &V)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.as_ref().map(|v| (letter_at(idx), v)))
    }

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(Error::Immutable)
        } else {
            Ok(())
        }
    }
}

impl<V> Default for LetterMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
