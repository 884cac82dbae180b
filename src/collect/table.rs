//! Two-level tables keyed by an ordered pair of characters.

use crate::error::{Error, Result};

use super::{CharMap, LetterMap};

/// Split a two-character key into its characters.
fn pair(key: &str) -> Result<(char, char)> {
    let mut chars = key.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(Error::InvalidKeyLength(key.to_string())),
    }
}

/// Table keyed by pairs of `[0-9a-zA-Z]` letters, e.g. digraphs.
#[derive(Debug, Clone, Default)]
pub struct LetterTable<V> {
    rows: LetterMap<LetterMap<V>>,
    frozen: bool,
}

impl<V> LetterTable<V> {
    pub fn new() -> LetterTable<V> {
        LetterTable {
            rows: LetterMap::new(),
            frozen: false,
        }
    }

    pub fn put(&mut self, first: char, second: char, value: V) -> Result<&mut Self> {
        if self.frozen {
            return Err(Error::Immutable);
        }
        match self.rows.get_mut(first) {
            Some(row) => {
                row.put(second, value)?;
            }
            None => {
                let mut row = LetterMap::new();
                row.put(second, value)?;
                self.rows.put(first, row)?;
            }
        }
        Ok(self)
    }

    /// Same as [`LetterTable::put`] with the pair given as a two-character string.
    pub fn put_pair(&mut self, key: &str, value: V) -> Result<&mut Self> {
        let (first, second) = pair(key)?;
        self.put(first, second, value)
    }

    pub fn get(&self, first: char, second: char) -> Option<&V> {
        self.rows.get(first).and_then(|row| row.get(second))
    }

    pub fn get_pair(&self, key: &str) -> Result<Option<&V>> {
        let (first, second) = pair(key)?;
        Ok(self.get(first, second))
    }

    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// Table keyed by pairs of arbitrary characters.
#[derive(Debug, Default)]
pub struct CharTable<V> {
    rows: CharMap<CharMap<V>>,
    frozen: bool,
}

impl<V> CharTable<V> {
    pub fn new() -> CharTable<V> {
        CharTable {
            rows: CharMap::new(),
            frozen: false,
        }
    }

    pub fn put(&mut self, first: char, second: char, value: V) -> Result<&mut Self> {
        if self.frozen {
            return Err(Error::Immutable);
        }
        match self.rows.get_mut(first) {
            Some(row) => {
                row.insert(second, value)?;
            }
            None => {
                let mut row = CharMap::new();
                row.insert(second, value)?;
                self.rows.insert(first, row)?;
            }
        }
        Ok(self)
    }

    pub fn put_pair(&mut self, key: &str, value: V) -> Result<&mut Self> {
        let (first, second) = pair(key)?;
        self.put(first, second, value)
    }

    pub fn get(&self, first: char, second: char) -> Option<&V> {
        self.rows.get(first).and_then(|row| row.get(second))
    }

    pub fn get_pair(&self, key: &str) -> Result<Option<&V>> {
        let (first, second) = pair(key)?;
        Ok(self.get(first, second))
    }

    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
