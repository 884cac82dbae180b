use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Narrowest and widest bucket arrays of the multi-entry representation.
const MIN_WIDTH: usize = 4;
const MAX_WIDTH: usize = 64;

/// Map keyed by arbitrary characters.
///
/// Most trie nodes have at most one child, so the map switches between an
/// empty, a single-entry and a bucketed multi-entry representation as it
/// grows and shrinks. Iteration is always ordered by character code.
#[derive(Debug)]
pub struct CharMap<V> {
    repr: Repr<V>,
    frozen: bool,
}

#[derive(Debug)]
enum Repr<V> {
    Empty,
    Single(char, V),
    Multi(Box<Buckets<V>>),
}

/// Chained buckets indexed by the low bits of the character code.
#[derive(Debug)]
struct Buckets<V> {
    slots: Vec<Vec<(char, V)>>,
    /// Bit per non-empty slot.
    occupied: u64,
    len: usize,
    /// Sorted keys, rebuilt lazily after structural changes.
    sorted: OnceLock<Box<[char]>>,
}

impl<V> Buckets<V> {
    fn with_width(width: usize) -> Buckets<V> {
        Buckets {
            slots: (0..width).map(|_| Vec::new()).collect(),
            occupied: 0,
            len: 0,
            sorted: OnceLock::new(),
        }
    }

    fn slot_for(&self, c: char) -> usize {
        c as usize & (self.slots.len() - 1)
    }

    fn get(&self, c: char) -> Option<&V> {
        let slot = self.slot_for(c);
        if self.occupied & (1 << slot) == 0 {
            return None;
        }
        self.slots[slot].iter().find(|(k, _)| *k == c).map(|(_, v)| v)
    }

    fn get_mut(&mut self, c: char) -> Option<&mut V> {
        let slot = self.slot_for(c);
        self.slots[slot].iter_mut().find(|(k, _)| *k == c).map(|(_, v)| v)
    }

    fn insert(&mut self, c: char, value: V) -> Option<V> {
        let slot = self.slot_for(c);
        if let Some(entry) = self.slots[slot].iter_mut().find(|(k, _)| *k == c) {
            return Some(std::mem::replace(&mut entry.1, value));
        }
        self.slots[slot].push((c, value));
        self.occupied |= 1 << slot;
        self.len += 1;
        self.sorted = OnceLock::new();
        if self.len > self.slots.len() && self.slots.len() < MAX_WIDTH {
            self.rehash(self.slots.len() * 2);
        }
        None
    }

    fn take(&mut self, c: char) -> Option<V> {
        let slot = self.slot_for(c);
        let pos = self.slots[slot].iter().position(|(k, _)| *k == c)?;
        let (_, value) = self.slots[slot].swap_remove(pos);
        if self.slots[slot].is_empty() {
            self.occupied &= !(1 << slot);
        }
        self.len -= 1;
        self.sorted = OnceLock::new();
        if self.slots.len() > MIN_WIDTH && self.len * 4 < self.slots.len() {
            self.rehash(self.slots.len() / 2);
        }
        Some(value)
    }

    fn rehash(&mut self, width: usize) {
        let entries: Vec<(char, V)> = self.slots.drain(..).flatten().collect();
        self.slots = (0..width).map(|_| Vec::new()).collect();
        self.occupied = 0;
        for (c, value) in entries {
            let slot = self.slot_for(c);
            self.slots[slot].push((c, value));
            self.occupied |= 1 << slot;
        }
    }

    /// Removes and returns the only remaining entry.
    fn into_single(self) -> Option<(char, V)> {
        self.slots.into_iter().flatten().next()
    }

    fn keys(&self) -> &[char] {
        self.sorted.get_or_init(|| {
            let mut keys: Vec<char> = self.slots.iter().flatten().map(|(c, _)| *c).collect();
            keys.sort_unstable();
            keys.into_boxed_slice()
        })
    }
}

impl<V> CharMap<V> {
    pub fn new() -> CharMap<V> {
        CharMap {
            repr: Repr::Empty,
            frozen: false,
        }
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Single(..) => 1,
            Repr::Multi(buckets) => buckets.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    pub fn get(&self, c: char) -> Option<&V> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Single(k, v) => (*k == c).then_some(v),
            Repr::Multi(buckets) => buckets.get(c),
        }
    }

    pub fn contains_key(&self, c: char) -> bool {
        self.get(c).is_some()
    }

    /// Mutable access for owners that manage structure themselves (trie
    /// nodes); doesn't consult the frozen flag.
    pub(crate) fn get_mut(&mut self, c: char) -> Option<&mut V> {
        match &mut self.repr {
            Repr::Empty => None,
            Repr::Single(k, v) => (*k == c).then_some(v),
            Repr::Multi(buckets) => buckets.get_mut(c),
        }
    }

    /// Store a value, replacing any previous one.
    pub fn put(&mut self, c: char, value: V) -> Result<&mut Self> {
        self.insert(c, value)?;
        Ok(self)
    }

    /// Store several values in order; stops at the first failure.
    pub fn put_all<I>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (char, V)>,
    {
        for (c, value) in entries {
            self.insert(c, value)?;
        }
        Ok(self)
    }

    /// Drop the entry of `c`, if any.
    pub fn remove(&mut self, c: char) -> Result<&mut Self> {
        self.take(c)?;
        Ok(self)
    }

    /// Store a value and return the replaced one.
    pub fn insert(&mut self, c: char, value: V) -> Result<Option<V>> {
        self.check_mutable()?;
        Ok(self.replace(c, value))
    }

    /// Remove the entry of `c` and return its value.
    ///
    /// Shrinks back to the single-entry and empty representations.
    pub fn take(&mut self, c: char) -> Result<Option<V>> {
        self.check_mutable()?;
        Ok(self.detach(c))
    }

    pub(crate) fn replace(&mut self, c: char, value: V) -> Option<V> {
        let repr = std::mem::replace(&mut self.repr, Repr::Empty);
        let (repr, old) = match repr {
            Repr::Empty => (Repr::Single(c, value), None),
            Repr::Single(k, v) if k == c => (Repr::Single(k, value), Some(v)),
            Repr::Single(k, v) => {
                let mut buckets = Buckets::with_width(MIN_WIDTH);
                buckets.insert(k, v);
                buckets.insert(c, value);
                (Repr::Multi(Box::new(buckets)), None)
            }
            Repr::Multi(mut buckets) => {
                let old = buckets.insert(c, value);
                (Repr::Multi(buckets), old)
            }
        };
        self.repr = repr;
        old
    }

    pub(crate) fn detach(&mut self, c: char) -> Option<V> {
        let repr = std::mem::replace(&mut self.repr, Repr::Empty);
        let (repr, old) = match repr {
            Repr::Empty => (Repr::Empty, None),
            Repr::Single(k, v) if k == c => (Repr::Empty, Some(v)),
            single @ Repr::Single(..) => (single, None),
            Repr::Multi(mut buckets) => {
                let old = buckets.take(c);
                if buckets.len == 1 {
                    match (*buckets).into_single() {
                        Some((k, v)) => (Repr::Single(k, v), old),
                        None => (Repr::Empty, old),
                    }
                } else {
                    (Repr::Multi(buckets), old)
                }
            }
        };
        self.repr = repr;
        old
    }

    /// The only entry, when the map holds exactly one.
    pub(crate) fn take_single(&mut self) -> Option<(char, V)> {
        if !matches!(self.repr, Repr::Single(..)) {
            return None;
        }
        match std::mem::replace(&mut self.repr, Repr::Empty) {
            Repr::Single(k, v) => Some((k, v)),
            _ => None,
        }
    }

    /// Forbid any further mutation.
    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Keys in ascending character order.
    pub fn keys(&self) -> &[char] {
        match &self.repr {
            Repr::Empty => &[],
            Repr::Single(k, _) => std::slice::from_ref(k),
            Repr::Multi(buckets) => buckets.keys(),
        }
    }

    /// Entries in ascending character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &V)> {
        self.keys()
            .iter()
            .filter_map(move |&c| self.get(c).map(|v| (c, v)))
    }

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(Error::Immutable)
        } else {
            Ok(())
        }
    }
}

impl<V> Default for CharMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(char, V)> for CharMap<V> {
    fn from_iter<I: IntoIterator<Item = (char, V)>>(iter: I) -> Self {
        let mut map = CharMap::new();
        for (c, value) in iter {
            map.replace(c, value);
        }
        map
    }
}
