//! Compressed character trie.
//!
//! Chains of single-child nodes are stored as one multi-character edge
//! (node label). Children of a node are kept in a [`CharMap`] keyed by the
//! first character of their label, so the typical 0/1 child case costs no
//! hashing at all.

use std::fmt;

use crate::collect::CharMap;

mod cursor;

pub use cursor::TrieCursor;

#[derive(Debug)]
pub(crate) struct Node<V> {
    /// Edge leading into this node, first character included. Empty for root.
    pub(crate) label: Box<[char]>,
    pub(crate) value: Option<V>,
    pub(crate) children: CharMap<Box<Node<V>>>,
}

impl<V> Node<V> {
    fn new(label: Box<[char]>, value: Option<V>) -> Node<V> {
        Node {
            label,
            value,
            children: CharMap::new(),
        }
    }

    /// Node of the exact key, walking compressed edges char by char.
    fn find<I>(&self, mut key: I) -> Option<&Node<V>>
    where
        I: Iterator<Item = char>,
    {
        let mut node = self;
        while let Some(c) = key.next() {
            node = node.children.get(c).map(|child| &**child)?;
            /* First label character is the child key itself */
            for &expected in node.label[1..].iter() {
                if key.next() != Some(expected) {
                    return None;
                }
            }
        }
        Some(node)
    }

    /// Insert below this node; `rest` is the key remainder after its label.
    ///
    /// Returns the value displaced by the resolver and whether a new key was
    /// added.
    fn merge<F>(&mut self, rest: &[char], value: V, resolver: F) -> (Option<V>, bool)
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        let c = match rest.first() {
            None => {
                return match self.value.take() {
                    None => {
                        self.value = Some(value);
                        (None, true)
                    }
                    Some(old) => match resolver(&old, value) {
                        Some(merged) => {
                            self.value = Some(merged);
                            (Some(old), false)
                        }
                        None => {
                            self.value = Some(old);
                            (None, false)
                        }
                    },
                };
            }
            Some(&c) => c,
        };

        let child = match self.children.get_mut(c) {
            Some(child) => child,
            None => {
                self.children.replace(c, Box::new(Node::new(rest.into(), Some(value))));
                return (None, true);
            }
        };

        let common = child
            .label
            .iter()
            .zip(rest.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if common < child.label.len() {
            /* Split the edge at the divergence point */
            let head: Box<[char]> = child.label[..common].into();
            let mut tail = std::mem::replace(&mut **child, Node::new(head, None));
            tail.label = tail.label[common..].into();
            child.children.replace(tail.label[0], Box::new(tail));
        }
        child.merge(&rest[common..], value, resolver)
    }

    /// Remove the value of the key below this node and re-compress the path.
    fn remove(&mut self, rest: &[char]) -> Option<V> {
        let c = match rest.first() {
            None => return self.value.take(),
            Some(&c) => c,
        };
        let child = self.children.get_mut(c)?;
        let label_len = child.label.len();
        if rest.len() < label_len || child.label[..] != rest[..label_len] {
            return None;
        }
        let removed = child.remove(&rest[label_len..])?;

        let prune = child.value.is_none() && child.children.is_empty();
        if !prune && child.value.is_none() {
            /* Valueless node with a single child merges into it */
            if let Some((_, grandchild)) = child.children.take_single() {
                let mut label = child.label.to_vec();
                label.extend_from_slice(&grandchild.label);
                let mut merged = *grandchild;
                merged.label = label.into_boxed_slice();
                **child = merged;
            }
        }
        if prune {
            self.children.detach(c);
        }
        Some(removed)
    }

    fn count_nodes(&self) -> usize {
        self.children.iter().map(|(_, child)| 1 + child.count_nodes()).sum()
    }

    /* Every leaf holds a value, so the deepest leaf ends the longest key */
    fn height(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| child.label.len() + child.height())
            .max()
            .unwrap_or(0)
    }
}

/// Map from strings to values stored as a compressed trie.
pub struct TrieMap<V> {
    root: Node<V>,
    len: usize,
}

impl<V> TrieMap<V> {
    pub fn new() -> TrieMap<V> {
        TrieMap {
            root: Node::new(Box::new([]), None),
            len: 0,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes below the root; computed on request.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Length in chars of the longest stored key.
    pub fn longest_key_len(&self) -> usize {
        self.root.height()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.root.find(key.chars()).and_then(|node| node.value.as_ref())
    }

    /// Lookup by a key already split into characters.
    pub fn get_chars(&self, key: &[char]) -> Option<&V> {
        self.root.find(key.iter().copied()).and_then(|node| node.value.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`, combining it with an existing value.
    ///
    /// When the key is already present, `resolver(old, new)` decides the stored
    /// value; `None` keeps the old one. Returns the value displaced from the
    /// map, if any.
    pub fn merge<F>(&mut self, key: &str, value: V, resolver: F) -> Option<V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        let key: Vec<char> = key.chars().collect();
        let (old, added) = self.root.merge(&key, value, resolver);
        if added {
            self.len += 1;
        }
        old
    }

    /// Store a value, returning the replaced one.
    pub fn put(&mut self, key: &str, value: V) -> Option<V> {
        self.merge(key, value, |_, new| Some(new))
    }

    /// Store a value unless the key is already present.
    pub fn put_if_absent(&mut self, key: &str, value: V) -> bool {
        let before = self.len;
        self.merge(key, value, |_, _| None);
        self.len > before
    }

    /// Remove the key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let key: Vec<char> = key.chars().collect();
        let removed = self.root.remove(&key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.root = Node::new(Box::new([]), None);
        self.len = 0;
    }

    /// Cursor positioned at the root, i.e. at the empty prefix.
    pub fn cursor(&self) -> TrieCursor<'_, V> {
        TrieCursor::new(&self.root)
    }

    /// Entries in key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cursor: self.cursor(),
            started: false,
            done: false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }
}

impl<V> Default for TrieMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TrieMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for TrieMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TrieMap::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for TrieMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key.as_ref(), value);
        }
    }
}

impl<'a, V> IntoIterator for &'a TrieMap<V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// Depth-first, key-ordered traversal driven by a [`TrieCursor`].
pub struct Iter<'a, V> {
    cursor: TrieCursor<'a, V>,
    started: bool,
    done: bool,
}

impl<'a, V> Iter<'a, V> {
    fn entry(&self) -> Option<(String, &'a V)> {
        self.cursor
            .value()
            .map(|value| (self.cursor.current_prefix(), value))
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if let Some(entry) = self.entry() {
                return Some(entry);
            }
        }
        loop {
            if self.cursor.has_next() {
                if self.cursor.next().is_err() {
                    break;
                }
            } else {
                /* Backtrack to the closest untried sibling */
                loop {
                    if self.cursor.has_more() {
                        if self.cursor.more().is_err() {
                            self.done = true;
                            return None;
                        }
                        break;
                    }
                    if self.cursor.back().is_err() {
                        self.done = true;
                        return None;
                    }
                }
            }
            if let Some(entry) = self.entry() {
                return Some(entry);
            }
        }
        self.done = true;
        None
    }
}

/// Set of strings stored as a compressed trie.
#[derive(Default)]
pub struct TrieSet {
    map: TrieMap<()>,
}

impl TrieSet {
    pub fn new() -> TrieSet {
        TrieSet { map: TrieMap::new() }
    }

    /// Add a key; false if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        self.map.put_if_absent(key, ())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    pub fn cursor(&self) -> TrieCursor<'_, ()> {
        self.map.cursor()
    }

    /// Keys in order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.map.keys()
    }

    /// Underlying map, e.g. to serve as a search dictionary.
    pub fn as_map(&self) -> &TrieMap<()> {
        &self.map
    }
}

impl fmt::Debug for TrieSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: AsRef<str>> FromIterator<K> for TrieSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TrieSet::new();
        for key in iter {
            set.insert(key.as_ref());
        }
        set
    }
}
