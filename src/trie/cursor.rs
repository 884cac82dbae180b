use crate::error::{Error, Result};

use super::Node;

/// Entered node together with the way we got there.
struct Frame<'a, V> {
    node: &'a Node<V>,
    parent: &'a Node<V>,
    /// Index of `node` within the ordered child keys of `parent`.
    sibling: usize,
}

impl<'a, V> Clone for Frame<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for Frame<'a, V> {}

/// Stateful, char-by-char traversal of a [`TrieMap`](super::TrieMap).
///
/// The cursor holds a prefix, initially empty. It can be extended by one
/// character (`next`), the last character can be replaced with one of its
/// siblings (`more`) and retracted (`back`), all without walking from the
/// root again. A failed move leaves the cursor untouched.
///
/// Positions count characters of the prefix from zero; the root is at no
/// position at all.
pub struct TrieCursor<'a, V> {
    root: &'a Node<V>,
    frames: Vec<Frame<'a, V>>,
    /// Offset of the current character within the label of the top node.
    edge_pos: usize,
    prefix: Vec<char>,
}

impl<'a, V> Clone for TrieCursor<'a, V> {
    fn clone(&self) -> Self {
        TrieCursor {
            root: self.root,
            frames: self.frames.clone(),
            edge_pos: self.edge_pos,
            prefix: self.prefix.clone(),
        }
    }
}

impl<'a, V> TrieCursor<'a, V> {
    pub(super) fn new(root: &'a Node<V>) -> TrieCursor<'a, V> {
        TrieCursor {
            root,
            frames: Vec::new(),
            edge_pos: 0,
            prefix: Vec::new(),
        }
    }

    fn node(&self) -> &'a Node<V> {
        self.frames.last().map_or(self.root, |frame| frame.node)
    }

    /* Inside of a compressed edge, the next character is fixed */
    fn on_edge(&self) -> bool {
        self.edge_pos + 1 < self.node().label.len()
    }

    fn at_node_end(&self) -> bool {
        self.frames.is_empty() || self.edge_pos + 1 == self.node().label.len()
    }

    /// Can the prefix be extended at all?
    pub fn has_next(&self) -> bool {
        self.on_edge() || !self.node().children.is_empty()
    }

    /// Can the prefix be extended by `c`?
    pub fn has_next_with(&self, c: char) -> bool {
        let node = self.node();
        if self.on_edge() {
            node.label[self.edge_pos + 1] == c
        } else {
            node.children.contains_key(c)
        }
    }

    /// Extend the prefix by the first available character.
    pub fn next(&mut self) -> Result<char> {
        let node = self.node();
        if self.on_edge() {
            return Ok(self.step_on_edge(node));
        }
        let c = *node
            .children
            .keys()
            .first()
            .ok_or(Error::NoSuchElement("prefix can't be extended"))?;
        self.descend(node, 0, c)
    }

    /// Extend the prefix by `c`.
    ///
    /// Sibling enumeration by [`TrieCursor::more`] continues after `c`.
    pub fn next_with(&mut self, c: char) -> Result<char> {
        let node = self.node();
        if self.on_edge() {
            if node.label[self.edge_pos + 1] != c {
                return Err(Error::NoSuchElement("prefix can't be extended by this char"));
            }
            return Ok(self.step_on_edge(node));
        }
        let sibling = node
            .children
            .keys()
            .binary_search(&c)
            .map_err(|_| Error::NoSuchElement("prefix can't be extended by this char"))?;
        self.descend(node, sibling, c)
    }

    fn step_on_edge(&mut self, node: &'a Node<V>) -> char {
        self.edge_pos += 1;
        let c = node.label[self.edge_pos];
        self.prefix.push(c);
        c
    }

    fn descend(&mut self, parent: &'a Node<V>, sibling: usize, c: char) -> Result<char> {
        let node = parent
            .children
            .get(c)
            .map(|child| &**child)
            .ok_or(Error::NoSuchElement("no such child"))?;
        self.frames.push(Frame { node, parent, sibling });
        self.edge_pos = 0;
        self.prefix.push(c);
        Ok(c)
    }

    /// Is there an untried sibling of the last character?
    ///
    /// Only branch points have siblings; inside an edge this is always false.
    pub fn has_more(&self) -> bool {
        if self.edge_pos > 0 {
            return false;
        }
        match self.frames.last() {
            Some(frame) => frame.sibling + 1 < frame.parent.children.len(),
            None => false,
        }
    }

    /// Can the last character be replaced with `c`?
    pub fn has_more_with(&self, c: char) -> bool {
        if self.edge_pos > 0 {
            return false;
        }
        match self.frames.last() {
            Some(frame) => frame.node.label[0] != c && frame.parent.children.contains_key(c),
            None => false,
        }
    }

    /// Replace the last character with its next sibling.
    pub fn more(&mut self) -> Result<char> {
        if !self.has_more() {
            return Err(Error::NoSuchElement("no more siblings"));
        }
        let frame = self.frames[self.frames.len() - 1];
        let sibling = frame.sibling + 1;
        let c = frame.parent.children.keys()[sibling];
        self.switch_to(frame.parent, sibling, c)
    }

    /// Replace the last character with sibling `c`.
    pub fn more_with(&mut self, c: char) -> Result<char> {
        if !self.has_more_with(c) {
            return Err(Error::NoSuchElement("no such sibling"));
        }
        let frame = self.frames[self.frames.len() - 1];
        let sibling = frame
            .parent
            .children
            .keys()
            .binary_search(&c)
            .map_err(|_| Error::NoSuchElement("no such sibling"))?;
        self.switch_to(frame.parent, sibling, c)
    }

    fn switch_to(&mut self, parent: &'a Node<V>, sibling: usize, c: char) -> Result<char> {
        let node = parent
            .children
            .get(c)
            .map(|child| &**child)
            .ok_or(Error::NoSuchElement("no such sibling"))?;
        if let (Some(frame), Some(last)) = (self.frames.last_mut(), self.prefix.last_mut()) {
            *frame = Frame { node, parent, sibling };
            *last = c;
        }
        Ok(c)
    }

    /// Retract the prefix by one character and return that character.
    pub fn back(&mut self) -> Result<char> {
        let c = self
            .prefix
            .pop()
            .ok_or(Error::NoSuchElement("cursor is at the root"))?;
        if self.edge_pos > 0 {
            self.edge_pos -= 1;
        } else {
            self.frames.pop();
            self.edge_pos = match self.frames.last() {
                Some(frame) => frame.node.label.len() - 1,
                None => 0,
            };
        }
        Ok(c)
    }

    /// Is the current prefix a stored key?
    pub fn has_value(&self) -> bool {
        self.value().is_some()
    }

    /// Value stored under the current prefix.
    pub fn value(&self) -> Option<&'a V> {
        if self.at_node_end() {
            self.node().value.as_ref()
        } else {
            None
        }
    }

    /// Position of the last prefix character, `None` at the root.
    pub fn current_position(&self) -> Option<usize> {
        self.prefix.len().checked_sub(1)
    }

    pub fn current_char(&self) -> Option<char> {
        self.prefix.last().copied()
    }

    /// Length of the current prefix.
    pub fn depth(&self) -> usize {
        self.prefix.len()
    }

    pub fn prefix(&self) -> &[char] {
        &self.prefix
    }

    pub fn current_prefix(&self) -> String {
        self.prefix.iter().collect()
    }
}
