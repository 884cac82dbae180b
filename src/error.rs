use thiserror::Error;

/// Errors raised by collections, tries and the match combiner.
///
/// Absent keys and empty search results are not errors; those are reported
/// as `None` or an empty `Vec`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key character can't be stored in a `[0-9a-zA-Z]` collection.
    #[error("character {0:?} is outside of the [0-9a-zA-Z] range")]
    OutOfAlphabet(char),

    /// Two-level tables are keyed by exactly two characters.
    #[error("two-character key expected, got {0:?}")]
    InvalidKeyLength(String),

    /// Combined sequences track at most 32 word slots.
    #[error("word slot {0} is outside of the 0..32 range")]
    InvalidSlot(usize),

    /// Data prepared from a text doesn't cover the text it is used with.
    #[error("prepared data covers {actual} chars, text has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Mutation attempted on a frozen collection.
    #[error("collection is frozen")]
    Immutable,

    /// Cursor move that the trie structure can't satisfy.
    #[error("no such element: {0}")]
    NoSuchElement(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
