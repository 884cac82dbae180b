//! Lexical fuzzy matching: phonetic and gapped-LCS search of words in text,
//! multi-pattern search over compressed character tries and combining of
//! per-word matches into phrase matches.
//!
//! Searchers operate on text split into chars; [`utils::fold`] prepares it
//! the way the phonetic tables expect (uppercase, no accents).

pub mod error;
pub mod utils;
pub mod collect;
pub mod trie;
pub mod search;
pub mod combine;
pub mod query;
pub mod phrase;

#[cfg(feature = "python")]
mod python;

pub use error::{Error, Result};
pub use collect::{CharMap, CharTable, LetterMap, LetterSet, LetterTable};
pub use trie::{TrieCursor, TrieMap, TrieSet};
pub use search::{CacheStats, LcsParams, LcsSearch, PhoneticCosts, PhoneticSearch, ScoredMatch, Searcher};
pub use combine::{find_best_combined_match, Sequence};
pub use query::PhraseQuery;
pub use phrase::{find_phrase, PhraseMatch};
