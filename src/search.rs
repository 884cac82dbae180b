//! Approximate search of patterns within text.
//!
//! Two engines share the [`Searcher`] contract: [`PhoneticSearch`] (phonetic
//! substitutions, digraphs and isolated single-char slips) and [`LcsSearch`]
//! (gapped longest common subsequence). Both keep a small LRU cache of data
//! prepared from the searched text, so searching many patterns in one text
//! pays for the preparation once.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;
use serde::Serialize;

use crate::trie::TrieMap;

mod lcs;
mod phonetic;
mod tables;

pub use lcs::{
    find_lcs_occurrences, find_lcs_occurrences_with_positions, to_position_char_map, LcsParams, LcsSearch,
    PositionMap,
};
pub use phonetic::{extract_digraphs, PhoneticCosts, PhoneticSearch};
pub use tables::{digraph_equivalents, substitutes};

/* Fast hashing, but requires AES-ni extensions */
pub type FastHash = ahash::RandomState;

/// Texts kept prepared by each searcher.
const DEFAULT_CACHE_SIZE: usize = 256;

/// Approximate occurrence of a pattern: text range `start..end` and its score.
///
/// Meaning of the score depends on the producer: edit cost for
/// [`PhoneticSearch::find_occurrences`], matched characters for
/// [`find_lcs_occurrences`] and similarity in `0..=1` for [`Searcher`] methods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl ScoredMatch {
    pub fn new(start: usize, end: usize, score: f64) -> ScoredMatch {
        ScoredMatch { start, end, score }
    }

    /// Number of text characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ScoredMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}…{}, {:.2})", self.start, self.end, self.score)
    }
}

/// Search capability shared by the phonetic and LCS engines.
///
/// Scores passed to callbacks are similarities: 1.0 is an exact occurrence.
pub trait Searcher {
    /// Report occurrences of `pattern` in `text` scoring at least
    /// `min_score`. Returns the number of reported matches.
    fn search<F>(&self, text: &[char], pattern: &[char], min_score: f64, on_match: F) -> usize
    where
        F: FnMut(ScoredMatch);

    /// Report occurrences in `text` of every key of `dictionary`, together
    /// with the key's value.
    fn search_dictionary<V, F>(&self, text: &[char], dictionary: &TrieMap<V>, min_score: f64,
                               on_match: F) -> usize
    where
        F: FnMut(ScoredMatch, &V);

    /// How similar is `pattern` to the whole `word`.
    fn score(&self, word: &[char], pattern: &[char]) -> f64;
}

/// Best similarity of a match, scaled by the fraction of the word it covers.
pub(crate) fn coverage_score<S: Searcher>(searcher: &S, word: &[char], pattern: &[char]) -> f64 {
    if word.is_empty() || pattern.is_empty() {
        return 0.0;
    }
    let mut best = 0.0f64;
    searcher.search(word, pattern, 0.0, |m| {
        let covered = m.len() as f64 / word.len() as f64;
        best = best.max(m.score * covered.min(1.0));
    });
    best
}

/// Cache usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub inserts: usize,
}

struct CacheState<T> {
    entries: LruCache<Vec<char>, Arc<T>, FastHash>,
    stats: CacheStats,
}

/// LRU cache of data prepared from searched texts.
pub(crate) struct PreparedCache<T> {
    state: Mutex<CacheState<T>>,
}

impl<T> PreparedCache<T> {
    pub(crate) fn new(size: usize) -> PreparedCache<T> {
        PreparedCache {
            state: Mutex::new(CacheState {
                entries: LruCache::with_hasher(size, FastHash::new()),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Prepared data of `text`, computed by `prepare` on a miss.
    pub(crate) fn get_or_prepare<F>(&self, text: &[char], prepare: F) -> Arc<T>
    where
        F: FnOnce(&[char]) -> T,
    {
        /* LRU cache updates position even on get and needs mutable reference */
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(prepared) = state.entries.get(text) {
                let prepared = prepared.clone();
                state.stats.hits += 1;
                return prepared;
            }
            state.stats.misses += 1;
        }

        let prepared = Arc::new(prepare(text));
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.entries.put(text.to_vec(), prepared.clone());
            state.stats.inserts += 1;
        }
        prepared
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).stats
    }
}

impl<T> fmt::Debug for PreparedCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCache").field("stats", &self.stats()).finish()
    }
}

#[cfg(test)]
mod tests;
