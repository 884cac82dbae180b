//! Locating a whole phrase: every word searched on its own, then the best
//! combination of word matches picked.

use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::combine::{find_best_combined_match, MAX_SLOTS};
use crate::error::{Error, Result};
use crate::query::PhraseQuery;
use crate::search::{ScoredMatch, Searcher};
use crate::utils;

/// Best occurrence of a phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseMatch {
    /// Start of the first matched word
    pub start: usize,
    /// End of the last matched word
    pub end: usize,
    /// Combined score divided by the number of phrase words, 1.0 for an
    /// exact and contiguous occurrence.
    pub score: f64,
    /// Matched words in text order, each with its position in the phrase.
    pub words: Vec<(usize, ScoredMatch)>,
}

/// Find the best occurrence of the query phrase in a folded `text`.
///
/// Phrase words are folded with [`utils::fold`] before the search. Not all
/// words need to be found. `None` when none of them is.
pub fn find_phrase<S: Searcher>(searcher: &S, text: &[char], query: &PhraseQuery)
                                -> Result<Option<PhraseMatch>> {
    if query.words.len() > MAX_SLOTS {
        return Err(Error::InvalidSlot(query.words.len() - 1));
    }
    if query.words.is_empty() || text.is_empty() {
        return Ok(None);
    }

    let mut word_matches: Vec<(usize, ScoredMatch)> = Vec::new();
    for (slot, word) in query.words.iter().enumerate() {
        let pattern = utils::fold(word);
        let mut found: Vec<ScoredMatch> = Vec::new();
        searcher.search(text, &pattern, query.min_score, |m| found.push(m));
        if let Some(limit) = query.limit {
            found.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            found.truncate(limit);
        }
        debug!("Word {} '{}' matched {} times", slot, word, found.len());
        word_matches.extend(found.into_iter().map(|m| (slot, m)));
    }

    let best = find_best_combined_match(word_matches, |gap| query.distance_coef(gap))?;
    Ok(best.map(|sequence| PhraseMatch {
        start: sequence.effective_start(),
        end: sequence.end(),
        score: sequence.score() / query.words.len() as f64,
        words: sequence.matches(),
    }))
}
