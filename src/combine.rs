//! Assembling per-word matches into the best scoring phrase match.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::error::{Error, Result};
use crate::search::ScoredMatch;

/// Word slots fit in the bitmap of a sequence.
pub const MAX_SLOTS: usize = 32;

#[derive(Debug)]
struct Link {
    pred: Option<Sequence>,
    /// Slots of all words in the chain
    slots: u32,
    slot: usize,
    /// Product of distance coefficients applied so far
    coef: f64,
    word: ScoredMatch,
    score: f64,
    first_start: usize,
}

/// Chain of non-overlapping single-word matches, ordered by position.
///
/// Extending a sequence shares its whole chain with the new one, so cloning
/// and appending never copy earlier words.
#[derive(Debug, Clone)]
pub struct Sequence(Arc<Link>);

impl Sequence {
    /// One-word sequence of a match of word `slot`.
    pub fn single(slot: usize, word: ScoredMatch) -> Result<Sequence> {
        if slot >= MAX_SLOTS {
            return Err(Error::InvalidSlot(slot));
        }
        Ok(Sequence(Arc::new(Link {
            pred: None,
            slots: 1 << slot,
            slot,
            coef: 1.0,
            word,
            score: word.score,
            first_start: word.start,
        })))
    }

    /// Start of the last word.
    pub fn start(&self) -> usize {
        self.0.word.start
    }

    /// End of the last word.
    pub fn end(&self) -> usize {
        self.0.word.end
    }

    pub fn score(&self) -> f64 {
        self.0.score
    }

    /// Slot of the last word.
    pub fn slot(&self) -> usize {
        self.0.slot
    }

    /// Bitmap of slots present in the sequence.
    pub fn slots(&self) -> u32 {
        self.0.slots
    }

    /// Start of the first word.
    pub fn effective_start(&self) -> usize {
        self.0.first_start
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        let mut len = 1;
        let mut link = &self.0;
        while let Some(pred) = &link.pred {
            len += 1;
            link = &pred.0;
        }
        len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_single(&self) -> bool {
        self.0.pred.is_none()
    }

    /// Words of the sequence in text order, as `(slot, match)` pairs.
    pub fn matches(&self) -> Vec<(usize, ScoredMatch)> {
        let mut matches = Vec::new();
        let mut link = Some(&self.0);
        while let Some(current) = link {
            matches.push((current.slot, current.word));
            link = current.pred.as_ref().map(|pred| &pred.0);
        }
        matches.reverse();
        matches
    }

    /// Whether a one-word sequence may follow this one: it can't start before
    /// this ends and its slot must not be used yet.
    pub fn can_append(&self, word: &Sequence) -> bool {
        word.is_single()
            && self.end() <= word.start()
            && self.0.slots & word.0.slots == 0
    }

    /// Extend by a one-word sequence. The word score is weighted by the
    /// coefficients applied so far, then the sum is scaled by `coef`.
    pub fn append(&self, word: &Sequence, coef: f64) -> Option<Sequence> {
        if !self.can_append(word) {
            return None;
        }
        Some(Sequence(Arc::new(Link {
            pred: Some(self.clone()),
            slots: self.0.slots | word.0.slots,
            slot: word.0.slot,
            coef: self.0.coef * coef,
            word: word.0.word,
            score: (self.0.score + word.0.score * self.0.coef) * coef,
            first_start: self.0.first_start,
        })))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq: ")?;
        for (i, (slot, word)) in self.matches().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}({}…{})", slot, word.start, word.end)?;
        }
        write!(f, " score={:.2}", self.score())
    }
}

/// Best scoring sequence of word matches where every slot occurs at most
/// once and no two words overlap.
///
/// `distance_coef` maps the gap in chars between two adjacent words to the
/// multiplier of the combined score. On equal scores the sequence found
/// first wins. `None` when there are no matches at all.
pub fn find_best_combined_match<I, F>(word_matches: I, distance_coef: F) -> Result<Option<Sequence>>
where
    I: IntoIterator<Item = (usize, ScoredMatch)>,
    F: Fn(usize) -> f64,
{
    let mut words = word_matches
        .into_iter()
        .map(|(slot, word)| Sequence::single(slot, word))
        .collect::<Result<Vec<_>>>()?;
    words.sort_by_key(Sequence::effective_start);

    let mut best: Option<Sequence> = None;
    let mut sequences: Vec<Sequence> = Vec::new();
    for word in words {
        let known = sequences.len();
        for i in 0..known {
            let current = &sequences[i];
            if !current.can_append(&word) {
                continue;
            }
            let coef = distance_coef(word.start() - current.end());
            if let Some(extended) = current.append(&word, coef) {
                if best.as_ref().map_or(true, |b| b.score() < extended.score()) {
                    best = Some(extended.clone());
                }
                sequences.push(extended);
            }
        }
        if best.as_ref().map_or(true, |b| b.score() < word.score()) {
            best = Some(word.clone());
        }
        sequences.push(word);
        trace!("Combiner holds {} sequences", sequences.len());
    }
    Ok(best)
}
