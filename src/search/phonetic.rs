use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::collect::LetterSet;
use crate::error::{Error, Result};
use crate::trie::TrieMap;

use super::tables::{DIGRAPHS, SUBS};
use super::{coverage_score, CacheStats, PreparedCache, ScoredMatch, Searcher, DEFAULT_CACHE_SIZE};

/// Prices of the edits tolerated by [`PhoneticSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneticCosts {
    /// One letter written as a phonetically equivalent one ("K" ~ "C").
    pub substitution: f64,
    /// Digraph written as a single letter or another digraph ("PH" ~ "F").
    pub digraph: f64,
    /// Single char missing from, or extra in, the text.
    pub gap: f64,
    /// Single char replaced by an unrelated one.
    pub replace: f64,
}

impl Default for PhoneticCosts {
    fn default() -> Self {
        PhoneticCosts {
            substitution: 0.5,
            digraph: 0.5,
            gap: 1.0,
            replace: 2.0,
        }
    }
}

impl PhoneticCosts {
    pub fn substitution(mut self, cost: f64) -> Self {
        self.substitution = cost;
        self
    }

    pub fn digraph(mut self, cost: f64) -> Self {
        self.digraph = cost;
        self
    }

    pub fn gap(mut self, cost: f64) -> Self {
        self.gap = cost;
        self
    }

    pub fn replace(mut self, cost: f64) -> Self {
        self.replace = cost;
        self
    }
}

/// Digraph equivalents of every `text[j - 1], text[j]` pair, at index `j`.
///
/// Compute once when many patterns are searched in the same text.
pub fn extract_digraphs(text: &[char]) -> Vec<LetterSet> {
    let mut digraphs = vec![LetterSet::EMPTY; text.len()];
    for j in 1..text.len() {
        if let Some(&set) = DIGRAPHS.get(text[j - 1], text[j]) {
            digraphs[j] = set;
        }
    }
    digraphs
}

/// Cheapest partial match: accumulated cost and where in the text it started.
#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: f64,
    start: usize,
}

const UNREACHED: Cell = Cell {
    cost: f64::INFINITY,
    start: 0,
};

impl Cell {
    fn is_reached(&self) -> bool {
        self.cost.is_finite()
    }
}

/// One pattern character worth of the DP table.
///
/// Cell `j + 2` holds the best partial match ending at text offset `j`.
/// `visit` lists the offsets the next rows have to look at, ascending.
#[derive(Debug, Clone)]
struct Row {
    cells: Vec<Cell>,
    visit: Vec<usize>,
    found: bool,
}

impl Row {
    /// Row before the pattern: free to start anywhere.
    fn initial(len: usize) -> Row {
        Row {
            cells: (0..len + 2)
                .map(|j| Cell { cost: 0.0, start: j.saturating_sub(1) })
                .collect(),
            visit: (0..len).collect(),
            found: true,
        }
    }

    fn unreached(len: usize) -> Row {
        Row {
            cells: vec![UNREACHED; len + 2],
            visit: Vec::new(),
            found: false,
        }
    }
}

/// Inputs of a single search run.
struct Table<'a> {
    text: &'a [char],
    digraphs: &'a [LetterSet],
    costs: PhoneticCosts,
    max_cost: f64,
}

impl<'a> Table<'a> {
    /// Compute the row of pattern char `a` from the two rows before it.
    fn step(&self, prev2: &Row, prev1: &Row, prev_char: Option<char>, a: char) -> Row {
        let len = self.text.len();
        let costs = &self.costs;
        let mut row = Row::unreached(len);

        let la = prev_char
            .and_then(|p| DIGRAPHS.get(p, a).copied())
            .unwrap_or(LetterSet::EMPTY);
        let sa = SUBS.get(a).copied().unwrap_or(LetterSet::EMPTY);
        let (t0, t1) = (&prev1.cells, &prev2.cells);

        for j in prev1.visit.iter().merge(prev2.visit.iter()).dedup().copied() {
            let b = self.text[j];
            let lb = self.digraphs[j];
            let mut best = UNREACHED;
            let mut consider = |cell: Cell, extra: f64| {
                if cell.is_reached() && cell.cost + extra < best.cost {
                    best = Cell { cost: cell.cost + extra, start: cell.start };
                }
            };

            /* Literal or phonetic match, optionally next to a single slip */
            let matched = if a == b {
                Some(0.0)
            } else if sa.contains(b) || SUBS.get(b).map_or(false, |sb| sb.contains(a)) {
                Some(costs.substitution)
            } else {
                None
            };
            if let Some(cost) = matched {
                consider(t0[j + 1], cost);
                consider(t0[j], cost + costs.gap);
                consider(t1[j + 1], cost + costs.gap);
                consider(t1[j], cost + costs.replace);
            }

            /* Pattern digraph written as a single text char */
            if la.contains(b) {
                consider(t1[j + 1], costs.digraph);
                consider(t1[j], costs.digraph + costs.gap);
            }
            /* Text digraph written as a single pattern char */
            if lb.contains(a) {
                consider(t0[j], costs.digraph);
                consider(t1[j], costs.digraph + costs.gap);
            }
            /* Two digraphs standing for the same sound */
            if la.intersects(&lb) {
                consider(t1[j], costs.digraph);
            }

            if best.is_reached() && best.cost <= self.max_cost {
                row.cells[j + 2] = best;
                row.found = true;
                for p in (j + 1..=j + 2).filter(|&p| p < len) {
                    if row.visit.last() != Some(&p) {
                        row.visit.push(p);
                    }
                }
            }
        }
        row
    }

    /// Matches of the whole pattern, read from its last two rows.
    ///
    /// Keeps the cheapest match per start (the longer one on ties), then
    /// drops overlapping matches in favour of the cheaper (earlier on ties).
    fn collect(&self, last: &Row, prev: &Row, max_cost: f64) -> Vec<ScoredMatch> {
        let mut by_start: BTreeMap<usize, ScoredMatch> = BTreeMap::new();
        let mut offer = |start: usize, end: usize, cost: f64| {
            if end <= start || cost > max_cost {
                return;
            }
            let candidate = ScoredMatch::new(start, end, cost);
            by_start
                .entry(start)
                .and_modify(|m| {
                    if cost < m.score {
                        *m = candidate;
                    }
                })
                .or_insert(candidate);
        };

        for j in (1..=self.text.len() + 1).rev() {
            let cell = last.cells[j];
            if cell.is_reached() {
                offer(cell.start, j - 1, cell.cost);
            }
            /* Pattern tail missing from the text */
            let cell = prev.cells[j];
            if cell.is_reached() {
                offer(cell.start, j - 1, cell.cost + self.costs.gap);
            }
        }

        let mut kept: Vec<ScoredMatch> = Vec::with_capacity(by_start.len());
        for m in by_start.into_values() {
            match kept.last_mut() {
                Some(last) if last.end > m.start => {
                    if m.score < last.score {
                        *last = m;
                    }
                }
                _ => kept.push(m),
            }
        }
        kept
    }
}

/// Search for phonetically equivalent occurrences of words.
///
/// Differs from a Levenshtein-like search in two ways: besides letter
/// substitutions ("K" ~ "C") it equates digraphs with letters ("PH" ~ "F")
/// and with other digraphs ("ZZ" ~ "TS"), and it tolerates only isolated
/// non-phonetic edits. "PVIKZZA" matches "PITSNA", as every slip is
/// surrounded by matching letters, but "PIVKZZA" never matches "PITSA"
/// whatever the cost limit.
///
/// Costs are live state; they are not validated.
#[derive(Debug)]
pub struct PhoneticSearch {
    costs: PhoneticCosts,
    /// LRU cache of text digraphs.
    cache: PreparedCache<Vec<LetterSet>>,
}

impl PhoneticSearch {
    pub fn new() -> PhoneticSearch {
        PhoneticSearch::with_costs(PhoneticCosts::default())
    }

    pub fn with_costs(costs: PhoneticCosts) -> PhoneticSearch {
        PhoneticSearch::with_cache(costs, DEFAULT_CACHE_SIZE)
    }

    /// Searcher remembering digraphs of up to `cache_size` recent texts.
    pub fn with_cache(costs: PhoneticCosts, cache_size: usize) -> PhoneticSearch {
        PhoneticSearch {
            costs,
            cache: PreparedCache::new(cache_size),
        }
    }

    pub fn costs(&self) -> PhoneticCosts {
        self.costs
    }

    pub fn set_costs(&mut self, costs: PhoneticCosts) -> &mut Self {
        self.costs = costs;
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn digraphs(&self, text: &[char]) -> Arc<Vec<LetterSet>> {
        self.cache.get_or_prepare(text, extract_digraphs)
    }

    /// Occurrences of `pattern` in `text` costing at most `max_cost`, sorted
    /// by start. Match scores are the edit costs.
    pub fn find_occurrences(&self, text: &[char], pattern: &[char], max_cost: f64) -> Vec<ScoredMatch> {
        if text.is_empty() || pattern.is_empty() {
            return Vec::new();
        }
        let digraphs = self.digraphs(text);
        self.occurrences(text, &digraphs, pattern, max_cost)
    }

    /// Same as [`PhoneticSearch::find_occurrences`] with digraphs prepared by
    /// [`extract_digraphs`].
    ///
    /// Fails when `digraphs` were prepared from a text of another length.
    pub fn find_occurrences_with_digraphs(&self, text: &[char], digraphs: &[LetterSet],
                                          pattern: &[char], max_cost: f64) -> Result<Vec<ScoredMatch>> {
        if digraphs.len() != text.len() {
            return Err(Error::LengthMismatch { expected: text.len(), actual: digraphs.len() });
        }
        Ok(self.occurrences(text, digraphs, pattern, max_cost))
    }

    fn occurrences(&self, text: &[char], digraphs: &[LetterSet], pattern: &[char],
                   max_cost: f64) -> Vec<ScoredMatch> {
        if text.is_empty() || pattern.is_empty() {
            return Vec::new();
        }
        debug!("Phonetic search of {} chars pattern in {} chars text, max cost {}",
               pattern.len(), text.len(), max_cost);

        let table = Table {
            text,
            digraphs,
            costs: self.costs,
            max_cost,
        };
        let mut prev2 = Row::unreached(text.len());
        let mut prev1 = Row::initial(text.len());
        for (i, &a) in pattern.iter().enumerate() {
            let prev_char = i.checked_sub(1).map(|k| pattern[k]);
            let row = table.step(&prev2, &prev1, prev_char, a);
            trace!("Pattern char {} reached {} offsets", i, row.visit.len());
            /* Nothing found on the current and previous rows */
            if !row.found && !prev1.found {
                debug!("Phonetic search gave up at pattern char {}", i);
                return Vec::new();
            }
            prev2 = std::mem::replace(&mut prev1, row);
        }

        let matches = table.collect(&prev1, &prev2, max_cost);
        debug!("Phonetic search found {} matches", matches.len());
        matches
    }

    /// Cost limit that corresponds to a minimal similarity.
    fn max_cost(min_score: f64, pattern_len: usize) -> f64 {
        (1.0 - min_score) * pattern_len as f64
    }

    fn similarity(cost: f64, pattern_len: usize) -> f64 {
        (1.0 - cost / pattern_len as f64).max(0.0)
    }
}

impl Default for PhoneticSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for PhoneticSearch {
    fn search<F>(&self, text: &[char], pattern: &[char], min_score: f64, mut on_match: F) -> usize
    where
        F: FnMut(ScoredMatch),
    {
        let max_cost = Self::max_cost(min_score, pattern.len());
        let matches = self.find_occurrences(text, pattern, max_cost);
        for m in matches.iter() {
            on_match(ScoredMatch::new(m.start, m.end, Self::similarity(m.score, pattern.len())));
        }
        matches.len()
    }

    /// Walks the dictionary with a cursor: keys sharing a prefix share its
    /// rows, and a subtree is skipped once two consecutive rows are empty.
    fn search_dictionary<V, F>(&self, text: &[char], dictionary: &TrieMap<V>, min_score: f64,
                               mut on_match: F) -> usize
    where
        F: FnMut(ScoredMatch, &V),
    {
        if text.is_empty() || dictionary.is_empty() {
            return 0;
        }
        let digraphs = self.digraphs(text);
        let table = Table {
            text,
            digraphs: &digraphs,
            costs: self.costs,
            max_cost: Self::max_cost(min_score, dictionary.longest_key_len()),
        };
        debug!("Phonetic search of {} keys in {} chars text", dictionary.len(), text.len());

        /* Rows of the prefix, preceded by the unreached row and the initial one */
        let mut rows = vec![Row::unreached(text.len()), Row::initial(text.len())];
        let mut cursor = dictionary.cursor();
        let mut found = 0;

        loop {
            let top = rows.len() - 1;
            let alive = rows[top].found || rows[top - 1].found;
            if alive && cursor.has_next() {
                let c = match cursor.next() {
                    Ok(c) => c,
                    Err(_) => break,
                };
                let prefix = cursor.prefix();
                let prev_char = prefix.len().checked_sub(2).map(|k| prefix[k]);
                let row = table.step(&rows[top - 1], &rows[top], prev_char, c);
                rows.push(row);
            } else {
                /* Backtrack to the closest untried sibling */
                loop {
                    if cursor.has_more() {
                        let c = match cursor.more() {
                            Ok(c) => c,
                            Err(_) => return found,
                        };
                        rows.pop();
                        let top = rows.len() - 1;
                        let prefix = cursor.prefix();
                        let prev_char = prefix.len().checked_sub(2).map(|k| prefix[k]);
                        let row = table.step(&rows[top - 1], &rows[top], prev_char, c);
                        rows.push(row);
                        break;
                    }
                    if cursor.back().is_err() {
                        debug!("Phonetic dictionary search found {} matches", found);
                        return found;
                    }
                    rows.pop();
                }
            }

            if let Some(value) = cursor.value() {
                let key_len = cursor.depth();
                let top = rows.len() - 1;
                let max_cost = Self::max_cost(min_score, key_len);
                for m in table.collect(&rows[top], &rows[top - 1], max_cost) {
                    on_match(ScoredMatch::new(m.start, m.end, Self::similarity(m.score, key_len)), value);
                    found += 1;
                }
            }
        }
        found
    }

    fn score(&self, word: &[char], pattern: &[char]) -> f64 {
        coverage_score(self, word, pattern)
    }
}
