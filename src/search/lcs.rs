use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::trie::TrieMap;

use super::{coverage_score, CacheStats, FastHash, PreparedCache, ScoredMatch, Searcher, DEFAULT_CACHE_SIZE};

/// Char -> offset of its next occurrence strictly after each text offset,
/// `usize::MAX` when there's none.
pub type PositionMap = HashMap<char, Vec<usize>, FastHash>;

/// Limits of gapped-LCS matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcsParams {
    /// Matches span less than `max_width` text chars.
    pub max_width: usize,
    /// Least number of pattern chars a match must contain.
    pub min_lcs: usize,
    /// Longest run of pattern chars skipped between two matched ones.
    pub max_gap: usize,
}

impl Default for LcsParams {
    fn default() -> Self {
        LcsParams {
            max_width: 32,
            min_lcs: 2,
            max_gap: 2,
        }
    }
}

impl LcsParams {
    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn min_lcs(mut self, min_lcs: usize) -> Self {
        self.min_lcs = min_lcs;
        self
    }

    pub fn max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }
}

/// Next-occurrence table of every distinct char of `text`.
pub fn to_position_char_map(text: &[char]) -> PositionMap {
    let mut map: PositionMap = HashMap::with_hasher(FastHash::new());
    for &c in text {
        if map.contains_key(&c) {
            continue;
        }
        let mut next = vec![usize::MAX; text.len()];
        let mut pred = usize::MAX;
        for k in (0..text.len()).rev() {
            next[k] = pred;
            if text[k] == c {
                pred = k;
            }
        }
        map.insert(c, next);
    }
    map
}

/// Matches found so far; of two matches sharing a start or an end only the
/// one with more chars (the narrower on ties) survives.
#[derive(Default)]
struct PositionHolder {
    by_start: BTreeMap<usize, ScoredMatch>,
    by_end: HashMap<usize, ScoredMatch, FastHash>,
}

impl PositionHolder {
    fn offer(&mut self, start: usize, end: usize, score: f64) {
        let same_start = self.by_start.get(&start).copied();
        let same_end = self.by_end.get(&end).copied();
        /* Every holder sharing an end point must be beaten */
        if let Some(m) = same_start {
            if !(m.score < score || (m.score == score && end < m.end)) {
                return;
            }
        }
        if let Some(m) = same_end {
            if !(m.score < score || (m.score == score && start > m.start)) {
                return;
            }
        }
        for m in same_start.iter().chain(same_end.iter()) {
            self.drop_match(m);
        }
        let m = ScoredMatch::new(start, end, score);
        self.by_start.insert(start, m);
        self.by_end.insert(end, m);
    }

    fn drop_match(&mut self, m: &ScoredMatch) {
        self.by_start.remove(&m.start);
        self.by_end.remove(&m.end);
    }

    fn into_vec(self) -> Vec<ScoredMatch> {
        self.by_start.into_values().collect()
    }
}

/// Occurrences of `pattern` in `text` sharing a gapped common subsequence
/// with it. Match scores count the shared chars.
pub fn find_lcs_occurrences(text: &[char], pattern: &[char], params: &LcsParams) -> Vec<ScoredMatch> {
    if text.is_empty() || pattern.is_empty() {
        return Vec::new();
    }
    let positions = to_position_char_map(text);
    lcs_occurrences(text[0], &positions, text.len(), pattern, params)
}

/// Same as [`find_lcs_occurrences`] over a table prepared by
/// [`to_position_char_map`] from a text of `text_len` chars starting with
/// `first_char`.
///
/// Fails when the table was prepared from a text of another length.
pub fn find_lcs_occurrences_with_positions(first_char: char, positions: &PositionMap, text_len: usize,
                                           pattern: &[char], params: &LcsParams) -> Result<Vec<ScoredMatch>> {
    if let Some(next) = positions.values().find(|next| next.len() != text_len) {
        return Err(Error::LengthMismatch { expected: text_len, actual: next.len() });
    }
    Ok(lcs_occurrences(first_char, positions, text_len, pattern, params))
}

/* Position vectors are known to be text_len long */
fn lcs_occurrences(first_char: char, positions: &PositionMap, text_len: usize,
                   pattern: &[char], params: &LcsParams) -> Vec<ScoredMatch> {
    if text_len == 0 || pattern.is_empty() {
        return Vec::new();
    }
    let qlen = pattern.len();
    let LcsParams { max_width, min_lcs, max_gap } = *params;
    let mut found = PositionHolder::default();

    /* Next position of every pattern char */
    let next: Vec<Option<&Vec<usize>>> = pattern.iter().map(|c| positions.get(c)).collect();

    /*
     * Node [i][j] pairs pattern char i with its occurrence at text offset j.
     * node[0] - number of path edges stored
     * node[z] - least width of a path of z edges ending at the node
     */
    let mut nodes: Vec<Vec<Option<Vec<usize>>>> = vec![vec![None; text_len]; qlen];

    for i in 0..qlen {
        let next_i = match next[i] {
            Some(next_i) => next_i,
            None => continue,
        };
        let mut j = if pattern[i] == first_char { 0 } else { next_i[0] };

        while j < text_len {
            let (done, ahead) = nodes.split_at_mut(i + 1);
            let from = done[i][j].as_deref();
            /* Longest path that got extended from this node */
            let mut max_len = 0;
            /* Rightmost position so far */
            let mut rm = usize::MAX;

            /* Closest common chars below i within the gap, right of j within the width */
            let last_k = i.saturating_add(max_gap).saturating_add(1).min(qlen);
            for k in i + 1..last_k {
                let next_k = match next[k] {
                    Some(next_k) => next_k,
                    None => continue,
                };
                let p = next_k[j];
                if p >= rm {
                    continue;
                }
                let w = p - j;
                if w >= max_width || w > max_gap.saturating_add(1) {
                    continue;
                }

                let to = ahead[k - i - 1][p].get_or_insert_with(|| {
                    let mut to = vec![usize::MAX; qlen + 1];
                    to[0] = 1;
                    to
                });
                to[1] = to[1].min(w);

                if let Some(from) = from {
                    let mut z = 1;
                    while z <= from[0] {
                        let width = from[z].saturating_add(w);
                        if width >= max_width || to[z + 1] < width {
                            break;
                        }
                        to[z + 1] = width;
                        max_len = z;
                        z += 1;
                    }
                    to[0] = to[0].max(z);
                }
                rm = p;
                if rm - j == 1 {
                    break;
                }
            }

            /* Longest path ends here; offer it when long enough */
            if let Some(from) = from {
                let edges = from[0];
                if max_len < edges && edges + 1 >= min_lcs {
                    found.offer(j - from[edges], j + 1, (edges + 1) as f64);
                }
            }
            j = next_i[j];
        }
    }
    found.into_vec()
}

/// Search for gapped common subsequences.
#[derive(Debug)]
pub struct LcsSearch {
    params: LcsParams,
    /// LRU cache of text position maps.
    cache: PreparedCache<PositionMap>,
}

impl LcsSearch {
    pub fn new() -> LcsSearch {
        LcsSearch::with_params(LcsParams::default())
    }

    pub fn with_params(params: LcsParams) -> LcsSearch {
        LcsSearch::with_cache(params, DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache(params: LcsParams, cache_size: usize) -> LcsSearch {
        LcsSearch {
            params,
            cache: PreparedCache::new(cache_size),
        }
    }

    pub fn params(&self) -> LcsParams {
        self.params
    }

    pub fn set_params(&mut self, params: LcsParams) -> &mut Self {
        self.params = params;
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn positions(&self, text: &[char]) -> Arc<PositionMap> {
        self.cache.get_or_prepare(text, to_position_char_map)
    }

    /// Occurrences in `text` of `pattern` with similarity of at least `min_score`.
    fn similar(&self, text: &[char], positions: &PositionMap, pattern: &[char],
               min_score: f64) -> Vec<ScoredMatch> {
        let qlen = pattern.len();
        let required = (min_score * qlen as f64).ceil().max(0.0) as usize;
        let params = self.params.min_lcs(self.params.min_lcs.max(required));
        lcs_occurrences(text[0], positions, text.len(), pattern, &params)
            .into_iter()
            .map(|m| ScoredMatch::new(m.start, m.end, m.score / qlen as f64))
            .collect()
    }
}

impl Default for LcsSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for LcsSearch {
    fn search<F>(&self, text: &[char], pattern: &[char], min_score: f64, mut on_match: F) -> usize
    where
        F: FnMut(ScoredMatch),
    {
        if text.is_empty() || pattern.is_empty() {
            return 0;
        }
        let positions = self.positions(text);
        let matches = self.similar(text, &positions, pattern, min_score);
        debug!("LCS search of {} chars pattern found {} matches", pattern.len(), matches.len());
        let found = matches.len();
        matches.into_iter().for_each(&mut on_match);
        found
    }

    fn search_dictionary<V, F>(&self, text: &[char], dictionary: &TrieMap<V>, min_score: f64,
                               mut on_match: F) -> usize
    where
        F: FnMut(ScoredMatch, &V),
    {
        if text.is_empty() || dictionary.is_empty() {
            return 0;
        }
        let positions = self.positions(text);
        let mut found = 0;
        for (key, value) in dictionary.iter() {
            let pattern: Vec<char> = key.chars().collect();
            if pattern.is_empty() {
                continue;
            }
            for m in self.similar(text, &positions, &pattern, min_score) {
                on_match(m, value);
                found += 1;
            }
        }
        debug!("LCS search of {} keys found {} matches", dictionary.len(), found);
        found
    }

    fn score(&self, word: &[char], pattern: &[char]) -> f64 {
        coverage_score(self, word, pattern)
    }
}
