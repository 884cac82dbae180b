use super::utils;

/// Search for all words of a phrase, close to each other.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    /// Tokenized phrase; word position is its slot in combined matches
    pub words: Vec<String>,
    /* Least similarity of a single word match */
    pub min_score: f64,
    /// Combined score is multiplied by `distance_decay` for each char between words.
    pub distance_decay: f64,
    /// Best matches kept per word, all when None.
    pub limit: Option<usize>,
}

impl PhraseQuery {
    pub fn new(phrase: &str) -> Self {
        Self {
            words: utils::tokenize(phrase, 1),
            min_score: 0.7,
            distance_decay: 0.9,
            limit: None,
        }
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn distance_decay(mut self, distance_decay: f64) -> Self {
        self.distance_decay = distance_decay;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Multiplier of a combined score for a gap of `gap` chars.
    pub fn distance_coef(&self, gap: usize) -> f64 {
        self.distance_decay.powi(gap.min(i32::MAX as usize) as i32)
    }
}
