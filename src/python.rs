use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use pyo3::exceptions;

use crate::error::Error;
use crate::phrase::{find_phrase, PhraseMatch};
use crate::query::PhraseQuery;
use crate::search::{self, CacheStats, LcsParams, PhoneticCosts, ScoredMatch, Searcher};
use crate::trie::TrieMap;
use crate::combine::find_best_combined_match;
use crate::utils;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        PyErr::new::<exceptions::PyValueError, _>(err.to_string())
    }
}

/* Positions reported to Python index the folded text */

fn match_to_py<'py>(py: Python<'py>, m: &ScoredMatch) -> PyResult<&'py PyDict> {
    let pymatch = PyDict::new(py);
    pymatch.set_item("start", m.start)?;
    pymatch.set_item("end", m.end)?;
    pymatch.set_item("score", m.score)?;
    Ok(pymatch)
}

fn phrase_to_py(py: Python, found: Option<PhraseMatch>) -> PyResult<PyObject> {
    let found = match found {
        None => return Ok(py.None()),
        Some(found) => found,
    };
    let words = PyList::empty(py);
    for (slot, m) in found.words.iter() {
        let word = match_to_py(py, m)?;
        word.set_item("word", slot)?;
        words.append(word)?;
    }
    let pyresult = PyDict::new(py);
    pyresult.set_item("start", found.start)?;
    pyresult.set_item("end", found.end)?;
    pyresult.set_item("score", found.score)?;
    pyresult.set_item("words", words)?;
    Ok(pyresult.into())
}

fn stats_to_py(py: Python, stats: CacheStats) -> PyResult<PyObject> {
    let pystats = PyDict::new(py);
    pystats.set_item("hits", stats.hits)?;
    pystats.set_item("misses", stats.misses)?;
    pystats.set_item("inserts", stats.inserts)?;
    Ok(pystats.into())
}

fn search_py<S: Searcher + Sync>(py: Python, searcher: &S, text: &str, pattern: &str,
                                 min_score: f64) -> PyResult<PyObject> {
    let (text, pattern) = (utils::fold(text), utils::fold(pattern));
    let found = py.allow_threads(move || {
        let mut found = Vec::new();
        searcher.search(&text, &pattern, min_score, |m| found.push(m));
        found
    });
    let list = PyList::empty(py);
    for m in found.iter() {
        list.append(match_to_py(py, m)?)?;
    }
    Ok(list.into())
}

/// Words are matched all at once; "index" is the position in `words`.
fn search_dictionary_py<S: Searcher + Sync>(py: Python, searcher: &S, text: &str, words: Vec<&str>,
                                            min_score: f64) -> PyResult<PyObject> {
    let text = utils::fold(text);
    let dictionary: TrieMap<usize> = words
        .iter()
        .enumerate()
        .map(|(idx, word)| (utils::fold(word).into_iter().collect::<String>(), idx))
        .collect();
    let found = py.allow_threads(move || {
        let mut found = Vec::new();
        searcher.search_dictionary(&text, &dictionary, min_score, |m, &idx| found.push((idx, m)));
        found
    });
    let list = PyList::empty(py);
    for (idx, m) in found.iter() {
        let pymatch = match_to_py(py, m)?;
        pymatch.set_item("index", idx)?;
        list.append(pymatch)?;
    }
    Ok(list.into())
}

fn find_phrase_py<S: Searcher + Sync>(py: Python, searcher: &S, text: &str, phrase: &str,
                                      min_score: Option<f64>, distance_decay: Option<f64>,
                                      limit: Option<usize>) -> PyResult<PyObject> {
    let mut query = PhraseQuery::new(phrase).limit(limit);
    if let Some(min_score) = min_score {
        query = query.min_score(min_score);
    }
    if let Some(distance_decay) = distance_decay {
        query = query.distance_decay(distance_decay);
    }
    let text = utils::fold(text);
    let found = py.allow_threads(move || find_phrase(searcher, &text, &query))?;
    phrase_to_py(py, found)
}

#[pyclass]
pub struct PhoneticSearch {
    inner: search::PhoneticSearch,
}

// Python wrapper of the phonetic searcher.
#[pymethods]
impl PhoneticSearch {
    #[new]
    fn new(substitution: Option<f64>, digraph: Option<f64>, gap: Option<f64>,
           replace: Option<f64>) -> PyResult<Self> {
        let defaults = PhoneticCosts::default();
        let costs = defaults
            .substitution(substitution.unwrap_or(defaults.substitution))
            .digraph(digraph.unwrap_or(defaults.digraph))
            .gap(gap.unwrap_or(defaults.gap))
            .replace(replace.unwrap_or(defaults.replace));
        Ok(PhoneticSearch {
            inner: search::PhoneticSearch::with_costs(costs),
        })
    }

    fn search(&self, py: Python, text: &str, pattern: &str, min_score: f64) -> PyResult<PyObject> {
        search_py(py, &self.inner, text, pattern, min_score)
    }

    fn search_dictionary(&self, py: Python, text: &str, words: Vec<&str>,
                         min_score: f64) -> PyResult<PyObject> {
        search_dictionary_py(py, &self.inner, text, words, min_score)
    }

    fn score(&self, word: &str, pattern: &str) -> PyResult<f64> {
        Ok(self.inner.score(&utils::fold(word), &utils::fold(pattern)))
    }

    fn find_phrase(&self, py: Python, text: &str, phrase: &str, min_score: Option<f64>,
                   distance_decay: Option<f64>, limit: Option<usize>) -> PyResult<PyObject> {
        find_phrase_py(py, &self.inner, text, phrase, min_score, distance_decay, limit)
    }

    fn cache_stats(&self, py: Python) -> PyResult<PyObject> {
        stats_to_py(py, self.inner.cache_stats())
    }
}

#[pyclass]
pub struct LcsSearch {
    inner: search::LcsSearch,
}

// Python wrapper of the gapped-LCS searcher.
#[pymethods]
impl LcsSearch {
    #[new]
    fn new(max_width: Option<usize>, min_lcs: Option<usize>, max_gap: Option<usize>) -> PyResult<Self> {
        let defaults = LcsParams::default();
        let params = defaults
            .max_width(max_width.unwrap_or(defaults.max_width))
            .min_lcs(min_lcs.unwrap_or(defaults.min_lcs))
            .max_gap(max_gap.unwrap_or(defaults.max_gap));
        Ok(LcsSearch {
            inner: search::LcsSearch::with_params(params),
        })
    }

    fn search(&self, py: Python, text: &str, pattern: &str, min_score: f64) -> PyResult<PyObject> {
        search_py(py, &self.inner, text, pattern, min_score)
    }

    fn search_dictionary(&self, py: Python, text: &str, words: Vec<&str>,
                         min_score: f64) -> PyResult<PyObject> {
        search_dictionary_py(py, &self.inner, text, words, min_score)
    }

    fn score(&self, word: &str, pattern: &str) -> PyResult<f64> {
        Ok(self.inner.score(&utils::fold(word), &utils::fold(pattern)))
    }

    fn find_phrase(&self, py: Python, text: &str, phrase: &str, min_score: Option<f64>,
                   distance_decay: Option<f64>, limit: Option<usize>) -> PyResult<PyObject> {
        find_phrase_py(py, &self.inner, text, phrase, min_score, distance_decay, limit)
    }

    fn cache_stats(&self, py: Python) -> PyResult<PyObject> {
        stats_to_py(py, self.inner.cache_stats())
    }
}

#[pyfunction]
fn fold(text: &str) -> PyResult<String> {
    Ok(utils::fold(text).into_iter().collect())
}

#[pyfunction]
fn tokenize(phrase: &str, min_length: Option<usize>) -> PyResult<Vec<String>> {
    let min_length = min_length.unwrap_or(2);
    Ok(utils::tokenize(phrase, min_length))
}

/* Matches are (word, start, end, score) tuples */
#[pyfunction]
fn combine(py: Python, word_matches: Vec<(usize, usize, usize, f64)>,
           distance_decay: f64) -> PyResult<PyObject> {
    let word_matches = word_matches
        .into_iter()
        .map(|(slot, start, end, score)| (slot, ScoredMatch::new(start, end, score)));
    let best = find_best_combined_match(word_matches, |gap| {
        distance_decay.powi(gap.min(i32::MAX as usize) as i32)
    })?;
    let found = best.map(|sequence| PhraseMatch {
        start: sequence.effective_start(),
        end: sequence.end(),
        score: sequence.score(),
        words: sequence.matches(),
    });
    phrase_to_py(py, found)
}

#[pymodule]
fn lexmatch(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__doc__", "Phonetic and gapped-LCS fuzzy matching in Rust")?;
    m.add_class::<PhoneticSearch>()?;
    m.add_class::<LcsSearch>()?;
    m.add_function(wrap_pyfunction!(fold, m)?)?;
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(combine, m)?)?;
    Ok(())
}
