use super::*;
use proptest::prelude::*;

use crate::collect::LetterSet;
use crate::error::Error;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn matched<'a>(text: &'a str, m: &ScoredMatch) -> &'a str {
    &text[m.start..m.end]
}

#[test]
fn it_knows_phonetic_tables() {
    assert!(substitutes('C').contains('K'));
    assert!(substitutes('C').contains('Q'));
    assert!(substitutes('1').contains('L'));
    assert!(substitutes('X').is_empty());
    assert!(substitutes('ж').is_empty());
    assert_eq!(digraph_equivalents('P', 'H'), LetterSet::of("F").unwrap());
    assert!(digraph_equivalents('Z', 'Z').intersects(&digraph_equivalents('T', 'S')));
    assert!(digraph_equivalents('H', 'P').is_empty());
}

#[test]
fn it_extracts_digraphs() {
    let digraphs = extract_digraphs(&chars("PHONE"));
    assert_eq!(digraphs.len(), 5);
    assert!(digraphs[0].is_empty());
    assert!(digraphs[1].contains('F'));
    assert!(digraphs[2].is_empty());
    assert!(extract_digraphs(&[]).is_empty());
}

#[test]
fn phonetic_search_finds_equivalents() {
    let fs = PhoneticSearch::new();
    let testcases = [
        /* Digraphs in both text and pattern */
        ("MUSTAFA", "MOUSTAPHA", Some(ScoredMatch::new(0, 7, 1.0))),
        /* Digraph intersection: ZZ -> C, TS -> C */
        ("PIZZA", "PITSA", Some(ScoredMatch::new(0, 5, 0.5))),
        /* Deletion before digraph */
        ("PIZZA", "PInCA", Some(ScoredMatch::new(0, 5, 1.5))),
        /* Isolated slips around digraphs */
        ("PVIKZZA", "PITSNA", Some(ScoredMatch::new(0, 7, 5.5))),
        /* Two slips in a row never match */
        ("PIVKZZA", "PITSA", None),
        ("PIVKZZA", "PIZZA", None),
        /* Insertion before digraph */
        ("PInZZA", "PICA", None),
    ];
    for (text, pattern, expected) in testcases.iter() {
        let found = fs.find_occurrences(&chars(text), &chars(pattern), 10.0);
        println!("Searched {} in {}: {:?}", pattern, text, found);
        match expected {
            Some(m) => assert_eq!(found, vec![*m]),
            None => assert!(found.is_empty()),
        }
    }
}

#[test]
fn phonetic_search_in_longer_text() {
    let fs = PhoneticSearch::new();
    let text = "OBSHESTVOSORGONICHENOYOTVETSTVENNOSTYU";
    let found = fs.find_occurrences(&chars(text), &chars("OGRANITCHENNOJ"), 10.0);
    assert_eq!(found.len(), 1);
    assert_eq!(matched(text, &found[0]), "ORGONICHENOY");
    assert_eq!(found[0].score, 4.0);

    let text = "FILLQPHILEFILTTT";
    let found = fs.find_occurrences(&chars(text), &chars("PHILQ"), 10.0);
    for m in found.iter() {
        println!("Got {} {}", m, matched(text, m));
    }
    assert_eq!(found, vec![
        ScoredMatch::new(0, 5, 1.0),
        ScoredMatch::new(5, 9, 1.0),
        ScoredMatch::new(10, 13, 1.5),
    ]);
    /* Sorted, non-overlapping */
    for pair in found.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
}

#[test]
fn phonetic_search_respects_cost_limit() {
    let fs = PhoneticSearch::new();
    let (text, pattern) = (chars("PIZZA"), chars("PITSA"));
    assert_eq!(fs.find_occurrences(&text, &pattern, 0.5).len(), 1);
    assert!(fs.find_occurrences(&text, &pattern, 0.4).is_empty());

    /* Costs are live state */
    let mut fs = PhoneticSearch::new();
    fs.set_costs(PhoneticCosts::default().digraph(0.25));
    assert_eq!(fs.find_occurrences(&text, &pattern, 0.4), vec![ScoredMatch::new(0, 5, 0.25)]);
}

#[test]
fn phonetic_search_handles_empty_input() {
    let fs = PhoneticSearch::new();
    assert!(fs.find_occurrences(&[], &chars("PIZZA"), 10.0).is_empty());
    assert!(fs.find_occurrences(&chars("PIZZA"), &[], 10.0).is_empty());
    assert_eq!(fs.search(&[], &chars("PIZZA"), 0.0, |_| panic!("no match expected")), 0);
    let empty: TrieMap<usize> = TrieMap::new();
    assert_eq!(fs.search_dictionary(&chars("PIZZA"), &empty, 0.0, |_, _| panic!()), 0);
}

#[test]
fn phonetic_search_with_prepared_digraphs() {
    let fs = PhoneticSearch::new();
    let text = chars("PIZZA");
    let digraphs = extract_digraphs(&text);
    let found = fs.find_occurrences_with_digraphs(&text, &digraphs, &chars("PITSA"), 1.0).unwrap();
    assert_eq!(found, vec![ScoredMatch::new(0, 5, 0.5)]);
    assert_eq!(fs.cache_stats(), CacheStats::default());

    /* Digraphs of some other text */
    let result = fs.find_occurrences_with_digraphs(&text, &[], &chars("PIZZA"), 1.0);
    assert_eq!(result, Err(Error::LengthMismatch { expected: 5, actual: 0 }));
    let other = extract_digraphs(&chars("PIZZAS"));
    let result = fs.find_occurrences_with_digraphs(&text, &other, &chars("PIZZA"), 1.0);
    assert_eq!(result, Err(Error::LengthMismatch { expected: 5, actual: 6 }));
}

#[test]
fn phonetic_costs_build() {
    let costs = PhoneticCosts::default();
    assert_eq!(costs.substitution, 0.5);
    assert_eq!(costs.digraph, 0.5);
    assert_eq!(costs.gap, 1.0);
    assert_eq!(costs.replace, 2.0);
    let costs = costs.substitution(0.1).gap(3.0).replace(4.0);
    assert_eq!(costs, PhoneticCosts { substitution: 0.1, digraph: 0.5, gap: 3.0, replace: 4.0 });
    assert_eq!(PhoneticSearch::with_costs(costs).costs(), costs);
}

#[test]
fn phonetic_searcher_scores_similarity() {
    let fs = PhoneticSearch::new();
    let mut found = Vec::new();
    let count = fs.search(&chars("PIZZA"), &chars("PITSA"), 0.8, |m| found.push(m));
    assert_eq!(count, 1);
    assert_eq!((found[0].start, found[0].end), (0, 5));
    assert!((found[0].score - 0.9).abs() < 1e-9);

    assert_eq!(fs.search(&chars("PIZZA"), &chars("PITSA"), 0.95, |_| {}), 0);
    assert!((fs.score(&chars("PIZZA"), &chars("PITSA")) - 0.9).abs() < 1e-9);
    assert_eq!(fs.score(&chars("PIZZA"), &chars("PIZZA")), 1.0);
    assert_eq!(fs.score(&chars("PIZZA"), &[]), 0.0);
}

#[test]
fn phonetic_dictionary_search_matches_word_by_word() {
    let fs = PhoneticSearch::new();
    let text = chars("PIZZA MUSTAFA");
    let words = ["PITSA", "PIZA", "PIT", "PITSAS", "MOUSTAPHA", "XXXX", "MUST"];
    let dictionary: TrieMap<usize> = words.iter().enumerate().map(|(i, w)| (*w, i)).collect();

    let mut from_dictionary = Vec::new();
    let count = fs.search_dictionary(&text, &dictionary, 0.5, |m, &idx| {
        from_dictionary.push((idx, m.start, m.end, m.score))
    });
    assert_eq!(count, from_dictionary.len());

    let mut word_by_word = Vec::new();
    for (idx, word) in words.iter().enumerate() {
        fs.search(&text, &chars(word), 0.5, |m| word_by_word.push((idx, m.start, m.end, m.score)));
    }

    from_dictionary.sort_by(|a, b| a.partial_cmp(b).unwrap());
    word_by_word.sort_by(|a, b| a.partial_cmp(b).unwrap());
    println!("Dictionary matches {:?}", from_dictionary);
    assert_eq!(from_dictionary, word_by_word);

    assert!(from_dictionary.iter().any(|&(idx, start, end, _)| idx == 4 && (start, end) == (6, 13)));
    assert!(!from_dictionary.iter().any(|&(idx, ..)| idx == 5));
}

#[test]
fn phonetic_search_caches_digraphs() {
    let fs = PhoneticSearch::new();
    assert_eq!(fs.cache_stats(), CacheStats::default());
    let text = chars("PIZZA MUSTAFA");
    fs.search(&text, &chars("PITSA"), 0.5, |_| {});
    assert_eq!(fs.cache_stats(), CacheStats { hits: 0, misses: 1, inserts: 1 });
    fs.search(&text, &chars("MOUSTAPHA"), 0.5, |_| {});
    assert_eq!(fs.cache_stats(), CacheStats { hits: 1, misses: 1, inserts: 1 });
    fs.search(&chars("PIZZA"), &chars("PITSA"), 0.5, |_| {});
    assert_eq!(fs.cache_stats(), CacheStats { hits: 1, misses: 2, inserts: 2 });
}

#[test]
fn it_maps_next_positions() {
    let map = to_position_char_map(&chars("ABAB"));
    assert_eq!(map.len(), 2);
    assert_eq!(map[&'A'], vec![2, 2, usize::MAX, usize::MAX]);
    assert_eq!(map[&'B'], vec![1, 3, 3, usize::MAX]);
    assert!(to_position_char_map(&[]).is_empty());
}

#[test]
fn lcs_search_min_lcs_boundary() {
    let (text, pattern) = (chars("ABXCD"), chars("ABCD"));
    let params = LcsParams::default().max_width(10).max_gap(1);

    /* All four chars in common; the limit itself still qualifies */
    let found = find_lcs_occurrences(&text, &pattern, &params.min_lcs(4));
    assert_eq!(found, vec![ScoredMatch::new(0, 5, 4.0)]);
    assert!(find_lcs_occurrences(&text, &pattern, &params.min_lcs(5)).is_empty());

    /* Narrow width splits the match in two overlapping ones */
    let found = find_lcs_occurrences(&text, &pattern, &params.max_width(4).min_lcs(2));
    assert_eq!(found, vec![ScoredMatch::new(0, 4, 3.0), ScoredMatch::new(1, 5, 3.0)]);

    /* No skipping allowed */
    assert!(find_lcs_occurrences(&text, &pattern, &params.max_gap(0).min_lcs(2)).is_empty());
}

#[test]
fn lcs_search_finds_gapped_words() {
    let text = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG";
    let params = LcsParams::default();
    let testcases = [
        ("BRWN", ScoredMatch::new(10, 15, 4.0)),
        ("QUIK", ScoredMatch::new(4, 9, 4.0)),
        ("LAZYDOG", ScoredMatch::new(35, 43, 7.0)),
    ];
    for (pattern, expected) in testcases.iter() {
        let found = find_lcs_occurrences(&chars(text), &chars(pattern), &params);
        println!("Searched {}: {:?}", pattern, found);
        assert_eq!(found, vec![*expected]);
    }
    assert!(find_lcs_occurrences(&chars(text), &[], &params).is_empty());
    assert!(find_lcs_occurrences(&[], &chars("DOG"), &params).is_empty());
}

#[test]
fn lcs_search_keeps_best_match_per_end_point() {
    let testcases = [
        /* (1, 6, 4.0) loses to (0, 6, 5.0) sharing its end */
        ("ACBCCBC", "ABCCBCBA", LcsParams::default().max_width(6).max_gap(1),
         vec![ScoredMatch::new(0, 6, 5.0), ScoredMatch::new(1, 3, 2.0), ScoredMatch::new(2, 7, 5.0)]),
        /* (0, 7, 3.0) loses to (1, 7, 4.0) */
        ("ACBABCA", "CBAAA", LcsParams::default(),
         vec![ScoredMatch::new(0, 4, 2.0), ScoredMatch::new(1, 7, 4.0)]),
    ];
    for (text, pattern, params, expected) in testcases.iter() {
        let found = find_lcs_occurrences(&chars(text), &chars(pattern), params);
        println!("Searched {} in {}: {:?}", pattern, text, found);
        assert_eq!(&found, expected);
    }
}

#[test]
fn lcs_search_with_unbounded_gap() {
    let (text, pattern) = (chars("ABXCD"), chars("ABCD"));
    let params = LcsParams::default().max_width(10).max_gap(usize::MAX);
    assert_eq!(find_lcs_occurrences(&text, &pattern, &params), vec![ScoredMatch::new(0, 5, 4.0)]);
    assert_eq!(find_lcs_occurrences(&text, &pattern, &params.min_lcs(4)), vec![ScoredMatch::new(0, 5, 4.0)]);
}

#[test]
fn lcs_search_with_prepared_positions() {
    let (text, pattern) = (chars("ABXCD"), chars("ABCD"));
    let params = LcsParams::default().max_width(10).max_gap(1);
    let positions = to_position_char_map(&text);

    let found = find_lcs_occurrences_with_positions('A', &positions, text.len(), &pattern, &params);
    assert_eq!(found, Ok(find_lcs_occurrences(&text, &pattern, &params)));

    /* Table of a shorter text */
    let found = find_lcs_occurrences_with_positions('A', &positions, 7, &pattern, &params);
    assert_eq!(found, Err(Error::LengthMismatch { expected: 7, actual: 5 }));
}

proptest! {
    /// No two LCS matches share a start or an end.
    #[test]
    fn prop_lcs_end_points_are_unique(
        text in prop::string::string_regex("[A-C]{1,9}").unwrap(),
        pattern in prop::string::string_regex("[A-C]{1,9}").unwrap(),
        max_width in 1usize..8,
        max_gap in 0usize..4,
    ) {
        let params = LcsParams::default().max_width(max_width).max_gap(max_gap);
        let found = find_lcs_occurrences(&chars(&text), &chars(&pattern), &params);
        for (i, a) in found.iter().enumerate() {
            prop_assert!(a.start < a.end);
            prop_assert!(a.score >= params.min_lcs as f64);
            for b in found[i + 1..].iter() {
                prop_assert!(a.start < b.start);
                prop_assert_ne!(a.end, b.end);
            }
        }
    }
}

#[test]
fn lcs_searcher_works() {
    let ls = LcsSearch::new();
    assert_eq!(ls.params(), LcsParams { max_width: 32, min_lcs: 2, max_gap: 2 });
    let text = chars("HELLO WORLD");

    let mut found = Vec::new();
    assert_eq!(ls.search(&text, &chars("WORD"), 0.5, |m| found.push(m)), 1);
    assert_eq!(found, vec![ScoredMatch::new(6, 11, 1.0)]);
    assert_eq!(ls.cache_stats(), CacheStats { hits: 0, misses: 1, inserts: 1 });

    let dictionary: TrieMap<&str> = [("WORD", "w"), ("HELL", "h"), ("XYZ", "x")].into_iter().collect();
    let mut found = Vec::new();
    let count = ls.search_dictionary(&text, &dictionary, 0.5, |m, value| found.push((*value, m)));
    assert_eq!(count, 2);
    assert_eq!(found, vec![("h", ScoredMatch::new(0, 4, 1.0)), ("w", ScoredMatch::new(6, 11, 1.0))]);
    assert_eq!(ls.cache_stats(), CacheStats { hits: 1, misses: 1, inserts: 1 });

    /* Covers 4 of 5 chars of the word */
    assert!((ls.score(&chars("WORLD"), &chars("WORD")) - 1.0).abs() < 1e-9);
    assert!((ls.score(&chars("HELLO"), &chars("HELL")) - 0.8).abs() < 1e-9);
}

#[test]
fn scored_match_displays() {
    let m = ScoredMatch::new(1, 5, 0.5);
    assert_eq!(m.to_string(), "(1…5, 0.50)");
    assert_eq!(m.len(), 4);
    assert!(!m.is_empty());
}
