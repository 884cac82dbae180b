//! Static phonetic equivalence data.

use lazy_static::lazy_static;

use crate::collect::{LetterMap, LetterSet, LetterTable};

/// Letter -> letters that sound alike.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('A', "O"),
    ('B', "P"),
    ('C', "KQ"),
    ('D', "T"),
    ('E', "I"),
    ('F', "P"),
    ('G', "HJ"),
    ('H', "G"),
    ('I', "JY"),
    ('J', "GIY"),
    ('K', "CQ"),
    ('P', "F"),
    ('Q', "KC"),
    ('S', "Z"),
    ('T', "D"),
    ('U', "AO"),
    ('V', "W"),
    ('W', "VU"),
    ('Y', "IJ"),
    ('Z', "S"),
    ('0', "O"),
    ('1', "IL"),
    ('2', "T"),
    ('3', "E"),
    ('5', "S"),
    ('6', "B"),
    ('8', "B"),
    ('9', "D"),
];

/// Two-letter sequence -> single letters it may be written as. Two digraphs
/// sharing an equivalent are interchangeable too ("ZZ" ~ "TS" through "C").
const DIGRAPHS_EQUIVALENTS: &[(&str, &str)] = &[
    ("CH", "C4"),
    ("CK", "KC"),
    ("EA", "I"),
    ("EE", "IY"),
    ("ER", "R"),
    ("EU", "E"),
    ("DJ", "J"),
    ("DZ", "J"),
    ("FF", "FVW"),
    ("GH", "G"),
    ("GG", "G"),
    ("IE", "E"),
    ("IO", "OE"),
    ("IU", "U"),
    ("JA", "A"),
    ("JE", "E"),
    ("JO", "E"),
    ("KH", "KHC"),
    ("KN", "N"),
    ("KS", "X"),
    ("KW", "KQ"),
    ("LL", "L"),
    ("MM", "M"),
    ("NG", "N"),
    ("NN", "N"),
    ("OO", "U"),
    ("OU", "OU"),
    ("PH", "F"),
    ("PP", "P"),
    ("QU", "QKC"),
    ("RR", "R"),
    ("SC", "C"),
    ("SH", "S"),
    ("SG", "S"),
    ("SS", "S"),
    ("TC", "C"),
    ("TH", "TZS"),
    ("TO", "2"),
    ("TS", "C"),
    ("TT", "T"),
    ("TW", "T2"),
    ("TU", "2"),
    ("TZ", "C"),
    ("WH", "W"),
    ("YA", "A"),
    ("YE", "E"),
    ("YO", "EO"),
    ("YU", "U"),
    ("ZH", "GJ"),
    ("ZZ", "CZ"),
];

lazy_static! {
    pub(crate) static ref SUBS: LetterMap<LetterSet> = {
        let mut subs = LetterMap::new();
        for &(letter, equivalents) in SUBSTITUTIONS {
            let set = LetterSet::of(equivalents).expect("invalid substitution table");
            subs.put(letter, set).expect("invalid substitution table");
        }
        subs.freeze();
        subs
    };

    pub(crate) static ref DIGRAPHS: LetterTable<LetterSet> = {
        let mut digraphs = LetterTable::new();
        for &(digraph, equivalents) in DIGRAPHS_EQUIVALENTS {
            let set = LetterSet::of(equivalents).expect("invalid digraph table");
            digraphs.put_pair(digraph, set).expect("invalid digraph table");
        }
        digraphs.freeze();
        digraphs
    };
}

/// Letters phonetically equivalent to `c`; empty for anything not in the table.
pub fn substitutes(c: char) -> LetterSet {
    SUBS.get(c).copied().unwrap_or_default()
}

/// Letters the digraph `first second` may stand for.
pub fn digraph_equivalents(first: char, second: char) -> LetterSet {
    DIGRAPHS.get(first, second).copied().unwrap_or_default()
}
