use regex::Regex;
use lazy_static::lazy_static;

use unicode_normalization::UnicodeNormalization;
use unicode_categories::UnicodeCategories;

lazy_static! {
    /* NOTE: Maybe detect a unicode group for interpunction chars */
    static ref SEPARATOR: Regex = Regex::new("[- \t\n'’`„\"_.,;:=]+").expect("invalid regexp");
}

/// Text as searched: accents stripped and uppercased, one char per letter.
pub fn fold(text: &str) -> Vec<char> {
    /* Normalize accents as separate unicode characters and filter them out */
    text.nfd()
        .filter(|ch| !ch.is_mark_nonspacing())
        .flat_map(char::to_uppercase)
        /* Stroke isn't a combining mark */
        .map(|ch| if ch == 'Ł' { 'L' } else { ch })
        .collect()
}

/// Lowercased words of a phrase having at least `min_length` chars.
pub fn tokenize(phrase: &str, min_length: usize) -> Vec<String> {
    SEPARATOR.split(phrase)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && t.chars().count() >= min_length)
        .collect()
}
