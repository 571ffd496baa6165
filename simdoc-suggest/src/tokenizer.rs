//! Lexical tokenization of document texts.
use hashbrown::HashSet;

/// Checks if a character belongs to a word, i.e., is an ASCII letter, an ASCII digit, or `_`.
///
/// Any other character, accented letters included, separates words.
#[inline(always)]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lists the tokens of a text in order of appearance, duplicates included.
///
/// The text is lower-cased first, then split on maximal runs of non-word characters
/// (see [`is_word_char`]).
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenizes a text into its set of distinct lower-cased tokens.
///
/// Only the presence of a token matters; term frequencies are discarded.
/// Empty or blank text produces an empty set.
///
/// # Examples
///
/// ```
/// use simdoc_suggest::tokenizer::tokenize;
///
/// let tokens = tokenize("The cat sat; the CAT ran!");
/// assert_eq!(tokens.len(), 4);
/// assert!(tokens.contains("cat"));
/// ```
pub fn tokenize(text: &str) -> HashSet<String> {
    tokens(text).into_iter().collect()
}
