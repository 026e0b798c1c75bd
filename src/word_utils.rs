/*!
 * Word-level text utilities.
 *
 * - `clean_word` turns a raw chunk of extracted HTML text into a lookup key
 * - `find_word` / `replace_word` do literal, word-boundary-safe matching
 * - `render_annotation` builds the ruby markup shown to the reader
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Markup tag regex (non-greedy, no attribute parsing)
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap()
});

// @const: Anything that is not a word character, whitespace, apostrophe or hyphen
static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s'-]+").unwrap()
});

/// Strip markup and punctuation from a raw chunk.
///
/// The steps run in a fixed order: tags first, then stray characters, then
/// surrounding whitespace. An empty result means the chunk holds no word.
pub fn clean_word(raw_chunk: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(raw_chunk, "");
    let without_punctuation = NON_WORD_REGEX.replace_all(&without_tags, "");
    without_punctuation.trim().to_string()
}

/// Unicode word character, the same class as `\w` in `clean_word`
pub fn is_word_char(c: char) -> bool {
    regex_syntax::is_word_character(c)
}

/// Byte offset of the first occurrence of `word` in `haystack` that is not
/// part of a longer word. `word` is matched literally.
pub fn find_word(haystack: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(word) {
        let start = from + offset;
        let end = start + word.len();

        let starts_on_boundary = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let ends_on_boundary = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));

        if starts_on_boundary && ends_on_boundary {
            return Some(start);
        }

        // Step one character so overlapping candidates are still seen
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Replace the first boundary-delimited occurrence of `word` with `replacement`.
/// Returns `None` when `word` does not occur as a whole word.
pub fn replace_word(haystack: &str, word: &str, replacement: &str) -> Option<String> {
    let start = find_word(haystack, word)?;
    let end = start + word.len();

    let mut result = String::with_capacity(haystack.len() + replacement.len());
    result.push_str(&haystack[..start]);
    result.push_str(replacement);
    result.push_str(&haystack[end..]);
    Some(result)
}

/// Ruby markup pairing `base` with `gloss`.
///
/// The gloss is escaped, and its spaces become no-break spaces so the
/// rendered markup never contains the chunk separator.
pub fn render_annotation(base: &str, gloss: &str) -> String {
    let mut escaped = String::with_capacity(gloss.len());
    for c in gloss.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            ' ' => escaped.push('\u{00A0}'),
            other => escaped.push(other),
        }
    }

    format!("<ruby>{}<rt>{}</rt></ruby>", base, escaped)
}
