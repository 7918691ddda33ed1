//! Text normalization
//!
//! Canonical form used for phrase matching: lower-cased, sentence
//! punctuation (Latin and Devanagari) replaced by spaces, whitespace
//! collapsed and trimmed. Applying it twice gives the same result.

/// Punctuation stripped before matching. Digits, `/` and `-` inside dates
/// survive because date extraction works on the raw text.
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}', '…', '।', '॥', '¿',
    '¡', '“', '”', '‘', '’', '`', '~', '*',
];

fn is_stripped(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Normalize an utterance for matching
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if is_stripped(c) || c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// True when `phrase` occurs in `text` as whole words.
/// Both sides are expected to be normalized.
pub fn contains_words(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let padded_text = format!(" {} ", text);
    let padded_phrase = format!(" {} ", phrase);
    padded_text.contains(&padded_phrase)
}
