//! Hindi Language Utilities
//!
//! Number words for days of the month (one through thirty-one) in both
//! Devanagari and romanized spelling, plus Devanagari digit conversion.

/// Words that mark a number as a day of the month ("25 tarikh", "तारीख 5")
pub const DATE_WORDS: &[&str] = &[
    "tarikh", "tareekh", "taarikh", "tarik", "tareek", "तारीख़", "तारीख", "तारिख", "date",
];

/// Convert a day-number word (1 to 31) to its value.
///
/// Accepts Devanagari and romanized spellings; romanized lookups are
/// case-insensitive.
///
/// # Examples
/// ```
/// use reminder_agent_text_processing::hindi::word_to_number;
/// assert_eq!(word_to_number("पच्चीस"), Some(25));
/// assert_eq!(word_to_number("Pachees"), Some(25));
/// assert_eq!(word_to_number("सौ"), None);
/// ```
pub fn word_to_number(word: &str) -> Option<u32> {
    devanagari_word(word).or_else(|| romanized_word(&word.to_lowercase()))
}

fn devanagari_word(word: &str) -> Option<u32> {
    match word {
        "एक" => Some(1),
        "दो" => Some(2),
        "तीन" => Some(3),
        "चार" => Some(4),
        "पांच" | "पाँच" => Some(5),
        "छह" | "छः" | "छे" => Some(6),
        "सात" => Some(7),
        "आठ" => Some(8),
        "नौ" => Some(9),
        "दस" => Some(10),
        "ग्यारह" => Some(11),
        "बारह" => Some(12),
        "तेरह" => Some(13),
        "चौदह" => Some(14),
        "पंद्रह" | "पन्द्रह" => Some(15),
        "सोलह" => Some(16),
        "सत्रह" => Some(17),
        "अठारह" => Some(18),
        "उन्नीस" => Some(19),
        "बीस" => Some(20),
        "इक्कीस" => Some(21),
        "बाईस" => Some(22),
        "तेईस" => Some(23),
        "चौबीस" => Some(24),
        "पच्चीस" => Some(25),
        "छब्बीस" => Some(26),
        "सत्ताईस" => Some(27),
        "अट्ठाईस" | "अठाईस" => Some(28),
        "उनतीस" | "उन्तीस" => Some(29),
        "तीस" => Some(30),
        "इकतीस" | "इकत्तीस" => Some(31),
        _ => None,
    }
}

// "sat", "tera", "bara", "no" left out: they collide with common words
fn romanized_word(word: &str) -> Option<u32> {
    match word {
        "ek" => Some(1),
        "do" => Some(2),
        "teen" | "tin" => Some(3),
        "char" | "chaar" => Some(4),
        "panch" | "paanch" => Some(5),
        "chhe" | "chhah" | "chheh" => Some(6),
        "saat" => Some(7),
        "aath" => Some(8),
        "nau" => Some(9),
        "das" | "dus" => Some(10),
        "gyarah" | "gyara" => Some(11),
        "barah" => Some(12),
        "terah" => Some(13),
        "chaudah" | "chauda" => Some(14),
        "pandrah" | "pandra" => Some(15),
        "solah" | "sola" => Some(16),
        "satrah" | "satra" => Some(17),
        "atharah" | "athara" => Some(18),
        "unnis" | "unees" => Some(19),
        "bees" | "bis" => Some(20),
        "ikkis" | "ikkees" => Some(21),
        "bais" | "baees" | "baais" => Some(22),
        "teis" | "teyis" => Some(23),
        "chaubis" | "chaubees" => Some(24),
        "pachis" | "pachees" | "pacchis" => Some(25),
        "chhabbis" | "chhabbees" => Some(26),
        "sattais" | "sattaees" => Some(27),
        "athais" | "atthais" | "athaees" => Some(28),
        "untis" | "untees" | "unatees" => Some(29),
        "tees" => Some(30),
        "ikattis" | "iktees" | "ikatees" => Some(31),
        _ => None,
    }
}

/// Number words that double as everyday words ("kar do", "ek minute").
/// These only count as numbers right before a date word.
pub fn is_ambiguous_number_word(word: &str) -> bool {
    matches!(word.to_lowercase().as_str(), "do" | "ek" | "दो" | "एक")
}

pub fn is_date_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    DATE_WORDS.iter().any(|w| *w == lower)
}

/// Convert Devanagari digits (०-९) to ASCII
pub fn devanagari_digits_to_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '०' => '0',
            '१' => '1',
            '२' => '2',
            '३' => '3',
            '४' => '4',
            '५' => '5',
            '६' => '6',
            '७' => '7',
            '८' => '8',
            '९' => '9',
            other => other,
        })
        .collect()
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && !is_devanagari_mark(c))
}

fn is_devanagari_mark(c: char) -> bool {
    ('\u{0900}'..='\u{0903}').contains(&c) || ('\u{093A}'..='\u{094F}').contains(&c)
}

/// Replace day-number words with digits, token by token.
///
/// Whitespace is collapsed to single spaces. Ambiguous words are replaced
/// only when the next token is a date word.
pub fn number_words_to_digits(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        let core = trim_token(token);
        let converted = word_to_number(core).filter(|_| {
            !is_ambiguous_number_word(core)
                || tokens
                    .get(i + 1)
                    .map(|next| is_date_word(trim_token(next)))
                    .unwrap_or(false)
        });

        match converted {
            Some(n) if !core.is_empty() => out.push(token.replacen(core, &n.to_string(), 1)),
            _ => out.push((*token).to_string()),
        }
    }

    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devanagari_words() {
        assert_eq!(word_to_number("एक"), Some(1));
        assert_eq!(word_to_number("पाँच"), Some(5));
        assert_eq!(word_to_number("पंद्रह"), Some(15));
        assert_eq!(word_to_number("पच्चीस"), Some(25));
        assert_eq!(word_to_number("इकतीस"), Some(31));
    }

    #[test]
    fn test_romanized_words() {
        assert_eq!(word_to_number("pandrah"), Some(15));
        assert_eq!(word_to_number("Bees"), Some(20));
        assert_eq!(word_to_number("tees"), Some(30));
        assert_eq!(word_to_number("hello"), None);
    }

    #[test]
    fn test_devanagari_digits() {
        assert_eq!(devanagari_digits_to_ascii("२५ तारीख"), "25 तारीख");
        assert_eq!(devanagari_digits_to_ascii("abc 12"), "abc 12");
    }

    #[test]
    fn test_number_words_to_digits() {
        assert_eq!(number_words_to_digits("pachees tarikh ko"), "25 tarikh ko");
        assert_eq!(number_words_to_digits("पंद्रह तारीख"), "15 तारीख");
        assert_eq!(number_words_to_digits("bees, theek hai"), "20, theek hai");
    }

    #[test]
    fn test_ambiguous_words_need_date_word() {
        assert_eq!(number_words_to_digits("haan book kar do"), "haan book kar do");
        assert_eq!(number_words_to_digits("बुक कर दो"), "बुक कर दो");
        assert_eq!(number_words_to_digits("do tarikh"), "2 tarikh");
        assert_eq!(number_words_to_digits("एक तारीख को"), "1 तारीख को");
    }
}
