//! Date token extraction
//!
//! Rules are tried in order and the first match wins:
//! 1. spoken number words become digits
//! 2. numeric `DD/MM[/YYYY]`
//! 3. `DD <month>` (English or Hindi month names)
//! 4. number next to an ordinal-date word ("25 तारीख को", "tarikh 5")
//! 5. number next to a booking cue ("for 15", "15 tak")
//! 6. named weekday
//! 7. relative-day keyword, longest first (plus "N din baad" spans)
//! 8. any bare number 1-31

use super::vocab::{
    DATE_WORD_ALTERNATION, MONTH_ALTERNATION, RELATIVE_DAYS_BY_LENGTH, WEEKDAYS_BY_LENGTH,
};
use crate::hindi::{devanagari_digits_to_ascii, number_words_to_digits};
use crate::normalize::{contains_words, normalize};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{2,4}))?\b").unwrap());

/// A day unit right after a number pair turns "2-3" into a range of days
static DAY_UNIT_AHEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(?:din|दिन|day)").unwrap());

pub(crate) static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s*(?:of\s+)?({})\b",
        *MONTH_ALTERNATION
    ))
    .unwrap()
});

static NUMBER_THEN_DATE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s*({})(?:\s+(?:ko|को|tak|तक|se|से|wali|वाली|wale|वाले))?",
        *DATE_WORD_ALTERNATION
    ))
    .unwrap()
});

static DATE_WORD_THEN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({})\s*(\d{{1,2}})\b",
        *DATE_WORD_ALTERNATION
    ))
    .unwrap()
});

static CUE_THEN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:for|by|before|on|till|until)\s+(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?\b")
        .unwrap()
});

static NUMBER_THEN_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:tak|तक|ko|को|se pehle|से पहले)(?:\s|$)")
        .unwrap()
});

pub(crate) static DAY_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(\d{1,2})\s*(?:din|दिन|days?)\s*(?:baad|bad|बाद|later|mein|में))|(?:\bin\s+(\d{1,2})\s+days?\b)",
    )
    .unwrap()
});

pub(crate) static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\b").unwrap());

fn day_in_range(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

/// First `DD/MM[/YYYY]` that is not a range of days ("2-3 din mein")
pub(crate) fn numeric_date(text: &str) -> Option<Captures<'_>> {
    NUMERIC_DATE
        .captures_iter(text)
        .find(|caps| caps.get(0).map_or(false, |m| !DAY_UNIT_AHEAD.is_match(&text[m.end()..])))
}

/// Spoken number words and Devanagari digits rewritten as ASCII digits
pub(crate) fn digitize(raw: &str) -> String {
    number_words_to_digits(&devanagari_digits_to_ascii(raw))
}

/// Number of days in a "N din baad" / "in N days" span
pub(crate) fn day_span(text: &str) -> Option<i64> {
    let caps = DAY_SPAN.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Pull a raw date expression out of an utterance
pub fn extract_date_token(raw: &str) -> Option<String> {
    let text = digitize(raw);
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = numeric_date(&text) {
        return Some(caps[0].to_string());
    }

    if let Some(m) = DAY_MONTH.find(&text) {
        return Some(normalize(m.as_str()));
    }

    if let Some(caps) = NUMBER_THEN_DATE_WORD.captures(&text) {
        if day_in_range(&caps[1]).is_some() {
            return Some(format!("{} {}", &caps[1], &caps[2]));
        }
    }

    if let Some(caps) = DATE_WORD_THEN_NUMBER.captures(&text) {
        if day_in_range(&caps[2]).is_some() {
            return Some(format!("{} {}", &caps[1], &caps[2]));
        }
    }

    for cue in [&*CUE_THEN_NUMBER, &*NUMBER_THEN_CUE] {
        if let Some(caps) = cue.captures(&text) {
            if let Some(day) = day_in_range(&caps[1]) {
                return Some(day.to_string());
            }
        }
    }

    let normalized = normalize(&text);

    if let Some((alias, _)) = WEEKDAYS_BY_LENGTH
        .iter()
        .find(|(alias, _)| contains_words(&normalized, alias))
    {
        return Some((*alias).to_string());
    }

    if let Some(m) = DAY_SPAN.find(&normalized) {
        return Some(m.as_str().to_string());
    }

    if let Some((key, _)) = RELATIVE_DAYS_BY_LENGTH
        .iter()
        .find(|(key, _)| contains_words(&normalized, key))
    {
        return Some((*key).to_string());
    }

    BARE_NUMBER
        .captures_iter(&text)
        .find_map(|caps| day_in_range(&caps[1]))
        .map(|day| day.to_string())
}
