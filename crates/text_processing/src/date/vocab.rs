//! Calendar vocabulary: relative-day keywords, weekdays, month names.

use chrono::Weekday;
use once_cell::sync::Lazy;

/// What a relative-day keyword means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    /// Today plus N days (N >= 1)
    Days(i64),
    /// First day of the next month
    NextMonth,
}

const RELATIVE_DAYS: &[(&str, RelativeDay)] = &[
    ("tomorrow", RelativeDay::Days(1)),
    ("kal", RelativeDay::Days(1)),
    ("कल", RelativeDay::Days(1)),
    ("day after tomorrow", RelativeDay::Days(2)),
    ("parso", RelativeDay::Days(2)),
    ("parson", RelativeDay::Days(2)),
    ("parsoon", RelativeDay::Days(2)),
    ("परसों", RelativeDay::Days(2)),
    ("परसो", RelativeDay::Days(2)),
    ("kal ke baad", RelativeDay::Days(2)),
    ("कल के बाद", RelativeDay::Days(2)),
    ("narso", RelativeDay::Days(3)),
    ("नरसों", RelativeDay::Days(3)),
    ("next week", RelativeDay::Days(7)),
    ("agle hafte", RelativeDay::Days(7)),
    ("agle week", RelativeDay::Days(7)),
    ("agle saptah", RelativeDay::Days(7)),
    ("अगले हफ्ते", RelativeDay::Days(7)),
    ("अगले हफ़्ते", RelativeDay::Days(7)),
    ("अगले सप्ताह", RelativeDay::Days(7)),
    ("next month", RelativeDay::NextMonth),
    ("agle mahine", RelativeDay::NextMonth),
    ("agle month", RelativeDay::NextMonth),
    ("अगले महीने", RelativeDay::NextMonth),
];

/// Relative-day keywords, longest first so "kal ke baad" wins over "kal"
pub static RELATIVE_DAYS_BY_LENGTH: Lazy<Vec<(&'static str, RelativeDay)>> = Lazy::new(|| {
    let mut table = RELATIVE_DAYS.to_vec();
    table.sort_by_key(|(key, _)| std::cmp::Reverse(key.chars().count()));
    table
});

// Left out as ambiguous: "sun" (listen), "som", "guru"/"गुरु" and "ravi"/"रवि"
// (common names and forms of address).
const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("somvar", Weekday::Mon),
    ("somwar", Weekday::Mon),
    ("somvaar", Weekday::Mon),
    ("somwaar", Weekday::Mon),
    ("सोमवार", Weekday::Mon),
    ("सोम", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("mangalvar", Weekday::Tue),
    ("mangalwar", Weekday::Tue),
    ("mangalvaar", Weekday::Tue),
    ("mangalwaar", Weekday::Tue),
    ("mangal", Weekday::Tue),
    ("मंगलवार", Weekday::Tue),
    ("मंगल", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("budhvar", Weekday::Wed),
    ("budhwar", Weekday::Wed),
    ("budhvaar", Weekday::Wed),
    ("budhwaar", Weekday::Wed),
    ("budh", Weekday::Wed),
    ("बुधवार", Weekday::Wed),
    ("बुध", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("guruvar", Weekday::Thu),
    ("guruwar", Weekday::Thu),
    ("guruvaar", Weekday::Thu),
    ("guruwaar", Weekday::Thu),
    ("veervar", Weekday::Thu),
    ("veervaar", Weekday::Thu),
    ("brihaspativar", Weekday::Thu),
    ("गुरुवार", Weekday::Thu),
    ("वीरवार", Weekday::Thu),
    ("बृहस्पतिवार", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("shukravar", Weekday::Fri),
    ("shukrawar", Weekday::Fri),
    ("shukravaar", Weekday::Fri),
    ("shukrawaar", Weekday::Fri),
    ("shukra", Weekday::Fri),
    ("शुक्रवार", Weekday::Fri),
    ("शुक्र", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("shanivar", Weekday::Sat),
    ("shaniwar", Weekday::Sat),
    ("shanivaar", Weekday::Sat),
    ("shaniwaar", Weekday::Sat),
    ("shani", Weekday::Sat),
    ("शनिवार", Weekday::Sat),
    ("शनि", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("ravivar", Weekday::Sun),
    ("raviwar", Weekday::Sun),
    ("ravivaar", Weekday::Sun),
    ("raviwaar", Weekday::Sun),
    ("itvar", Weekday::Sun),
    ("itwar", Weekday::Sun),
    ("itvaar", Weekday::Sun),
    ("रविवार", Weekday::Sun),
    ("इतवार", Weekday::Sun),
];

pub static WEEKDAYS_BY_LENGTH: Lazy<Vec<(&'static str, Weekday)>> = Lazy::new(|| {
    let mut table = WEEKDAYS.to_vec();
    table.sort_by_key(|(key, _)| std::cmp::Reverse(key.chars().count()));
    table
});

pub const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("janvari", 1),
    ("जनवरी", 1),
    ("february", 2),
    ("feb", 2),
    ("farvari", 2),
    ("फरवरी", 2),
    ("फ़रवरी", 2),
    ("march", 3),
    ("mar", 3),
    ("मार्च", 3),
    ("april", 4),
    ("apr", 4),
    ("aprail", 4),
    ("अप्रैल", 4),
    ("may", 5),
    ("मई", 5),
    ("june", 6),
    ("jun", 6),
    ("जून", 6),
    ("july", 7),
    ("jul", 7),
    ("julai", 7),
    ("जुलाई", 7),
    ("august", 8),
    ("aug", 8),
    ("agast", 8),
    ("अगस्त", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("sitambar", 9),
    ("सितंबर", 9),
    ("सितम्बर", 9),
    ("october", 10),
    ("oct", 10),
    ("aktubar", 10),
    ("अक्टूबर", 10),
    ("अक्तूबर", 10),
    ("november", 11),
    ("nov", 11),
    ("navambar", 11),
    ("नवंबर", 11),
    ("नवम्बर", 11),
    ("december", 12),
    ("dec", 12),
    ("disambar", 12),
    ("दिसंबर", 12),
    ("दिसम्बर", 12),
];

/// Regex alternation of month names, longest first
pub static MONTH_ALTERNATION: Lazy<String> = Lazy::new(|| {
    let mut names: Vec<&str> = MONTHS.iter().map(|(name, _)| *name).collect();
    names.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));
    names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
});

pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS.iter().find(|(n, _)| *n == lower).map(|(_, m)| *m)
}

/// Regex alternation of the ordinal-date words, longest first
pub static DATE_WORD_ALTERNATION: Lazy<String> = Lazy::new(|| {
    let mut words = crate::hindi::DATE_WORDS.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_days_sorted_longest_first() {
        let lengths: Vec<usize> = RELATIVE_DAYS_BY_LENGTH
            .iter()
            .map(|(k, _)| k.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_weekday_aliases_sorted_and_unambiguous() {
        let lengths: Vec<usize> = WEEKDAYS_BY_LENGTH
            .iter()
            .map(|(k, _)| k.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        for skipped in ["sun", "som", "guru", "ravi", "गुरु", "रवि"] {
            assert!(WEEKDAYS.iter().all(|(alias, _)| *alias != skipped));
        }
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("दिसंबर"), Some(12));
        assert_eq!(month_number("sept"), Some(9));
        assert_eq!(month_number("smarch"), None);
    }
}
