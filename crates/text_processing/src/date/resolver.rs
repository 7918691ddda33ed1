//! Date resolution
//!
//! Turns a raw token into a concrete calendar date. "Today" is taken in a
//! fixed civil offset (UTC+5:30 by default) rather than the host locale.
//! Every resolved date is strictly after today.

use super::extractor::{day_span, digitize, numeric_date, BARE_NUMBER, DAY_MONTH};
use super::vocab::{month_number, RelativeDay, RELATIVE_DAYS_BY_LENGTH, WEEKDAYS_BY_LENGTH};
use crate::normalize::{contains_words, normalize};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};
use regex::Captures;
use reminder_agent_core::ResolvedDate;

/// Resolves date tokens against the current day in a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    offset: FixedOffset,
}

impl DateResolver {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Current calendar day in the anchor offset
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    pub fn resolve(&self, token: &str) -> Option<ResolvedDate> {
        resolve_date_at(token, self.today())
    }
}

/// Resolve `token` as if today were `today`
pub fn resolve_date_at(token: &str, today: NaiveDate) -> Option<ResolvedDate> {
    let text = normalize(&digitize(token));
    if text.is_empty() {
        return None;
    }

    // an explicit calendar date is final, even when it is not valid
    let date = if let Some(caps) = numeric_date(&text) {
        resolve_numeric(&caps, today)
    } else if let Some(caps) = DAY_MONTH.captures(&text) {
        resolve_day_month(&caps, today)
    } else {
        day_span(&text)
            .and_then(|n| add_days(today, n))
            .or_else(|| resolve_weekday(&text, today))
            .or_else(|| resolve_relative(&text, today))
            .or_else(|| resolve_day_of_month(&text, today))
    }?;

    // resolved dates are always after today
    (date > today).then(|| ResolvedDate {
        display: display(date),
        iso: date,
    })
}

fn display(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

fn add_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days < 1 {
        return None;
    }
    today.checked_add_signed(Duration::days(days))
}

/// `DD/MM[/YYYY]`. A given year is honored as is; without one the next
/// upcoming occurrence is used.
fn resolve_numeric(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;

    match caps.get(3) {
        Some(year) => {
            let mut year: i32 = year.as_str().parse().ok()?;
            if year < 100 {
                year += 2000;
            }
            NaiveDate::from_ymd_opt(year, month, day).filter(|d| *d > today)
        }
        None => upcoming_day_month(day, month, today),
    }
}

fn resolve_day_month(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    upcoming_day_month(day, month, today)
}

/// This year if still ahead, else next year
fn upcoming_day_month(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(today.year(), month, day)
        .filter(|d| *d > today)
        .or_else(|| NaiveDate::from_ymd_opt(today.year() + 1, month, day))
}

fn resolve_weekday(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (_, weekday) = WEEKDAYS_BY_LENGTH
        .iter()
        .find(|(alias, _)| contains_words(text, alias))?;
    Some(next_weekday(*weekday, today))
}

/// Next occurrence strictly after today; the same weekday means a week out
fn next_weekday(target: Weekday, today: NaiveDate) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn resolve_relative(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (_, relative) = RELATIVE_DAYS_BY_LENGTH
        .iter()
        .find(|(key, _)| contains_words(text, key))?;
    match relative {
        RelativeDay::Days(n) => add_days(today, *n),
        RelativeDay::NextMonth => first_of_next_month(today),
    }
}

fn first_of_next_month(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = next_month(today.year(), today.month());
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Day of month: this month if the day is still ahead, else the next month
/// that has that day.
fn resolve_day_of_month(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let day = BARE_NUMBER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|d| (1..=31).contains(d))?;

    if day > today.day() {
        if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
            return Some(date);
        }
    }

    let (mut year, mut month) = (today.year(), today.month());
    for _ in 0..12 {
        (year, month) = next_month(year, month);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Friday
    fn today() -> NaiveDate {
        ymd(2026, 10, 16)
    }

    fn iso(token: &str, today: NaiveDate) -> Option<NaiveDate> {
        resolve_date_at(token, today).map(|d| d.iso)
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(iso("kal", today()), Some(ymd(2026, 10, 17)));
        assert_eq!(iso("परसों", today()), Some(ymd(2026, 10, 18)));
        assert_eq!(iso("kal ke baad", today()), Some(ymd(2026, 10, 18)));
        assert_eq!(iso("next week", today()), Some(ymd(2026, 10, 23)));
        assert_eq!(iso("3 din baad", today()), Some(ymd(2026, 10, 19)));
    }

    #[test]
    fn test_next_month() {
        assert_eq!(iso("next month", today()), Some(ymd(2026, 11, 1)));
        assert_eq!(iso("agle mahine", ymd(2026, 12, 10)), Some(ymd(2027, 1, 1)));
    }

    #[test]
    fn test_weekday_is_strictly_future() {
        assert_eq!(iso("monday", today()), Some(ymd(2026, 10, 19)));
        assert_eq!(iso("सोमवार", today()), Some(ymd(2026, 10, 19)));
        // today is a Friday
        assert_eq!(iso("friday", today()), Some(ymd(2026, 10, 23)));
        assert_eq!(iso("shukravar", today()), Some(ymd(2026, 10, 23)));
    }

    #[test]
    fn test_weekday_short_and_long_vowel_forms() {
        // today is Friday 2026-10-16
        for (token, expected) in [
            ("somvaar", ymd(2026, 10, 19)),
            ("सोम", ymd(2026, 10, 19)),
            ("mangal", ymd(2026, 10, 20)),
            ("मंगल", ymd(2026, 10, 20)),
            ("budh", ymd(2026, 10, 21)),
            ("बुध", ymd(2026, 10, 21)),
            ("guruvaar", ymd(2026, 10, 22)),
            ("shukra", ymd(2026, 10, 23)),
            ("शुक्र", ymd(2026, 10, 23)),
            ("shanivaar", ymd(2026, 10, 17)),
            ("शनि", ymd(2026, 10, 17)),
            ("ravivaar", ymd(2026, 10, 18)),
        ] {
            assert_eq!(iso(token, today()), Some(expected), "{token}");
        }
    }

    #[test]
    fn test_day_range_resolves_as_span() {
        assert_eq!(iso("2-3 din mein", today()), Some(ymd(2026, 10, 19)));
        assert_eq!(iso("3 din mein", today()), Some(ymd(2026, 10, 19)));
        assert_eq!(iso("2-3", today()), Some(ymd(2027, 3, 2)));
    }

    #[test]
    fn test_day_of_month() {
        assert_eq!(iso("25 तारीख", today()), Some(ymd(2026, 10, 25)));
        assert_eq!(iso("25 तारीख", ymd(2026, 10, 25)), Some(ymd(2026, 11, 25)));
        assert_eq!(iso("25 tarikh", ymd(2026, 10, 28)), Some(ymd(2026, 11, 25)));
        assert_eq!(iso("15", today()), Some(ymd(2026, 11, 15)));
        assert_eq!(iso("pachees tarikh", today()), Some(ymd(2026, 10, 25)));
    }

    #[test]
    fn test_day_of_month_skips_short_months() {
        assert_eq!(iso("31 tarikh", ymd(2026, 10, 31)), Some(ymd(2026, 12, 31)));
        assert_eq!(iso("30", ymd(2027, 1, 31)), Some(ymd(2027, 3, 30)));
    }

    #[test]
    fn test_day_and_month_name() {
        assert_eq!(iso("25 december", today()), Some(ymd(2026, 12, 25)));
        assert_eq!(iso("10 october", today()), Some(ymd(2027, 10, 10)));
        assert_eq!(iso("16 oct", today()), Some(ymd(2027, 10, 16)));
        assert_eq!(iso("5 जनवरी", today()), Some(ymd(2027, 1, 5)));
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(iso("25/12/2026", today()), Some(ymd(2026, 12, 25)));
        assert_eq!(iso("5/1", today()), Some(ymd(2027, 1, 5)));
        assert_eq!(iso("1/1/2020", today()), None);
        assert_eq!(iso("31/02", today()), None);
        assert_eq!(iso("1/1/2020 ko", today()), None);
    }

    #[test]
    fn test_invalid_day_month_is_not_reread_as_day_of_month() {
        assert_eq!(iso("31 february", today()), None);
        assert_eq!(iso("30 फरवरी", today()), None);
    }

    #[test]
    fn test_unresolvable() {
        assert!(resolve_date_at("", today()).is_none());
        assert!(resolve_date_at("jaldi", today()).is_none());
        assert!(resolve_date_at("99", today()).is_none());
    }

    #[test]
    fn test_display() {
        let resolved = resolve_date_at("25 tarikh", today()).unwrap();
        assert_eq!(resolved.display, "Sunday, 25 October 2026");
    }

    #[test]
    fn test_always_after_today_and_deterministic() {
        let tokens = [
            "kal", "parso", "monday", "sunday", "friday", "1", "15", "31", "25 तारीख",
            "1 january", "31 december", "next month", "agle hafte", "7 din baad", "29 feb",
        ];
        let mut day = ymd(2026, 1, 1);
        while day < ymd(2027, 1, 1) {
            for token in tokens {
                if let Some(resolved) = resolve_date_at(token, day) {
                    assert!(resolved.iso > day, "{token} resolved to {} on {day}", resolved.iso);
                    assert_eq!(resolve_date_at(token, day), Some(resolved));
                }
            }
            day = day + Duration::days(5);
        }
    }

    #[test]
    fn test_resolver_uses_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let resolver = DateResolver::new(ist);
        let today = resolver.today();
        let resolved = resolver.resolve("kal").unwrap();
        assert_eq!(resolved.iso, today.succ_opt().unwrap());
    }
}
