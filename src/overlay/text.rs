//! Display-text derivation for the CAV overlay.
//!
//! Form fields arrive as the raw strings the browser submitted (HTML date
//! inputs produce `YYYY-MM-DD`). Everything here turns those into the text
//! that lands on the certificate. Empty or unparseable input derives an
//! empty string; empty strings are skipped at stamping time.

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Format a form date in long form (e.g., "February 25, 2025").
pub fn format_long_date(value: &str) -> String {
    let Some(date) = parse_form_date(value) else {
        return String::new();
    };

    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {}, {}", month, date.day(), date.year())
}

/// Ordinal suffix for a day-of-month: 1st, 2nd, 3rd, 4th, ... 11th-13th th.
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Day sentence for the date-issued line (e.g., "25th day        February        2025").
///
/// The wide gaps land the month and year over the blank ruled segments of
/// the certificate line.
pub fn day_sentence(value: &str) -> String {
    let Some(date) = parse_form_date(value) else {
        return String::new();
    };

    let day = date.day();
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!(
        "{}{} day        {}        {}",
        day,
        ordinal_suffix(day),
        month,
        date.year()
    )
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_dash && !result.is_empty() {
                result.push('-');
                last_dash = true;
            }
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_date_formats_plain_dates() {
        assert_eq!(format_long_date("2025-02-25"), "February 25, 2025");
        assert_eq!(format_long_date("2024-12-01"), "December 1, 2024");
    }

    #[test]
    fn long_date_is_empty_for_blank_or_garbage_input() {
        assert_eq!(format_long_date(""), "");
        assert_eq!(format_long_date("   "), "");
        assert_eq!(format_long_date("not-a-date"), "");
        assert_eq!(format_long_date("2025-13-40"), "");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn day_sentence_uses_ordinal_day() {
        assert!(day_sentence("2025-02-01").starts_with("1st day"));
        assert!(day_sentence("2025-02-02").starts_with("2nd day"));
        assert!(day_sentence("2025-02-03").starts_with("3rd day"));
        assert!(day_sentence("2025-02-11").starts_with("11th day"));
        assert!(day_sentence("2025-02-21").starts_with("21st day"));
    }

    #[test]
    fn day_sentence_carries_month_and_year() {
        let sentence = day_sentence("2025-02-25");
        assert!(sentence.starts_with("25th day"));
        assert!(sentence.contains("February"));
        assert!(sentence.ends_with("2025"));
    }

    #[test]
    fn day_sentence_is_empty_for_blank_input() {
        assert_eq!(day_sentence(""), "");
        assert_eq!(day_sentence("25/02/2025"), "");
    }

    #[test]
    fn sanitize_filename_basic() {
        assert_eq!(sanitize_filename("Juan Dela Cruz", "record"), "juan-dela-cruz");
        assert_eq!(sanitize_filename("  ", "record"), "record");
        assert_eq!(sanitize_filename("--__--", "record"), "record");
    }
}
