//! Parsing and display of feed publication timestamps.
//!
//! Feed dates are mostly RFC 2822 but not reliably so. Parsing is lenient and
//! never fails loudly: a string that matches no known layout comes back as
//! [`Published::Unparsed`] holding the original text.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Offset-bearing layouts tried after RFC 2822 and RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Layouts without a zone; the value is taken as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"];

const DISPLAY_FORMAT: &str = "%a, %d %b %Y %I:%M %p IST";

// India Standard Time, UTC+05:30
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl Published {
    pub fn parse(raw: &str) -> Self {
        match parse_datetime(raw.trim()) {
            Some(dt) => Published::Parsed(dt),
            None => Published::Unparsed(raw.to_string()),
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Published::Parsed(dt) => Some(*dt),
            Published::Unparsed(_) => None,
        }
    }

    /// Renders in IST, or returns the original text when it could not be parsed.
    pub fn display(&self) -> String {
        match self {
            Published::Parsed(dt) => match FixedOffset::east_opt(IST_OFFSET_SECS) {
                Some(ist) => dt.with_timezone(&ist).format(DISPLAY_FORMAT).to_string(),
                None => dt.to_rfc2822(),
            },
            Published::Unparsed(raw) => raw.clone(),
        }
    }
}

/// Converts a raw feed timestamp into its IST display form.
pub fn to_display_time(raw: &str) -> String {
    Published::parse(raw).display()
}

/// Sort key for a raw timestamp. `None` orders before every parsed value.
pub fn sort_key(raw: &str) -> Option<DateTime<Utc>> {
    Published::parse(raw).as_datetime()
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_gmt_to_ist() {
        assert_eq!(
            to_display_time("Mon, 03 Jun 2024 15:45:00 GMT"),
            "Mon, 03 Jun 2024 09:15 PM IST"
        );
    }

    #[test]
    fn converts_across_midnight() {
        assert_eq!(
            to_display_time("Mon, 03 Jun 2024 20:00:00 +0000"),
            "Tue, 04 Jun 2024 01:30 AM IST"
        );
    }

    #[test]
    fn honours_source_offset() {
        // 10:00 at UTC-04:00 is 14:00 UTC
        assert_eq!(
            to_display_time("2024-06-03T10:00:00-04:00"),
            "Mon, 03 Jun 2024 07:30 PM IST"
        );
    }

    #[test]
    fn naive_values_are_utc() {
        assert_eq!(
            to_display_time("2024-06-03 15:45:00"),
            "Mon, 03 Jun 2024 09:15 PM IST"
        );
    }

    #[test]
    fn unparseable_text_is_returned_unchanged() {
        assert_eq!(to_display_time("not a date"), "not a date");
        assert_eq!(to_display_time("N/A"), "N/A");
        assert_eq!(to_display_time(""), "");
    }

    #[test]
    fn parse_reports_both_outcomes() {
        assert_eq!(
            Published::parse("2024-01-01T00:00:00Z"),
            Published::Parsed(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(Published::parse("garbage"), Published::Unparsed("garbage".to_string()));
    }

    #[test]
    fn long_month_names_parse() {
        assert_eq!(
            sort_key("June 3, 2024"),
            Some(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap())
        );
        assert_eq!(to_display_time("June 3, 2024"), "Mon, 03 Jun 2024 05:30 AM IST");
    }

    #[test]
    fn bare_dates_parse_at_midnight() {
        assert_eq!(
            sort_key("2024-02-10"),
            Some(Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_dates_sort_before_everything() {
        assert!(sort_key("garbage") < sort_key("Thu, 01 Jan 1970 00:00:00 GMT"));
    }
}
