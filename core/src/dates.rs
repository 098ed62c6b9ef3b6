//! Calendar-date helpers shared by the form and the confirmation page.
//!
//! Dates travel as `YYYY-MM-DD` strings end to end. Parsing is strict: the
//! string must have exactly that shape and name a real calendar day.

use chrono::NaiveDate;

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[5..7].parse().ok()?;
    let day = value[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Signed whole-day difference `end - start`.
///
/// `None` when either date is missing or unparseable.
pub fn duration_days(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_iso_date(start?)?;
    let end = parse_iso_date(end?)?;
    Some((end - start).num_days())
}

/// Length of a stay in days. Non-positive spans are indeterminate.
pub fn stay_length(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    duration_days(start, end).filter(|days| *days > 0)
}

/// Medium US display form, e.g. `Jan 3, 2024`.
pub fn format_display_date(value: &str) -> Option<String> {
    parse_iso_date(value).map(|date| date.format("%b %-d, %Y").to_string())
}

/// "day" or "days".
pub fn day_word(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_dates() {
        let date = parse_iso_date("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn rejects_out_of_range_and_malformed_dates() {
        for bad in ["2024-13-40", "2023-02-29", "2024-1-1", "2024/01/01", "20240101xx", "", "abcd-ef-gh"] {
            assert!(parse_iso_date(bad).is_none(), "{bad} should not parse");
        }
    }

    #[test]
    fn two_day_span() {
        assert_eq!(duration_days(Some("2024-01-01"), Some("2024-01-03")), Some(2));
    }

    #[test]
    fn negative_span_is_reported_but_not_a_stay() {
        assert_eq!(duration_days(Some("2024-01-05"), Some("2024-01-03")), Some(-2));
        assert_eq!(stay_length(Some("2024-01-05"), Some("2024-01-03")), None);
        assert_eq!(stay_length(Some("2024-01-03"), Some("2024-01-03")), None);
    }

    #[test]
    fn unparseable_date_gives_no_duration() {
        assert_eq!(duration_days(Some("2024-01-01"), Some("2024-13-40")), None);
        assert_eq!(duration_days(None, Some("2024-01-02")), None);
    }

    #[test]
    fn spans_month_boundaries() {
        assert_eq!(duration_days(Some("2024-02-28"), Some("2024-03-01")), Some(2));
    }

    #[test]
    fn display_format() {
        assert_eq!(format_display_date("2024-01-03").as_deref(), Some("Jan 3, 2024"));
        assert_eq!(format_display_date("2024-12-25").as_deref(), Some("Dec 25, 2024"));
        assert!(format_display_date("2024-13-40").is_none());
    }
}
