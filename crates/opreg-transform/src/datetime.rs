//! Procedure date parsing.
//!
//! The registry stores dates as `YYYY-MM-DD`; datetime fields and older
//! manual exports also produce `YYYY-MM-DD HH:MM[:SS]`, ISO `T`-separated
//! timestamps and German `DD.MM.YYYY`. Anything else is treated as missing.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a procedure date, returning `None` for blank or unparseable values.
pub fn parse_procedure_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_date() {
        assert_eq!(
            parse_procedure_date("2024-02-15"),
            NaiveDate::from_ymd_opt(2024, 2, 15)
        );
        assert_eq!(
            parse_procedure_date(" 2024-02-15 "),
            NaiveDate::from_ymd_opt(2024, 2, 15)
        );
    }

    #[test]
    fn parse_datetime_and_german_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 1);
        assert_eq!(parse_procedure_date("2023-07-01 08:30"), expected);
        assert_eq!(parse_procedure_date("2023-07-01 08:30:15"), expected);
        assert_eq!(parse_procedure_date("2023-07-01T08:30:15"), expected);
        assert_eq!(parse_procedure_date("01.07.2023"), expected);
    }

    #[test]
    fn parse_invalid_returns_none() {
        assert!(parse_procedure_date("").is_none());
        assert!(parse_procedure_date("unbekannt").is_none());
        assert!(parse_procedure_date("2023-13-01").is_none());
        assert!(parse_procedure_date("2023-02-30").is_none());
        assert!(parse_procedure_date("2023").is_none());
    }
}
