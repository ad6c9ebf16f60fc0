//! Calendar quarter keys.
//!
//! A [`QuarterKey`] identifies one quarter of one year. Its display form is
//! the dashboard label `Qn-YYYY`, which sorts lexically by quarter number
//! first. Chronological ordering must go through [`QuarterKey::sort_key`] or
//! the derived `Ord`, never through the label.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One calendar quarter (`year`, `quarter` in 1..=4).
///
/// Field order matters: the derived `Ord` compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuarterKey {
    year: i32,
    quarter: u8,
}

impl QuarterKey {
    /// Create a quarter key, rejecting quarter numbers outside 1..=4.
    pub fn new(year: i32, quarter: u32) -> Result<Self> {
        match quarter {
            1..=4 => Ok(Self {
                year,
                quarter: quarter as u8,
            }),
            other => Err(ModelError::QuarterOutOfRange(other)),
        }
    }

    /// The quarter containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3 + 1) as u8,
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn quarter(self) -> u8 {
        self.quarter
    }

    /// Dashboard label, e.g. `Q1-2024`.
    pub fn label(self) -> String {
        format!("Q{}-{}", self.quarter, self.year)
    }

    /// Integer key `year * 10 + quarter` (e.g. `20241`).
    pub fn sort_key(self) -> i64 {
        i64::from(self.year) * 10 + i64::from(self.quarter)
    }

    /// All four quarters of `year` in chronological order.
    pub fn quarters_of(year: i32) -> [QuarterKey; 4] {
        [1u8, 2, 3, 4].map(|quarter| QuarterKey { year, quarter })
    }
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.quarter, self.year)
    }
}

impl FromStr for QuarterKey {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidQuarterLabel(value.to_string());
        let trimmed = value.trim();
        let rest = trimmed
            .strip_prefix('Q')
            .or_else(|| trimmed.strip_prefix('q'))
            .ok_or_else(invalid)?;
        let (quarter, year) = rest.split_once('-').ok_or_else(invalid)?;
        let quarter: u32 = quarter.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        if !(1..=4).contains(&quarter) {
            return Err(invalid());
        }
        Self::new(year, quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_date_assigns_quarter() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let key = QuarterKey::from_date(date);
        assert_eq!(key.year(), 2024);
        assert_eq!(key.quarter(), 1);
        assert_eq!(key.label(), "Q1-2024");
        assert_eq!(key.sort_key(), 20241);

        let december = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(QuarterKey::from_date(december).label(), "Q4-2023");
    }

    #[test]
    fn parse_rejects_malformed_labels() {
        assert!("Q5-2024".parse::<QuarterKey>().is_err());
        assert!("Q0-2024".parse::<QuarterKey>().is_err());
        assert!("2024-Q1".parse::<QuarterKey>().is_err());
        assert!("Q1/2024".parse::<QuarterKey>().is_err());
        assert!("".parse::<QuarterKey>().is_err());
    }

    #[test]
    fn label_order_differs_from_chronology() {
        let late = QuarterKey::new(2023, 4).unwrap();
        let early = QuarterKey::new(2024, 1).unwrap();
        // "Q1-2024" < "Q4-2023" lexically
        assert!(early.label() < late.label());
        assert!(late < early);
        assert!(late.sort_key() < early.sort_key());
    }
}
