//! Filter selections over case records.
//!
//! Every dimension is an independent predicate; a record passes when it
//! passes all of them. Filtering is therefore idempotent and the order in
//! which dimensions are applied does not matter.
//!
//! `None` means "no constraint" for a dimension. `Some` of an empty set means
//! "nothing selected" and passes no record.

use std::collections::BTreeSet;

use serde::Serialize;

use opreg_model::{CaseRecord, QuarterKey, UNSPECIFIED_LABEL};

/// Year constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum YearFilter {
    /// Every year.
    #[default]
    All,
    /// Inclusive range.
    Range { from: i32, to: i32 },
    /// Explicit set of years.
    Set(BTreeSet<i32>),
}

impl YearFilter {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Range { from, to } => (*from..=*to).contains(&year),
            Self::Set(years) => years.contains(&year),
        }
    }

    /// The selected years among `available`.
    pub fn resolve(&self, available: &BTreeSet<i32>) -> BTreeSet<i32> {
        available
            .iter()
            .copied()
            .filter(|year| self.matches(*year))
            .collect()
    }
}

/// Active filter selections for all dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterSelection {
    pub years: YearFilter,
    pub quarters: Option<BTreeSet<QuarterKey>>,
    pub areas: Option<BTreeSet<String>>,
    pub access: Option<BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = YearFilter::Set(years.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_year_range(mut self, from: i32, to: i32) -> Self {
        self.years = YearFilter::Range { from, to };
        self
    }

    #[must_use]
    pub fn with_quarters<I>(mut self, quarters: I) -> Self
    where
        I: IntoIterator<Item = QuarterKey>,
    {
        self.quarters = Some(quarters.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = Some(areas.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_access<I, S>(mut self, access: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access = Some(access.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `record` passes every dimension.
    pub fn matches(&self, record: &CaseRecord) -> bool {
        self.years.matches(record.year())
            && self
                .quarters
                .as_ref()
                .is_none_or(|quarters| quarters.contains(&record.quarter))
            && self
                .areas
                .as_ref()
                .is_none_or(|areas| areas.iter().any(|area| area_matches(record, area)))
            && self.access.as_ref().is_none_or(|access| {
                access
                    .iter()
                    .any(|label| label.eq_ignore_ascii_case(&record.access_label))
            })
    }
}

fn area_matches(record: &CaseRecord, area: &str) -> bool {
    if record.areas.is_empty() {
        area.eq_ignore_ascii_case(UNSPECIFIED_LABEL)
    } else {
        record.has_area(area)
    }
}

/// Records passing `selection`, in input order.
pub fn apply_filters<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a CaseRecord>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_filter_resolve() {
        let available: BTreeSet<i32> = [2021, 2022, 2023, 2024].into_iter().collect();
        assert_eq!(YearFilter::All.resolve(&available), available);
        assert_eq!(
            YearFilter::Range {
                from: 2022,
                to: 2023
            }
            .resolve(&available),
            [2022, 2023].into_iter().collect()
        );
        assert_eq!(
            YearFilter::Set([2020, 2024].into_iter().collect()).resolve(&available),
            [2024].into_iter().collect()
        );
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let filter = YearFilter::Range {
            from: 2024,
            to: 2022,
        };
        assert!(!filter.matches(2023));
    }
}
