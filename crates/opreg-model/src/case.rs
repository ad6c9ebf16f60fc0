//! Normalized surgical case records.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::quarter::QuarterKey;

/// One surgical case after transformation.
///
/// Every record has a procedure date; rows without one never become a
/// `CaseRecord`. Labels are always populated (see [`crate::code_table`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub record_id: String,
    pub procedure_date: NaiveDate,
    pub quarter: QuarterKey,
    /// Names of the checked clinical areas, in code order.
    pub areas: Vec<String>,
    /// Comma-joined `areas`, or the "unspecified" sentinel.
    pub area_label: String,
    pub access_code: Option<i64>,
    pub access_label: String,
    pub complication_grade: Option<i64>,
    pub complication_label: String,
    pub hsm: Option<bool>,
    pub hsm_label: String,
    pub los_total: Option<f64>,
    pub los_icu: Option<f64>,
    pub liver_group: String,
    pub sarcoma_group: String,
    pub localization: String,
    pub procedure_type: String,
    pub hipec: String,
}

impl CaseRecord {
    pub fn year(&self) -> i32 {
        self.quarter.year()
    }

    pub fn quarter_label(&self) -> String {
        self.quarter.label()
    }

    pub fn quarter_sort_key(&self) -> i64 {
        self.quarter.sort_key()
    }

    /// Whether the case belongs to the named clinical area.
    pub fn has_area(&self, area: &str) -> bool {
        self.areas.iter().any(|name| name.eq_ignore_ascii_case(area))
    }
}

/// The immutable output of one transformation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaseSet {
    records: Vec<CaseRecord>,
    /// Input rows excluded because no year could be resolved.
    dropped: usize,
}

impl CaseSet {
    pub fn new(records: Vec<CaseRecord>, dropped: usize) -> Self {
        Self { records, dropped }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(CaseRecord::year).collect()
    }
}

impl<'a> IntoIterator for &'a CaseSet {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
