//! Grouped count tables for the dashboard charts.
//!
//! Every table is computed from an already filtered row set. Rows are
//! ordered by their natural key (years ascending, quarters chronologically,
//! grades numerically), never by count.

use std::collections::BTreeMap;

use serde::Serialize;

use opreg_model::{CaseRecord, QuarterKey};

/// One group and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub keys: Vec<String>,
    pub count: usize,
}

/// A grouped count, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CountTable {
    pub key_names: Vec<String>,
    pub rows: Vec<CountRow>,
}

impl CountTable {
    pub fn empty(key_names: &[&str]) -> Self {
        Self {
            key_names: key_names.iter().map(|name| (*name).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum of all group sizes.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// Count for the group with exactly these key values.
    pub fn count_for(&self, keys: &[&str]) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map(|row| row.count)
    }
}

/// Group `records` by `key`, skipping records for which it returns `None`.
fn count_by<'a, I, K, F, R>(records: I, key_names: &[&str], key: F, render: R) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
    K: Ord,
    F: Fn(&CaseRecord) -> Option<K>,
    R: Fn(&K) -> Vec<String>,
{
    let mut groups: BTreeMap<K, usize> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *groups.entry(k).or_default() += 1;
        }
    }
    CountTable {
        key_names: key_names.iter().map(|name| (*name).to_string()).collect(),
        rows: groups
            .iter()
            .map(|(k, count)| CountRow {
                keys: render(k),
                count: *count,
            })
            .collect(),
    }
}

pub fn cases_by_year<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["jahr"],
        |record| Some(record.year()),
        |year| vec![year.to_string()],
    )
}

/// Cases per quarter in chronological order.
pub fn cases_by_quarter<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["quartal"],
        |record| Some(record.quarter),
        |quarter: &QuarterKey| vec![quarter.label()],
    )
}

/// Cases per area label. Multi-area cases form their own combined group.
pub fn cases_by_area<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["bereich"],
        |record| Some(record.area_label.clone()),
        |area| vec![area.clone()],
    )
}

/// Year × area label.
pub fn area_trend<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["jahr", "bereich"],
        |record| Some((record.year(), record.area_label.clone())),
        |(year, area)| vec![year.to_string(), area.clone()],
    )
}

/// Year × access label.
pub fn access_by_year<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["jahr", "zugang"],
        |record| Some((record.year(), record.access_label.clone())),
        |(year, access)| vec![year.to_string(), access.clone()],
    )
}

/// Cases per Clavien-Dindo grade, ordered by grade code. Missing grades are
/// not counted.
pub fn complication_counts<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["dindo", "dindo_label"],
        |record| {
            record
                .complication_grade
                .map(|grade| (grade, record.complication_label.clone()))
        },
        |(grade, label)| vec![grade.to_string(), label.clone()],
    )
}

/// Year × HSM ("Ja"/"Nein"). Cases without HSM information are not counted.
pub fn hsm_by_year<'a, I>(records: I) -> CountTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    count_by(
        records,
        &["jahr", "hsm"],
        |record| record.hsm.map(|hsm| (record.year(), hsm)),
        |(year, hsm)| vec![year.to_string(), hsm_label(*hsm).to_string()],
    )
}

fn hsm_label(hsm: bool) -> &'static str {
    if hsm { "Ja" } else { "Nein" }
}

/// Total length of stay for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayRow {
    pub year: i32,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StayTable {
    pub rows: Vec<StayRow>,
}

impl StayTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_for(&self, year: i32) -> Option<&StayRow> {
        self.rows.iter().find(|row| row.year == year)
    }
}

/// Mean and median total length of stay per year, over cases that have one.
pub fn length_of_stay_by_year<'a, I>(records: I) -> StayTable
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(days) = record.los_total {
            by_year.entry(record.year()).or_default().push(days);
        }
    }
    let rows = by_year
        .into_iter()
        .map(|(year, mut values)| {
            values.sort_by(f64::total_cmp);
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            StayRow {
                year,
                count,
                mean,
                median: median_of_sorted(&values),
            }
        })
        .collect();
    StayTable { rows }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len().is_multiple_of(2) {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
