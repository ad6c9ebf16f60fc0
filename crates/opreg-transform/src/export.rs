//! Normalized records back into a data frame.
//!
//! Column names follow the dashboard's German vocabulary so exported files
//! line up with the registry's own reports.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use opreg_model::CaseRecord;

/// Export column names, in frame order.
pub const EXPORT_COLUMNS: &[&str] = &[
    "record_id",
    "opdatum",
    "jahr",
    "quartal",
    "quartal_sort",
    "bereich",
    "zugang",
    "dindo",
    "dindo_label",
    "hsm",
    "los_total",
    "los_icu",
    "leber_gruppe",
    "sarkom_gruppe",
    "lokalisation",
    "eingriff_art",
    "hipec",
];

fn text_column<F>(name: &str, records: &[&CaseRecord], value: F) -> Column
where
    F: Fn(&CaseRecord) -> String,
{
    let values: Vec<String> = records.iter().map(|record| value(record)).collect();
    Series::new(name.into(), values).into_column()
}

/// Build a frame with one row per record and [`EXPORT_COLUMNS`] as columns.
pub fn cases_to_frame<'a, I>(records: I) -> PolarsResult<DataFrame>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let records: Vec<&CaseRecord> = records.into_iter().collect();

    let years: Vec<i32> = records.iter().map(|record| record.year()).collect();
    let sort_keys: Vec<i64> = records
        .iter()
        .map(|record| record.quarter_sort_key())
        .collect();
    let grades: Vec<Option<i64>> = records
        .iter()
        .map(|record| record.complication_grade)
        .collect();
    let los_total: Vec<Option<f64>> = records.iter().map(|record| record.los_total).collect();
    let los_icu: Vec<Option<f64>> = records.iter().map(|record| record.los_icu).collect();

    let columns = vec![
        text_column("record_id", &records, |r| r.record_id.clone()),
        text_column("opdatum", &records, |r| {
            r.procedure_date.format("%Y-%m-%d").to_string()
        }),
        Series::new("jahr".into(), years).into_column(),
        text_column("quartal", &records, CaseRecord::quarter_label),
        Series::new("quartal_sort".into(), sort_keys).into_column(),
        text_column("bereich", &records, |r| r.area_label.clone()),
        text_column("zugang", &records, |r| r.access_label.clone()),
        Series::new("dindo".into(), grades).into_column(),
        text_column("dindo_label", &records, |r| r.complication_label.clone()),
        text_column("hsm", &records, |r| r.hsm_label.clone()),
        Series::new("los_total".into(), los_total).into_column(),
        Series::new("los_icu".into(), los_icu).into_column(),
        text_column("leber_gruppe", &records, |r| r.liver_group.clone()),
        text_column("sarkom_gruppe", &records, |r| r.sarcoma_group.clone()),
        text_column("lokalisation", &records, |r| r.localization.clone()),
        text_column("eingriff_art", &records, |r| r.procedure_type.clone()),
        text_column("hipec", &records, |r| r.hipec.clone()),
    ];
    DataFrame::new(columns)
}
