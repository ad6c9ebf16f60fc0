//! Raw export frame to normalized case records.
//!
//! One pass over the rows:
//!
//! 1. parse the procedure date (unparseable -> missing)
//! 2. collapse every checkbox group into a joined label
//! 3. map single-valued codes through their tables (unmapped -> "Unbekannt")
//! 4. derive year and quarter keys from the date
//! 5. drop rows without a date
//!
//! Individual malformed values never fail the transform. Only an absent or
//! empty frame yields `None`.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use opreg_model::tables::{
    ACCESS, AREA, COMPLICATION_GRADE, HIPEC, HSM, LIVER_GROUP, LOCALIZATION, PROCEDURE_TYPE,
    SARCOMA_GROUP,
};
use opreg_model::{
    CHECKBOX_GROUPS, CaseRecord, CaseSet, CodeTable, QuarterKey, fields, join_labels, parse_code,
};

use crate::datetime::parse_procedure_date;
use crate::frame::{column_names, column_strings};
use crate::numeric::{parse_duration, parse_flag};

/// The columns a transform reads, extracted once from the frame.
struct SourceColumns {
    columns: BTreeMap<String, Vec<Option<String>>>,
}

impl SourceColumns {
    fn extract(df: &DataFrame) -> Self {
        let mut wanted: Vec<String> = [
            fields::RECORD_ID,
            fields::PROCEDURE_DATE,
            fields::LOS_TOTAL,
            fields::LOS_ICU,
        ]
        .iter()
        .map(|name| (*name).to_string())
        .collect();
        wanted.extend(
            [ACCESS, COMPLICATION_GRADE, HSM, PROCEDURE_TYPE, HIPEC]
                .iter()
                .map(|table| table.field.to_string()),
        );
        for group in CHECKBOX_GROUPS {
            wanted.extend(group.options().iter().map(|(code, _)| group.column_name(*code)));
        }

        let mut columns = BTreeMap::new();
        for name in wanted {
            match column_strings(df, &name) {
                Some(values) => {
                    columns.insert(name, values);
                }
                None => debug!(column = %name, "column not present in export"),
            }
        }
        Self { columns }
    }

    fn value(&self, name: &str, idx: usize) -> Option<&str> {
        self.columns
            .get(name)
            .and_then(|values| values.get(idx))
            .and_then(Option::as_deref)
    }
}

/// Transform a raw export frame into normalized case records.
///
/// Returns `None` when `frame` is absent or has no rows; the caller must
/// check this before rendering anything.
pub fn transform_records(frame: Option<&DataFrame>) -> Option<CaseSet> {
    let Some(df) = frame else {
        warn!("no export frame to transform");
        return None;
    };
    if df.height() == 0 {
        warn!("export frame has no rows");
        return None;
    }

    let span = info_span!("transform", rows = df.height());
    let _guard = span.enter();

    warn_unknown_indicators(df);
    let source = SourceColumns::extract(df);

    let mut records = Vec::with_capacity(df.height());
    let mut dropped = 0usize;
    for idx in 0..df.height() {
        match transform_row(&source, idx) {
            Some(record) => records.push(record),
            None => {
                dropped += 1;
                debug!(row = idx, "row without procedure date excluded");
            }
        }
    }

    info!(records = records.len(), dropped, "transform complete");
    Some(CaseSet::new(records, dropped))
}

fn transform_row(source: &SourceColumns, idx: usize) -> Option<CaseRecord> {
    let procedure_date =
        parse_procedure_date(source.value(fields::PROCEDURE_DATE, idx).unwrap_or_default())?;
    let value_of = |column: &str| source.value(column, idx);

    let areas = AREA.checked_labels(value_of);
    let access_code = table_code(&ACCESS, source.value(ACCESS.field, idx));
    let complication_grade =
        table_code(&COMPLICATION_GRADE, source.value(COMPLICATION_GRADE.field, idx));
    let hsm = source.value(HSM.field, idx).and_then(parse_flag);

    Some(CaseRecord {
        record_id: source
            .value(fields::RECORD_ID, idx)
            .unwrap_or_default()
            .to_string(),
        procedure_date,
        quarter: QuarterKey::from_date(procedure_date),
        area_label: join_labels(&areas),
        areas: areas.iter().map(|name| (*name).to_string()).collect(),
        access_code,
        access_label: ACCESS.label_or_unknown(access_code).to_string(),
        complication_grade,
        complication_label: COMPLICATION_GRADE
            .label_or_unknown(complication_grade)
            .to_string(),
        hsm,
        hsm_label: HSM.label_or_unknown(hsm.map(i64::from)).to_string(),
        los_total: source.value(fields::LOS_TOTAL, idx).and_then(parse_duration),
        los_icu: source.value(fields::LOS_ICU, idx).and_then(parse_duration),
        liver_group: LIVER_GROUP.collapse(value_of),
        sarcoma_group: SARCOMA_GROUP.collapse(value_of),
        localization: LOCALIZATION.collapse(value_of),
        procedure_type: PROCEDURE_TYPE
            .resolve(source.value(PROCEDURE_TYPE.field, idx))
            .to_string(),
        hipec: HIPEC.resolve(source.value(HIPEC.field, idx)).to_string(),
    })
}

/// Parsed code, kept only when the table knows it.
fn table_code(table: &CodeTable, raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_code)
        .filter(|code| table.label_for_code(*code).is_some())
}

fn warn_unknown_indicators(df: &DataFrame) {
    for name in column_names(df) {
        for group in CHECKBOX_GROUPS {
            let known = group
                .options()
                .iter()
                .any(|(code, _)| group.column_name(*code) == name);
            if group.is_indicator(&name) && !known {
                warn!(column = %name, group = group.name, "ignoring unknown checkbox option");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;

    fn frame(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| {
                Series::new(
                    name.into(),
                    values.iter().copied().map(String::from).collect::<Vec<_>>(),
                )
                .into_column()
            })
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn missing_frame_is_none() {
        assert!(transform_records(None).is_none());
    }

    #[test]
    fn date_derivations() {
        let df = frame(vec![("record_id", vec!["1"]), ("opdatum", vec!["2024-02-15"])]);
        let cases = transform_records(Some(&df)).unwrap();
        let record = &cases.records()[0];
        assert_eq!(record.year(), 2024);
        assert_eq!(record.quarter_label(), "Q1-2024");
        assert_eq!(record.quarter_sort_key(), 20241);
    }

    #[test]
    fn missing_columns_fall_back_to_labels() {
        let df = frame(vec![("opdatum", vec!["2024-05-01"])]);
        let cases = transform_records(Some(&df)).unwrap();
        let record = &cases.records()[0];
        assert_eq!(record.record_id, "");
        assert_eq!(record.area_label, "Nicht angegeben");
        assert!(record.areas.is_empty());
        assert_eq!(record.access_label, "Unbekannt");
        assert_eq!(record.complication_label, "Unbekannt");
        assert_eq!(record.hsm_label, "Unbekannt");
        assert_eq!(record.hipec, "Unbekannt");
        assert_eq!(record.los_total, None);
    }

    #[test]
    fn out_of_table_codes_are_not_kept() {
        let df = frame(vec![
            ("opdatum", vec!["2024-05-01"]),
            ("zugang", vec!["7"]),
            ("max_dindo_calc_surv", vec!["14"]),
        ]);
        let cases = transform_records(Some(&df)).unwrap();
        let record = &cases.records()[0];
        assert_eq!(record.access_code, None);
        assert_eq!(record.access_label, "Unbekannt");
        assert_eq!(record.complication_grade, None);
        assert_eq!(record.complication_label, "Unbekannt");
    }
}
