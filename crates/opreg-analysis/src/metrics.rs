use std::collections::BTreeSet;

use serde::Serialize;

use opreg_model::CaseRecord;

/// Headline figures for the filtered row set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub case_count: usize,
    /// Mean Clavien-Dindo code over cases with a known grade.
    pub mean_complication_grade: Option<f64>,
    /// Number of distinct area labels.
    pub distinct_areas: usize,
}

impl Metrics {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CaseRecord>,
    {
        let mut case_count = 0usize;
        let mut grade_sum = 0i64;
        let mut graded = 0usize;
        let mut areas = BTreeSet::new();
        for record in records {
            case_count += 1;
            if let Some(grade) = record.complication_grade {
                grade_sum += grade;
                graded += 1;
            }
            areas.insert(record.area_label.as_str());
        }
        Self {
            case_count,
            mean_complication_grade: (graded > 0).then(|| grade_sum as f64 / graded as f64),
            distinct_areas: areas.len(),
        }
    }
}
