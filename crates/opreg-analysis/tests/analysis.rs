//! Filtering, derived filter state and chart tables over synthetic cases.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use opreg_analysis::{
    ChartKind, Dashboard, FilterChange, FilterSelection, FilterState, NO_DATA_NOTICE, YearFilter,
    apply_filters, cases_by_quarter, complication_counts, hsm_by_year, length_of_stay_by_year,
};
use opreg_model::tables::{ACCESS, AREA, COMPLICATION_GRADE, HSM};
use opreg_model::{CaseRecord, QuarterKey, UNKNOWN_LABEL, UNSPECIFIED_LABEL, join_labels};

struct Case {
    id: &'static str,
    date: (i32, u32, u32),
    areas: &'static [u32],
    access: Option<i64>,
    grade: Option<i64>,
    hsm: Option<bool>,
    los: Option<f64>,
}

impl Case {
    fn on(id: &'static str, year: i32, month: u32) -> Self {
        Self {
            id,
            date: (year, month, 1),
            areas: &[],
            access: None,
            grade: None,
            hsm: None,
            los: None,
        }
    }

    fn areas(mut self, areas: &'static [u32]) -> Self {
        self.areas = areas;
        self
    }

    fn access(mut self, code: i64) -> Self {
        self.access = Some(code);
        self
    }

    fn grade(mut self, grade: i64) -> Self {
        self.grade = Some(grade);
        self
    }

    fn hsm(mut self, hsm: bool) -> Self {
        self.hsm = Some(hsm);
        self
    }

    fn los(mut self, days: f64) -> Self {
        self.los = Some(days);
        self
    }

    fn build(self) -> CaseRecord {
        let (y, m, d) = self.date;
        let procedure_date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let areas: Vec<&str> = self.areas.iter().map(|code| area_name(*code)).collect();
        CaseRecord {
            record_id: self.id.to_string(),
            procedure_date,
            quarter: QuarterKey::from_date(procedure_date),
            area_label: join_labels(&areas),
            areas: areas.iter().map(|name| (*name).to_string()).collect(),
            access_code: self.access,
            access_label: ACCESS.label_or_unknown(self.access).to_string(),
            complication_grade: self.grade,
            complication_label: COMPLICATION_GRADE.label_or_unknown(self.grade).to_string(),
            hsm: self.hsm,
            hsm_label: HSM.label_or_unknown(self.hsm.map(i64::from)).to_string(),
            los_total: self.los,
            los_icu: None,
            liver_group: UNSPECIFIED_LABEL.to_string(),
            sarcoma_group: UNSPECIFIED_LABEL.to_string(),
            localization: UNSPECIFIED_LABEL.to_string(),
            procedure_type: UNKNOWN_LABEL.to_string(),
            hipec: UNKNOWN_LABEL.to_string(),
        }
    }
}

fn area_name(code: u32) -> &'static str {
    AREA.options()
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, label)| *label)
        .unwrap()
}

fn q(year: i32, quarter: u32) -> QuarterKey {
    QuarterKey::new(year, quarter).unwrap()
}

fn registry() -> Vec<CaseRecord> {
    vec![
        Case::on("1", 2023, 2)
            .areas(&[1])
            .access(1)
            .grade(0)
            .hsm(false)
            .los(4.0)
            .build(),
        Case::on("2", 2023, 5)
            .areas(&[1, 4])
            .access(2)
            .grade(10)
            .hsm(true)
            .los(12.0)
            .build(),
        Case::on("3", 2023, 11)
            .areas(&[5])
            .access(2)
            .grade(3)
            .los(7.0)
            .build(),
        Case::on("4", 2024, 1)
            .areas(&[5])
            .access(3)
            .grade(3)
            .hsm(true)
            .los(5.0)
            .build(),
        Case::on("5", 2024, 8).access(1).hsm(false).build(),
    ]
}

fn ids(rows: &[&CaseRecord]) -> Vec<String> {
    rows.iter().map(|row| row.record_id.clone()).collect()
}

#[test]
fn area_filter_counts_multi_area_cases_for_each_area() {
    let records = registry();
    let general = FilterSelection::new().with_areas(["Allgemein"]);
    let hernia = FilterSelection::new().with_areas(["hernien"]);
    assert_eq!(ids(&apply_filters(&records, &general)), vec!["1", "2"]);
    assert_eq!(ids(&apply_filters(&records, &hernia)), vec!["2"]);
}

#[test]
fn unspecified_area_is_selectable() {
    let records = registry();
    let selection = FilterSelection::new().with_areas([UNSPECIFIED_LABEL]);
    assert_eq!(ids(&apply_filters(&records, &selection)), vec!["5"]);
}

#[test]
fn access_filter_matches_labels() {
    let records = registry();
    let selection = FilterSelection::new().with_access(["Laparoskopisch", "Roboter-assistiert"]);
    assert_eq!(ids(&apply_filters(&records, &selection)), vec!["2", "3", "4"]);
}

#[test]
fn year_range_is_inclusive() {
    let records = registry();
    let selection = FilterSelection::new().with_year_range(2024, 2024);
    assert_eq!(ids(&apply_filters(&records, &selection)), vec!["4", "5"]);
}

#[test]
fn all_years_deselected_yields_zero_row_tables() {
    let records = registry();
    let dashboard = Dashboard::build(&records, FilterSelection::new().with_years([]));

    assert!(dashboard.is_empty());
    assert_eq!(dashboard.metrics.case_count, 0);
    assert_eq!(dashboard.metrics.mean_complication_grade, None);
    for kind in ChartKind::ALL {
        assert!(dashboard.charts.is_empty(kind), "{kind:?} should be empty");
    }
    let notices = dashboard.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, NO_DATA_NOTICE);
    assert_eq!(notices[0].chart, None);
}

#[test]
fn dashboard_tables_follow_natural_order() {
    let records = registry();
    let dashboard = Dashboard::build(&records, FilterSelection::new());

    assert_eq!(dashboard.metrics.case_count, 5);
    assert_eq!(dashboard.metrics.distinct_areas, 4);
    assert_eq!(dashboard.metrics.mean_complication_grade, Some(4.0));

    let grades: Vec<&str> = dashboard
        .charts
        .complication_counts
        .rows
        .iter()
        .map(|row| row.keys[0].as_str())
        .collect();
    assert_eq!(grades, vec!["0", "3", "10"]);
    assert_eq!(dashboard.charts.complication_counts.count_for(&["3", "II"]), Some(2));

    assert_eq!(dashboard.charts.cases_by_year.count_for(&["2023"]), Some(3));
    assert_eq!(
        dashboard.charts.cases_by_area.count_for(&["Allgemein, Hernien"]),
        Some(1)
    );
    assert_eq!(dashboard.charts.area_trend.count_for(&["2024", "Leber"]), Some(1));
    assert_eq!(
        dashboard.charts.access_by_year.count_for(&["2023", "Laparoskopisch"]),
        Some(2)
    );
    assert!(dashboard.notices().is_empty());
}

#[test]
fn single_area_selection_has_no_trend() {
    let records = registry();
    let dashboard = Dashboard::build(&records, FilterSelection::new().with_areas(["Leber"]));
    assert_eq!(dashboard.rows.len(), 2);
    assert!(dashboard.charts.area_trend.is_empty());
    let messages: Vec<&str> = dashboard.notices().iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["Nicht genügend Daten für Trendanalyse"]);
}

#[test]
fn missing_grades_and_hsm_are_not_counted() {
    let records = registry();
    assert_eq!(complication_counts(&records).total(), 4);

    let hsm = hsm_by_year(&records);
    assert_eq!(hsm.total(), 4);
    assert_eq!(hsm.count_for(&["2023", "Nein"]), Some(1));
    assert_eq!(hsm.count_for(&["2023", "Ja"]), Some(1));
    assert_eq!(hsm.count_for(&["2024", "Ja"]), Some(1));
}

#[test]
fn length_of_stay_statistics() {
    let records = registry();
    let stay = length_of_stay_by_year(&records);
    let row = stay.row_for(2023).unwrap();
    assert_eq!(row.count, 3);
    assert!((row.mean - 23.0 / 3.0).abs() < 1e-9);
    assert_eq!(row.median, 7.0);
    assert_eq!(stay.row_for(2024).unwrap().count, 1);
}

#[test]
fn quarter_table_snapshot() {
    let records = registry();
    insta::assert_json_snapshot!(cases_by_quarter(&records), @r#"
    {
      "key_names": [
        "quartal"
      ],
      "rows": [
        {
          "keys": [
            "Q1-2023"
          ],
          "count": 1
        },
        {
          "keys": [
            "Q2-2023"
          ],
          "count": 1
        },
        {
          "keys": [
            "Q4-2023"
          ],
          "count": 1
        },
        {
          "keys": [
            "Q1-2024"
          ],
          "count": 1
        },
        {
          "keys": [
            "Q3-2024"
          ],
          "count": 1
        }
      ]
    }
    "#);
}

#[test]
fn deselecting_every_quarter_of_a_year_drops_the_year() {
    let records = registry();
    let state = FilterState::derive(&records, FilterSelection::new());
    let next = state.apply(FilterChange::Quarters(Some(
        [q(2024, 1), q(2024, 3)].into_iter().collect(),
    )));

    assert_eq!(next.effective_years(), [2024].into_iter().collect());
    assert_eq!(
        next.selection().years,
        YearFilter::Set([2024].into_iter().collect())
    );
    assert_eq!(ids(&apply_filters(&records, next.selection())), vec!["4", "5"]);
}

#[test]
fn selecting_a_quarter_adds_its_year() {
    let records = registry();
    let state = FilterState::derive(&records, FilterSelection::new().with_years([2024]));
    let mut quarters = state.effective_quarters();
    quarters.insert(q(2023, 4));
    let next = state.apply(FilterChange::Quarters(Some(quarters)));

    assert_eq!(next.effective_years(), [2023, 2024].into_iter().collect());
    assert_eq!(ids(&apply_filters(&records, next.selection())), vec!["3", "4", "5"]);
}

#[test]
fn quarter_outside_the_year_set_selects_its_year() {
    let records = registry();
    let state = FilterState::derive(
        &records,
        FilterSelection::new()
            .with_years([2023])
            .with_quarters([q(2024, 1)]),
    );

    assert_eq!(
        state.selection().years,
        YearFilter::Set([2024].into_iter().collect())
    );
    assert_eq!(state.effective_quarters(), [q(2024, 1)].into_iter().collect());
    assert_eq!(ids(&apply_filters(&records, state.selection())), vec!["4"]);

    let dashboard = Dashboard::build(
        &records,
        FilterSelection::new()
            .with_years([2023])
            .with_quarters([q(2024, 1)]),
    );
    assert!(!dashboard.is_empty());
    assert_eq!(dashboard.metrics.case_count, 1);
}

#[test]
fn selecting_a_year_adds_all_of_its_quarters() {
    let records = registry();
    let state = FilterState::derive(
        &records,
        FilterSelection::new()
            .with_years([2024])
            .with_quarters([q(2024, 1)]),
    );
    let next = state.apply(FilterChange::Years(YearFilter::Set(
        [2023, 2024].into_iter().collect(),
    )));

    let expected: BTreeSet<QuarterKey> = [q(2023, 1), q(2023, 2), q(2023, 4), q(2024, 1)]
        .into_iter()
        .collect();
    assert_eq!(next.effective_quarters(), expected);
}

#[test]
fn reset_clears_every_dimension() {
    let records = registry();
    let state = FilterState::derive(&records, FilterSelection::new().with_areas(["Leber"]));
    let next = state.apply(FilterChange::Reset);
    assert_eq!(next.selection(), &FilterSelection::default());
    assert_eq!(next.available_areas().len(), 4);
    assert!(next.available_areas().contains(UNSPECIFIED_LABEL));
}

fn arb_record() -> impl Strategy<Value = CaseRecord> {
    (
        2019i32..2025,
        1u32..=12,
        prop::sample::subsequence(vec![1u32, 2, 4, 5], 0..=2),
        1i64..=5,
    )
        .prop_map(|(year, month, areas, access)| {
            let names: Vec<&str> = areas.iter().map(|code| area_name(*code)).collect();
            let mut record = Case::on("x", year, month).access(access).build();
            record.area_label = join_labels(&names);
            record.areas = names.iter().map(|name| (*name).to_string()).collect();
            record
        })
}

fn arb_selection() -> impl Strategy<Value = FilterSelection> {
    (
        prop::option::of(prop::collection::btree_set(2019i32..2025, 0..4)),
        prop::option::of(prop::sample::subsequence(
            vec!["Allgemein", "Hernien", "Leber", UNSPECIFIED_LABEL],
            0..=3,
        )),
        prop::option::of(prop::sample::subsequence(
            vec!["Offen", "Laparoskopisch", "Hybrid"],
            0..=2,
        )),
    )
        .prop_map(|(years, areas, access)| {
            let mut selection = FilterSelection::new();
            if let Some(years) = years {
                selection = selection.with_years(years);
            }
            if let Some(areas) = areas {
                selection = selection.with_areas(areas);
            }
            if let Some(access) = access {
                selection = selection.with_access(access);
            }
            selection
        })
}

proptest! {
    #[test]
    fn filtering_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..40),
        selection in arb_selection(),
    ) {
        let once = apply_filters(&records, &selection);
        let twice = apply_filters(once.iter().copied(), &selection);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_dimensions_commute(
        records in prop::collection::vec(arb_record(), 0..40),
        selection in arb_selection(),
    ) {
        let years_only = FilterSelection { years: selection.years.clone(), ..FilterSelection::default() };
        let rest = FilterSelection { years: YearFilter::All, ..selection.clone() };

        let years_first = apply_filters(
            apply_filters(&records, &years_only).iter().copied(),
            &rest,
        );
        let rest_first = apply_filters(
            apply_filters(&records, &rest).iter().copied(),
            &years_only,
        );
        let combined = apply_filters(&records, &selection);
        prop_assert_eq!(&years_first, &combined);
        prop_assert_eq!(&rest_first, &combined);
    }

    #[test]
    fn reconciled_state_is_a_fixed_point(
        records in prop::collection::vec(arb_record(), 1..40),
        years in prop::collection::btree_set(2019i32..2025, 0..4),
        quarters in prop::collection::btree_set((2019i32..2025, 1u32..=4), 0..8),
    ) {
        let quarters: BTreeSet<QuarterKey> = quarters
            .into_iter()
            .map(|(year, quarter)| QuarterKey::new(year, quarter).unwrap())
            .collect();
        let state = FilterState::derive(
            &records,
            FilterSelection::new().with_years(years).with_quarters(quarters),
        );
        let again = FilterState::derive(&records, state.selection().clone());
        prop_assert_eq!(&again, &state);

        // Every selected quarter belongs to a selected year and vice versa.
        let quarter_years: BTreeSet<i32> =
            state.effective_quarters().iter().map(|q| q.year()).collect();
        prop_assert_eq!(quarter_years, state.effective_years());
    }
}
