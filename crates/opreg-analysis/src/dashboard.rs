//! Everything one dashboard render needs, computed in one go.

use serde::Serialize;
use tracing::{debug, info_span};

use opreg_model::CaseRecord;

use crate::aggregate::{
    CountTable, StayTable, access_by_year, area_trend, cases_by_area, cases_by_quarter,
    cases_by_year, complication_counts, hsm_by_year, length_of_stay_by_year,
};
use crate::filter::{FilterSelection, apply_filters};
use crate::metrics::Metrics;
use crate::state::FilterState;

/// Shown instead of every chart when the selection matches no case.
pub const NO_DATA_NOTICE: &str = "Keine Daten für die aktuelle Auswahl";

/// The charts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    CasesByYear,
    CasesByQuarter,
    CasesByArea,
    AreaTrend,
    AccessByYear,
    Complications,
    HsmByYear,
    LengthOfStay,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::CasesByYear,
        ChartKind::CasesByQuarter,
        ChartKind::CasesByArea,
        ChartKind::AreaTrend,
        ChartKind::AccessByYear,
        ChartKind::Complications,
        ChartKind::HsmByYear,
        ChartKind::LengthOfStay,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::CasesByYear => "Fälle pro Jahr",
            ChartKind::CasesByQuarter => "Fälle pro Quartal",
            ChartKind::CasesByArea => "Verteilung nach Bereich",
            ChartKind::AreaTrend => "Trend nach Bereich",
            ChartKind::AccessByYear => "Zugangsart pro Jahr",
            ChartKind::Complications => "Komplikationen (Clavien-Dindo)",
            ChartKind::HsmByYear => "HSM pro Jahr",
            ChartKind::LengthOfStay => "Verweildauer pro Jahr",
        }
    }

    /// Informational message shown when the chart has nothing to plot.
    pub fn empty_notice(self) -> &'static str {
        match self {
            ChartKind::CasesByYear | ChartKind::CasesByQuarter => "Keine Falldaten verfügbar",
            ChartKind::CasesByArea => "Keine Bereichsdaten verfügbar",
            ChartKind::AreaTrend => "Nicht genügend Daten für Trendanalyse",
            ChartKind::AccessByYear => "Keine Zugangsdaten verfügbar",
            ChartKind::Complications => "Keine Komplikationsdaten verfügbar",
            ChartKind::HsmByYear => "Keine HSM-Informationen verfügbar",
            ChartKind::LengthOfStay => "Keine Verweildauerdaten verfügbar",
        }
    }
}

/// A message for the presentation layer in place of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// `None` for the selection-wide notice.
    pub chart: Option<ChartKind>,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Charts {
    pub cases_by_year: CountTable,
    pub cases_by_quarter: CountTable,
    pub cases_by_area: CountTable,
    /// Empty unless at least two distinct areas are present.
    pub area_trend: CountTable,
    pub access_by_year: CountTable,
    pub complication_counts: CountTable,
    pub hsm_by_year: CountTable,
    pub length_of_stay: StayTable,
}

impl Charts {
    pub fn is_empty(&self, kind: ChartKind) -> bool {
        match kind {
            ChartKind::CasesByYear => self.cases_by_year.is_empty(),
            ChartKind::CasesByQuarter => self.cases_by_quarter.is_empty(),
            ChartKind::CasesByArea => self.cases_by_area.is_empty(),
            ChartKind::AreaTrend => self.area_trend.is_empty(),
            ChartKind::AccessByYear => self.access_by_year.is_empty(),
            ChartKind::Complications => self.complication_counts.is_empty(),
            ChartKind::HsmByYear => self.hsm_by_year.is_empty(),
            ChartKind::LengthOfStay => self.length_of_stay.is_empty(),
        }
    }

    /// The count table behind `kind`; `None` for the length-of-stay chart.
    pub fn table(&self, kind: ChartKind) -> Option<&CountTable> {
        match kind {
            ChartKind::CasesByYear => Some(&self.cases_by_year),
            ChartKind::CasesByQuarter => Some(&self.cases_by_quarter),
            ChartKind::CasesByArea => Some(&self.cases_by_area),
            ChartKind::AreaTrend => Some(&self.area_trend),
            ChartKind::AccessByYear => Some(&self.access_by_year),
            ChartKind::Complications => Some(&self.complication_counts),
            ChartKind::HsmByYear => Some(&self.hsm_by_year),
            ChartKind::LengthOfStay => None,
        }
    }
}

/// Filter state, filtered rows, metrics and chart tables for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard<'a> {
    pub state: FilterState,
    pub rows: Vec<&'a CaseRecord>,
    pub metrics: Metrics,
    pub charts: Charts,
}

impl<'a> Dashboard<'a> {
    pub fn build(records: &'a [CaseRecord], selection: FilterSelection) -> Self {
        let span = info_span!("dashboard", records = records.len());
        let _guard = span.enter();

        let state = FilterState::derive(records, selection);
        let rows = apply_filters(records, state.selection());
        let metrics = Metrics::compute(rows.iter().copied());
        let trend = if metrics.distinct_areas > 1 {
            area_trend(rows.iter().copied())
        } else {
            CountTable::empty(&["jahr", "bereich"])
        };
        let charts = Charts {
            cases_by_year: cases_by_year(rows.iter().copied()),
            cases_by_quarter: cases_by_quarter(rows.iter().copied()),
            cases_by_area: cases_by_area(rows.iter().copied()),
            area_trend: trend,
            access_by_year: access_by_year(rows.iter().copied()),
            complication_counts: complication_counts(rows.iter().copied()),
            hsm_by_year: hsm_by_year(rows.iter().copied()),
            length_of_stay: length_of_stay_by_year(rows.iter().copied()),
        };
        debug!(rows = rows.len(), "dashboard built");

        Self {
            state,
            rows,
            metrics,
            charts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Messages to show instead of charts.
    ///
    /// An empty selection yields the single selection-wide notice; otherwise
    /// one notice per chart with nothing to plot.
    pub fn notices(&self) -> Vec<Notice> {
        if self.is_empty() {
            return vec![Notice {
                chart: None,
                message: NO_DATA_NOTICE,
            }];
        }
        ChartKind::ALL
            .into_iter()
            .filter(|kind| self.charts.is_empty(*kind))
            .map(|kind| Notice {
                chart: Some(kind),
                message: kind.empty_notice(),
            })
            .collect()
    }
}
