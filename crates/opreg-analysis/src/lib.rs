//! Filtering and aggregation over normalized case records.
//!
//! All functions here are pure: they borrow the transformed records and
//! return new collections. [`Dashboard::build`] is the single entry point a
//! presentation layer needs; the individual pieces are public for reuse.

pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod metrics;
pub mod state;

pub use aggregate::{
    CountRow, CountTable, StayRow, StayTable, access_by_year, area_trend, cases_by_area,
    cases_by_quarter, cases_by_year, complication_counts, hsm_by_year, length_of_stay_by_year,
};
pub use dashboard::{ChartKind, Charts, Dashboard, NO_DATA_NOTICE, Notice};
pub use filter::{FilterSelection, YearFilter, apply_filters};
pub use metrics::Metrics;
pub use state::{FilterChange, FilterState};
