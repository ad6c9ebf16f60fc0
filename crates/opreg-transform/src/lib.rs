//! Registry record transformation.
//!
//! This crate turns the raw, string-typed export frame into normalized
//! [`opreg_model::CaseRecord`]s:
//!
//! - **transformer**: the single-pass reshaping routine ([`transform_records`])
//! - **datetime**: procedure date parsing
//! - **numeric**: duration and flag parsing
//! - **frame**: cell access on Polars data frames
//! - **export**: normalized records back into a data frame ([`cases_to_frame`])

pub mod datetime;
pub mod export;
pub mod frame;
pub mod numeric;
pub mod transformer;

pub use datetime::parse_procedure_date;
pub use export::{EXPORT_COLUMNS, cases_to_frame};
pub use transformer::transform_records;
