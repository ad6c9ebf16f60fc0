//! Data model for the surgical case registry dashboard.
//!
//! - **case**: normalized [`CaseRecord`]s and the [`CaseSet`] produced by a transform run
//! - **quarter**: [`QuarterKey`] with its `Qn-YYYY` label and chronological sort key
//! - **code_table**: the generic coded-field abstractions ([`CodeTable`], [`CheckboxGroup`])
//! - **tables**: the canonical registry tables and export field list

pub mod case;
pub mod code_table;
pub mod error;
pub mod quarter;
pub mod tables;

pub use case::{CaseRecord, CaseSet};
pub use code_table::{
    CheckboxGroup, CodeTable, LABEL_SEPARATOR, UNKNOWN_LABEL, UNSPECIFIED_LABEL, is_checked,
    join_labels, parse_code,
};
pub use error::{ModelError, Result};
pub use quarter::QuarterKey;
pub use tables::{CHECKBOX_GROUPS, CODE_TABLES, EXPORT_FIELDS, fields};
