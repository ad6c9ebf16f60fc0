//! Coded registry fields and their display labels.
//!
//! The registry exports every categorical attribute as raw codes. Two shapes
//! occur:
//!
//! - **Single-valued codes** (radio buttons, dropdowns): one field holding an
//!   integer code. Resolved through a [`CodeTable`].
//! - **Checkbox groups**: one indicator field per option, named
//!   `<field>___<code>`, each `"1"` or `"0"`. Collapsed through a
//!   [`CheckboxGroup`] into a comma-joined label.
//!
//! Resolution is total. Missing, non-numeric and unmapped values resolve to
//! [`UNKNOWN_LABEL`]; a checkbox group with no checked option resolves to
//! [`UNSPECIFIED_LABEL`].

use serde::Serialize;

/// Label for codes that are missing, malformed or not in the table.
pub const UNKNOWN_LABEL: &str = "Unbekannt";

/// Label for a checkbox group with no option checked.
pub const UNSPECIFIED_LABEL: &str = "Nicht angegeben";

/// Separator used when joining checked checkbox options.
pub const LABEL_SEPARATOR: &str = ", ";

/// Parse a raw registry code.
///
/// Accepts surrounding whitespace and integral floats (`"3.0"`), which the
/// registry emits for calculated fields.
pub fn parse_code(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(code) = trimmed.parse::<i64>() {
        return Some(code);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Lookup table for a single-valued coded field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CodeTable {
    /// Human-readable name of the attribute (e.g. "Zugang").
    pub name: &'static str,
    /// Registry field the code is read from.
    pub field: &'static str,
    entries: &'static [(i64, &'static str)],
}

impl CodeTable {
    pub const fn new(
        name: &'static str,
        field: &'static str,
        entries: &'static [(i64, &'static str)],
    ) -> Self {
        Self {
            name,
            field,
            entries,
        }
    }

    pub fn entries(&self) -> &'static [(i64, &'static str)] {
        self.entries
    }

    /// Label for a known code.
    pub fn label_for_code(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, label)| *label)
    }

    /// Code for a label, case-insensitive.
    pub fn code_for_label(&self, label: &str) -> Option<i64> {
        let wanted = label.trim();
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(wanted))
            .map(|(code, _)| *code)
    }

    /// Resolve a parsed code; `None` and unmapped codes become [`UNKNOWN_LABEL`].
    pub fn label_or_unknown(&self, code: Option<i64>) -> &'static str {
        code.and_then(|code| self.label_for_code(code))
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Resolve a raw registry value. Never fails.
    pub fn resolve(&self, raw: Option<&str>) -> &'static str {
        self.label_or_unknown(raw.and_then(parse_code))
    }

    /// All labels in code order, followed by [`UNKNOWN_LABEL`].
    pub fn labels_with_unknown(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self.entries.iter().map(|(_, label)| *label).collect();
        labels.push(UNKNOWN_LABEL);
        labels
    }
}

/// A multi-select attribute stored as one indicator field per option.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckboxGroup {
    /// Human-readable name of the attribute (e.g. "Bereich").
    pub name: &'static str,
    /// Base registry field; indicator columns are `<field>___<code>`.
    pub field: &'static str,
    options: &'static [(u32, &'static str)],
}

impl CheckboxGroup {
    pub const fn new(
        name: &'static str,
        field: &'static str,
        options: &'static [(u32, &'static str)],
    ) -> Self {
        Self {
            name,
            field,
            options,
        }
    }

    pub fn options(&self) -> &'static [(u32, &'static str)] {
        self.options
    }

    /// Indicator column prefix (e.g. `bereich___`).
    pub fn prefix(&self) -> String {
        format!("{}___", self.field)
    }

    /// Indicator column name for one option code.
    pub fn column_name(&self, code: u32) -> String {
        format!("{}___{}", self.field, code)
    }

    /// Whether `column` is one of this group's indicator columns.
    pub fn is_indicator(&self, column: &str) -> bool {
        column
            .strip_prefix(self.field)
            .and_then(|rest| rest.strip_prefix("___"))
            .is_some_and(|code| code.parse::<u32>().is_ok())
    }

    /// Labels of the checked options, in option order.
    ///
    /// `value_of` returns the raw indicator value for a column name, or
    /// `None` when the column is absent.
    pub fn checked_labels<'a, F>(&self, mut value_of: F) -> Vec<&'static str>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        self.options
            .iter()
            .filter(|(code, _)| value_of(&self.column_name(*code)).is_some_and(is_checked))
            .map(|(_, label)| *label)
            .collect()
    }

    /// Collapse indicator values into one label.
    pub fn collapse<'a, F>(&self, value_of: F) -> String
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        join_labels(&self.checked_labels(value_of))
    }
}

/// Whether a raw indicator value means "checked".
pub fn is_checked(raw: &str) -> bool {
    parse_code(raw) == Some(1)
}

/// Join checked labels, or return [`UNSPECIFIED_LABEL`] when none are set.
pub fn join_labels(labels: &[&str]) -> String {
    if labels.is_empty() {
        UNSPECIFIED_LABEL.to_string()
    } else {
        labels.join(LABEL_SEPARATOR)
    }
}
