//! The registry fields the reporter requests and how their codes are read.

use serde::Serialize;

use opreg_model::{CHECKBOX_GROUPS, CODE_TABLES, CheckboxGroup, CodeTable, EXPORT_FIELDS};

#[derive(Debug, Clone, Serialize)]
pub struct FieldCatalog {
    /// Fields named in the export request, in request order.
    pub export_fields: Vec<&'static str>,
    pub code_tables: Vec<CodeTable>,
    pub checkbox_groups: Vec<CheckboxGroup>,
}

pub fn field_catalog() -> FieldCatalog {
    FieldCatalog {
        export_fields: EXPORT_FIELDS.to_vec(),
        code_tables: CODE_TABLES.to_vec(),
        checkbox_groups: CHECKBOX_GROUPS.to_vec(),
    }
}
