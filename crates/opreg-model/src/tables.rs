//! Canonical code tables for the surgical case registry.
//!
//! The Clavien-Dindo table is the 14-step registry encoding (0-13) in which
//! each grade from I to IVb is followed by its "-d" variant (disability at
//! discharge). Older exports that used truncated tables resolve through this
//! one table.

use crate::code_table::{CheckboxGroup, CodeTable};

/// Registry field names.
pub mod fields {
    pub const RECORD_ID: &str = "record_id";
    pub const PROCEDURE_DATE: &str = "opdatum";
    pub const AREA: &str = "bereich";
    pub const ACCESS: &str = "zugang";
    pub const COMPLICATION_GRADE: &str = "max_dindo_calc_surv";
    pub const HSM: &str = "hsm";
    pub const LOS_TOTAL: &str = "los_total";
    pub const LOS_ICU: &str = "los_icu";
    pub const LIVER_GROUP: &str = "leber_gruppen";
    pub const SARCOMA_GROUP: &str = "sarkom_gruppen";
    pub const LOCALIZATION: &str = "lokalisation";
    pub const PROCEDURE_TYPE: &str = "eingriff_art";
    pub const HIPEC: &str = "hipec";
}

/// Fixed field list requested from the registry export.
///
/// Checkbox groups are requested by their base name; the registry expands
/// them into `<field>___<code>` indicator columns.
pub const EXPORT_FIELDS: &[&str] = &[
    fields::RECORD_ID,
    fields::PROCEDURE_DATE,
    fields::AREA,
    fields::ACCESS,
    fields::COMPLICATION_GRADE,
    fields::HSM,
    fields::LOS_TOTAL,
    fields::LOS_ICU,
    fields::LIVER_GROUP,
    fields::SARCOMA_GROUP,
    fields::LOCALIZATION,
    fields::PROCEDURE_TYPE,
    fields::HIPEC,
];

pub const AREA: CheckboxGroup = CheckboxGroup::new(
    "Bereich",
    fields::AREA,
    &[
        (1, "Allgemein"),
        (2, "Oberer GI"),
        (3, "Kolorektal"),
        (4, "Hernien"),
        (5, "Leber"),
        (6, "Pankreas"),
        (7, "Sarkom"),
        (8, "Endokrin"),
        (9, "Peritoneum"),
    ],
);

pub const LIVER_GROUP: CheckboxGroup = CheckboxGroup::new(
    "Lebergruppe",
    fields::LIVER_GROUP,
    &[
        (1, "Primäre Lebertumoren"),
        (2, "Kolorektale Lebermetastasen"),
        (3, "Nicht-kolorektale Lebermetastasen"),
        (4, "Benigne Läsionen"),
    ],
);

pub const SARCOMA_GROUP: CheckboxGroup = CheckboxGroup::new(
    "Sarkomgruppe",
    fields::SARCOMA_GROUP,
    &[
        (1, "Retroperitoneal"),
        (2, "Extremität"),
        (3, "Rumpf"),
        (4, "Viszeral/GIST"),
    ],
);

pub const LOCALIZATION: CheckboxGroup = CheckboxGroup::new(
    "Lokalisation",
    fields::LOCALIZATION,
    &[
        (1, "Ösophagus"),
        (2, "Magen"),
        (3, "Dünndarm"),
        (4, "Kolon"),
        (5, "Rektum"),
        (6, "Anus"),
    ],
);

/// Every checkbox group collapsed by the transformer.
pub const CHECKBOX_GROUPS: &[CheckboxGroup] = &[AREA, LIVER_GROUP, SARCOMA_GROUP, LOCALIZATION];

pub const ACCESS: CodeTable = CodeTable::new(
    "Zugang",
    fields::ACCESS,
    &[
        (1, "Offen"),
        (2, "Laparoskopisch"),
        (3, "Roboter-assistiert"),
        (4, "Konvertiert"),
        (5, "Hybrid"),
    ],
);

pub const COMPLICATION_GRADE: CodeTable = CodeTable::new(
    "Clavien-Dindo",
    fields::COMPLICATION_GRADE,
    &[
        (0, "Keine Komplikation"),
        (1, "I"),
        (2, "I-d"),
        (3, "II"),
        (4, "II-d"),
        (5, "IIIa"),
        (6, "IIIa-d"),
        (7, "IIIb"),
        (8, "IIIb-d"),
        (9, "IVa"),
        (10, "IVa-d"),
        (11, "IVb"),
        (12, "IVb-d"),
        (13, "V"),
    ],
);

pub const HSM: CodeTable = CodeTable::new("HSM", fields::HSM, &[(0, "Nein"), (1, "Ja")]);

pub const PROCEDURE_TYPE: CodeTable = CodeTable::new(
    "Eingriffsart",
    fields::PROCEDURE_TYPE,
    &[(1, "Elektiv"), (2, "Dringlich"), (3, "Notfall")],
);

pub const HIPEC: CodeTable = CodeTable::new("HIPEC", fields::HIPEC, &[(0, "Nein"), (1, "Ja")]);

/// Every single-valued code table mapped by the transformer.
pub const CODE_TABLES: &[CodeTable] = &[ACCESS, COMPLICATION_GRADE, HSM, PROCEDURE_TYPE, HIPEC];
