//! Fixed Field Schema
//!
//! The closed set of schema-defined record fields and the wash type taxonomy.
//! Single source of truth consulted by record validation, the restore path,
//! and the filter engine's fixed-field handling.

use serde::{Deserialize, Serialize};

/// One fixed field: key used in payloads, label shown on forms and receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedField {
    pub key: &'static str,
    pub label: &'static str,
}

pub const KEY_DRIVER_NAME: &str = "driver_name";
pub const KEY_HORSE_REG: &str = "horse_reg";
pub const KEY_COMPANY_NAME: &str = "company_name";
pub const KEY_WASH_TYPE: &str = "wash_type";

/// The schema-defined, non-extensible record fields.
pub const FIXED_FIELDS: [FixedField; 4] = [
    FixedField {
        key: KEY_DRIVER_NAME,
        label: "Driver name",
    },
    FixedField {
        key: KEY_HORSE_REG,
        label: "Vehicle / registration",
    },
    FixedField {
        key: KEY_COMPANY_NAME,
        label: "Company name",
    },
    FixedField {
        key: KEY_WASH_TYPE,
        label: "Wash type",
    },
];

/// Whether `key` names a schema-defined fixed field.
pub fn is_fixed_key(key: &str) -> bool {
    FIXED_FIELDS.iter().any(|f| f.key == key)
}

/// Display label for a fixed-field key.
pub fn label_for(key: &str) -> Option<&'static str> {
    FIXED_FIELDS.iter().find(|f| f.key == key).map(|f| f.label)
}

/// Wash type
///
/// Closed set of named values plus `Other`, which pairs with the free-text
/// `other_wash_type` companion field on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WashType {
    FullWash,
    ExteriorWash,
    InteriorWash,
    Disinfection,
    Other,
}

impl WashType {
    pub const ALL: [WashType; 5] = [
        WashType::FullWash,
        WashType::ExteriorWash,
        WashType::InteriorWash,
        WashType::Disinfection,
        WashType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WashType::FullWash => "full_wash",
            WashType::ExteriorWash => "exterior_wash",
            WashType::InteriorWash => "interior_wash",
            WashType::Disinfection => "disinfection",
            WashType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WashType::FullWash => "Full wash",
            WashType::ExteriorWash => "Exterior wash",
            WashType::InteriorWash => "Interior wash",
            WashType::Disinfection => "Disinfection",
            WashType::Other => "Other",
        }
    }

    /// Parse a stored wash type value. Unknown strings are not coerced —
    /// the companion-field rule depends on an exact `Other` match.
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "full_wash" => Some(WashType::FullWash),
            "exterior_wash" => Some(WashType::ExteriorWash),
            "interior_wash" => Some(WashType::InteriorWash),
            "disinfection" => Some(WashType::Disinfection),
            "other" => Some(WashType::Other),
            _ => None,
        }
    }
}
