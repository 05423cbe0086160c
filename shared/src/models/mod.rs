//! Data models shared across the wash server stack.

pub mod company;
pub mod custom_field;
pub mod field_schema;
pub mod record;

pub use company::{CompanySettings, Profile};
pub use custom_field::{CustomField, CustomFieldPatch, CustomFieldType, DuplicateOptionError};
pub use field_schema::{
    FIXED_FIELDS, FixedField, KEY_COMPANY_NAME, KEY_DRIVER_NAME, KEY_HORSE_REG, KEY_WASH_TYPE,
    WashType,
};
pub use record::{RecordInit, WashRecord};
