//! Washbay Shared - 数据模型与纯逻辑
//!
//! Common types shared between the wash server and its clients:
//!
//! - **models** (`models`): record entity, field schema, custom fields,
//!   company settings
//! - **filter** (`filter`): pure filtering over record collections
//! - **util** (`util`): timestamps and invoice code generation

pub mod filter;
pub mod models;
pub mod util;

// Re-export 公共类型
pub use filter::{FilterSpec, filter};
pub use models::{
    CompanySettings, CustomField, CustomFieldPatch, CustomFieldType, DuplicateOptionError,
    FixedField, Profile, RecordInit, WashRecord, WashType,
};
