//! Wash Record Model
//!
//! The receipt entity: fixed fields + custom fields + removal bookkeeping +
//! signature + tenant binding. All operations consume and return the record
//! value — callers never observe shared in-place mutation.
//!
//! Removal semantics differ deliberately between the two field kinds:
//! removing a fixed field clears its value; removing a custom field keeps
//! the full object in `removed_custom_fields` so restore loses nothing.

use serde::{Deserialize, Serialize};

use super::custom_field::{CustomField, CustomFieldPatch, CustomFieldType, DuplicateOptionError};
use super::field_schema::{self, WashType};
use crate::util;

/// The wash receipt record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashRecord {
    /// Opaque unique identifier, generated once, immutable.
    #[serde(default)]
    pub id: String,
    /// Human-facing unique label.
    #[serde(default)]
    pub invoice_no: String,
    /// Creation time, RFC3339. Kept as a string: unparseable values are a
    /// filtering concern ("does not match"), never a decode failure.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub horse_reg: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub wash_type: String,
    /// Free-text companion, only meaningful while `wash_type` is `other`.
    #[serde(default)]
    pub other_wash_type: String,
    /// Display order is insertion order.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    /// Captured signature blob (base64 image). Always present, may be empty.
    #[serde(default)]
    pub signature: String,
    /// Fixed-field keys currently hidden from the form.
    #[serde(default)]
    pub removed_fields: Vec<String>,
    /// Removed custom fields, preserved with full content for restore.
    #[serde(default)]
    pub removed_custom_fields: Vec<CustomField>,
    /// Tenant binding, assigned from the creator's profile at save time.
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// Optional overrides for `WashRecord::create_with`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordInit {
    pub invoice_no: Option<String>,
    pub timestamp: Option<String>,
}

impl WashRecord {
    /// New record: fresh id, generated invoice code, current timestamp,
    /// empty fields, no organization.
    pub fn create() -> Self {
        Self::create_with(RecordInit::default())
    }

    pub fn create_with(init: RecordInit) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_no: init.invoice_no.unwrap_or_else(util::invoice_code),
            timestamp: init.timestamp.unwrap_or_else(util::now_rfc3339),
            driver_name: String::new(),
            horse_reg: String::new(),
            company_name: String::new(),
            wash_type: String::new(),
            other_wash_type: String::new(),
            custom_fields: Vec::new(),
            signature: String::new(),
            removed_fields: Vec::new(),
            removed_custom_fields: Vec::new(),
            organization_id: None,
        }
    }

    /// Update one fixed field by key. Unknown keys are ignored. Leaving the
    /// `other` wash type clears the companion field.
    pub fn set_field(mut self, key: &str, value: &str) -> Self {
        match key {
            field_schema::KEY_DRIVER_NAME => self.driver_name = value.to_string(),
            field_schema::KEY_HORSE_REG => self.horse_reg = value.to_string(),
            field_schema::KEY_COMPANY_NAME => self.company_name = value.to_string(),
            field_schema::KEY_WASH_TYPE => {
                self.wash_type = value.to_string();
                if !self.shows_other_wash_type() {
                    self.other_wash_type.clear();
                }
            }
            _ => {}
        }
        self
    }

    /// Read one fixed field by key. Unknown keys read as empty.
    pub fn field_value(&self, key: &str) -> &str {
        match key {
            field_schema::KEY_DRIVER_NAME => &self.driver_name,
            field_schema::KEY_HORSE_REG => &self.horse_reg,
            field_schema::KEY_COMPANY_NAME => &self.company_name,
            field_schema::KEY_WASH_TYPE => &self.wash_type,
            _ => "",
        }
    }

    /// Set the free-text companion shown while `wash_type` is `other`.
    /// Leaving `other` via `set_field` clears it again.
    pub fn set_other_wash_type(mut self, value: &str) -> Self {
        self.other_wash_type = value.to_string();
        self
    }

    /// Whether the free-text wash type companion field applies.
    pub fn shows_other_wash_type(&self) -> bool {
        WashType::from_string(&self.wash_type) == Some(WashType::Other)
    }

    /// Append a new empty custom field of the given type.
    pub fn add_custom_field(mut self, field_type: CustomFieldType) -> Self {
        self.custom_fields.push(CustomField::new(field_type));
        self
    }

    /// Merge a partial update into the matching custom field. No-op when the
    /// id is not found.
    pub fn update_custom_field(mut self, id: &str, patch: CustomFieldPatch) -> Self {
        if let Some(field) = self.custom_fields.iter_mut().find(|f| f.id == id) {
            field.apply(patch);
        }
        self
    }

    /// Move the full custom field object into `removed_custom_fields`.
    /// No-op when the id is not found.
    pub fn remove_custom_field(mut self, id: &str) -> Self {
        if let Some(pos) = self.custom_fields.iter().position(|f| f.id == id) {
            let field = self.custom_fields.remove(pos);
            self.removed_custom_fields.push(field);
        }
        self
    }

    /// Re-append a removed custom field, dropping it from the removed set by
    /// id so the two collections stay disjoint.
    pub fn restore_custom_field(mut self, field: CustomField) -> Self {
        self.removed_custom_fields.retain(|f| f.id != field.id);
        if !self.custom_fields.iter().any(|f| f.id == field.id) {
            self.custom_fields.push(field);
        }
        self
    }

    /// Hide a fixed field and clear its value. Non-schema keys never enter
    /// `removed_fields`.
    pub fn remove_fixed_field(mut self, key: &str) -> Self {
        if !field_schema::is_fixed_key(key) {
            return self;
        }
        if !self.removed_fields.iter().any(|k| k == key) {
            self.removed_fields.push(key.to_string());
        }
        self.set_field(key, "")
    }

    /// Un-hide a fixed field. The value stays empty until re-entered.
    pub fn restore_fixed_field(mut self, key: &str) -> Self {
        self.removed_fields.retain(|k| k != key);
        self
    }

    /// Fails when any dropdown/checkbox field carries two equal non-blank
    /// options. Blocks saving the whole record.
    pub fn validate(&self) -> Result<(), DuplicateOptionError> {
        for field in &self.custom_fields {
            if let Some(option) = field.duplicate_option() {
                return Err(DuplicateOptionError {
                    label: field.label.clone(),
                    option: option.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Attach the captured signature blob. An untouched pad yields an empty
    /// blob, which is still a savable record.
    pub fn finalize(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// First custom field with the given exact label, insertion order.
    /// Duplicate labels resolve deterministically to the first match.
    pub fn custom_field_by_label(&self, label: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.label == label)
    }
}
