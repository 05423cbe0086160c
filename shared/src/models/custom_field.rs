//! Custom Field Model
//!
//! User-defined typed extra fields attached to a record. Three variants
//! share one string value representation:
//!
//! | Type | `value` |
//! |------|---------|
//! | `text` | free text |
//! | `dropdown` | the selected option |
//! | `checkbox` | comma-joined subset of selected options (empty = none) |
//!
//! The checkbox encoding keeps exact comma split/join semantics — option
//! values containing commas are fragile by design and not silently fixed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    #[default]
    Text,
    Dropdown,
    Checkbox,
}

impl CustomFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomFieldType::Text => "text",
            CustomFieldType::Dropdown => "dropdown",
            CustomFieldType::Checkbox => "checkbox",
        }
    }

    /// Dropdown and checkbox fields carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, CustomFieldType::Dropdown | CustomFieldType::Checkbox)
    }
}

/// Two identical non-blank options on one dropdown/checkbox field.
/// Blocks saving the whole record, not just the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate option '{option}' on custom field '{label}'")]
pub struct DuplicateOptionError {
    pub label: String,
    pub option: String,
}

/// A user-defined typed field on a record.
///
/// Labels are not required to be unique; filtering and rendering consult
/// the first field with a given label in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    /// Option list, relevant only for dropdown/checkbox. May contain blank
    /// entries while editing; duplicate non-blank entries fail validation.
    #[serde(default)]
    pub options: Vec<String>,
}

impl CustomField {
    /// New empty field. Dropdown/checkbox start with one empty option slot.
    pub fn new(field_type: CustomFieldType) -> Self {
        let options = if field_type.has_options() {
            vec![String::new()]
        } else {
            Vec::new()
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field_type,
            label: String::new(),
            value: String::new(),
            options,
        }
    }

    /// Selected checkbox options decoded from the comma-joined value.
    pub fn checkbox_values(&self) -> Vec<&str> {
        if self.value.is_empty() {
            Vec::new()
        } else {
            self.value.split(',').collect()
        }
    }

    /// Encode a checkbox selection back into the comma-joined value.
    pub fn set_checkbox_values(&mut self, selected: &[&str]) {
        self.value = selected.join(",");
    }

    /// First duplicated non-blank option, case-sensitive exact match.
    pub fn duplicate_option(&self) -> Option<&str> {
        if !self.field_type.has_options() {
            return None;
        }
        for (i, opt) in self.options.iter().enumerate() {
            if opt.is_empty() {
                continue;
            }
            if self.options[..i].iter().any(|prev| prev == opt) {
                return Some(opt);
            }
        }
        None
    }

    /// Merge a partial update. Absent fields keep their current value.
    pub fn apply(&mut self, patch: CustomFieldPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(options) = patch.options {
            self.options = options;
        }
    }
}

/// Partial update for a custom field, merged by `CustomField::apply`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFieldPatch {
    pub label: Option<String>,
    pub value: Option<String>,
    pub options: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_option_fields_get_empty_slot() {
        let text = CustomField::new(CustomFieldType::Text);
        assert!(text.options.is_empty());

        let dropdown = CustomField::new(CustomFieldType::Dropdown);
        assert_eq!(dropdown.options, vec![String::new()]);

        let checkbox = CustomField::new(CustomFieldType::Checkbox);
        assert_eq!(checkbox.options, vec![String::new()]);
    }

    #[test]
    fn test_checkbox_join_split() {
        let mut field = CustomField::new(CustomFieldType::Checkbox);
        field.options = vec!["Soap".into(), "Wax".into(), "Rinse".into()];

        field.set_checkbox_values(&["Soap", "Rinse"]);
        assert_eq!(field.value, "Soap,Rinse");
        assert_eq!(field.checkbox_values(), vec!["Soap", "Rinse"]);

        field.set_checkbox_values(&[]);
        assert_eq!(field.value, "");
        assert!(field.checkbox_values().is_empty());
    }

    #[test]
    fn test_duplicate_option_detection() {
        let mut field = CustomField::new(CustomFieldType::Dropdown);
        field.label = "Priority".into();

        field.options = vec!["A".into(), "B".into()];
        assert_eq!(field.duplicate_option(), None);

        field.options = vec!["A".into(), "A".into()];
        assert_eq!(field.duplicate_option(), Some("A"));

        // Blank duplicates are allowed while editing
        field.options = vec![String::new(), String::new()];
        assert_eq!(field.duplicate_option(), None);

        // Case-sensitive exact match
        field.options = vec!["a".into(), "A".into()];
        assert_eq!(field.duplicate_option(), None);
    }

    #[test]
    fn test_text_field_never_reports_duplicates() {
        let mut field = CustomField::new(CustomFieldType::Text);
        field.options = vec!["A".into(), "A".into()];
        assert_eq!(field.duplicate_option(), None);
    }

    #[test]
    fn test_apply_patch_merges() {
        let mut field = CustomField::new(CustomFieldType::Dropdown);
        field.apply(CustomFieldPatch {
            label: Some("Priority".into()),
            value: None,
            options: Some(vec!["Low".into(), "High".into()]),
        });
        assert_eq!(field.label, "Priority");
        assert_eq!(field.value, "");
        assert_eq!(field.options.len(), 2);

        field.apply(CustomFieldPatch {
            value: Some("High".into()),
            ..Default::default()
        });
        assert_eq!(field.label, "Priority");
        assert_eq!(field.value, "High");
    }
}
