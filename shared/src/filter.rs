//! Filter Engine
//!
//! Pure filtering over record collections. All spec fields are optional and
//! combine with logical AND:
//!
//! - `invoice_no`: case-insensitive substring on the invoice number
//! - `date_from` / `date_to`: inclusive calendar-day bounds against the
//!   record timestamp; comparing by calendar date is equivalent to the
//!   00:00:00.000 / 23:59:59.999 day-bound normalization
//! - `fields`: custom-field label → case-insensitive substring on the value;
//!   records without a field of that exact label do not match

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::WashRecord;

/// Filter specification. Unknown keys from a query surface are collected
/// into `fields` as custom-field label constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub invoice_no: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.invoice_no.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.fields.is_empty()
    }
}

/// Matching subset of `records`, input order preserved.
pub fn filter(records: &[WashRecord], spec: &FilterSpec) -> Vec<WashRecord> {
    records
        .iter()
        .filter(|r| matches(r, spec))
        .cloned()
        .collect()
}

fn matches(record: &WashRecord, spec: &FilterSpec) -> bool {
    if let Some(needle) = &spec.invoice_no
        && !record
            .invoice_no
            .to_lowercase()
            .contains(&needle.to_lowercase())
    {
        return false;
    }

    if spec.date_from.is_some() || spec.date_to.is_some() {
        // Unparseable timestamps are "does not match" once any bound is set.
        let Some(date) = record_date(record) else {
            return false;
        };
        if let Some(from) = spec.date_from
            && date < from
        {
            return false;
        }
        if let Some(to) = spec.date_to
            && date > to
        {
            return false;
        }
    }

    for (label, needle) in &spec.fields {
        // Duplicate labels: first field in insertion order is consulted.
        let Some(field) = record.custom_field_by_label(label) else {
            return false;
        };
        if !field.value.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }

    true
}

fn record_date(record: &WashRecord) -> Option<NaiveDate> {
    chrono::DateTime::parse_from_rfc3339(&record.timestamp)
        .ok()
        .map(|dt| dt.date_naive())
}
