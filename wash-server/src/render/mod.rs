//! Receipt Rendering
//!
//! Turns a finished record plus company settings into a self-contained
//! HTML document. Two layouts are offered; both escape every value that
//! originates from user input.

use shared::models::{CompanySettings, WashRecord, WashType, FIXED_FIELDS, KEY_WASH_TYPE};

/// Available receipt layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptTemplate {
    #[default]
    Classic,
    Compact,
}

impl ReceiptTemplate {
    pub const ALL: [ReceiptTemplate; 2] = [ReceiptTemplate::Classic, ReceiptTemplate::Compact];

    pub fn id(self) -> &'static str {
        match self {
            ReceiptTemplate::Classic => "classic",
            ReceiptTemplate::Compact => "compact",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReceiptTemplate::Classic => "Classic",
            ReceiptTemplate::Compact => "Compact",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// Minimal HTML escaping for text nodes and attribute values.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Display value for a fixed field, resolving the wash type to its label
/// and substituting the free-text description when "Other" is selected.
fn fixed_field_value(record: &WashRecord, key: &str) -> String {
    if key != KEY_WASH_TYPE {
        return record.field_value(key).to_string();
    }
    match WashType::from_string(&record.wash_type) {
        Some(WashType::Other) => {
            if record.other_wash_type.is_empty() {
                WashType::Other.label().to_string()
            } else {
                record.other_wash_type.clone()
            }
        }
        Some(kind) => kind.label().to_string(),
        None => record.wash_type.clone(),
    }
}

fn detail_rows(record: &WashRecord) -> String {
    let mut rows = String::new();
    for field in FIXED_FIELDS {
        if record.removed_fields.iter().any(|k| k == field.key) {
            continue;
        }
        let value = fixed_field_value(record, field.key);
        if value.is_empty() {
            continue;
        }
        rows.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            escape(field.label),
            escape(&value)
        ));
    }
    for field in &record.custom_fields {
        if field.label.is_empty() && field.value.is_empty() {
            continue;
        }
        rows.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            escape(&field.label),
            escape(&field.value)
        ));
    }
    rows
}

/// Signature block, only when the stored value is an image data URI.
fn signature_block(record: &WashRecord) -> String {
    if !record.signature.starts_with("data:") {
        return String::new();
    }
    format!(
        "<div class=\"signature\"><img src=\"{}\" alt=\"Signature\" /></div>\n",
        escape(&record.signature)
    )
}

fn terms_block(company: &CompanySettings) -> String {
    if company.terms_and_conditions.is_empty() {
        return String::new();
    }
    format!(
        "<footer class=\"terms\">{}</footer>\n",
        escape(&company.terms_and_conditions)
    )
}

pub fn generate_html(
    record: &WashRecord,
    company: &CompanySettings,
    template: ReceiptTemplate,
) -> String {
    match template {
        ReceiptTemplate::Classic => render_classic(record, company),
        ReceiptTemplate::Compact => render_compact(record, company),
    }
}

fn render_classic(record: &WashRecord, company: &CompanySettings) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>Receipt {invoice}</title>\n<style>\nbody {{ font-family: Georgia, serif; margin: 2rem; color: #222; }}\nheader {{ border-bottom: 2px solid #222; padding-bottom: 1rem; margin-bottom: 1.5rem; }}\nh1 {{ margin: 0; font-size: 1.6rem; }}\n.address {{ white-space: pre-line; color: #555; }}\n.meta {{ margin: 1rem 0; }}\ntable {{ width: 100%; border-collapse: collapse; }}\nth {{ text-align: left; width: 35%; padding: 0.4rem 0; vertical-align: top; }}\ntd {{ padding: 0.4rem 0; }}\n.signature img {{ max-width: 280px; margin-top: 1.5rem; }}\n.terms {{ margin-top: 2rem; font-size: 0.85rem; color: #666; border-top: 1px solid #ccc; padding-top: 0.5rem; }}\n</style>\n</head>\n<body>\n<header>\n<h1>{company}</h1>\n<div class=\"address\">{address}</div>\n</header>\n<div class=\"meta\">\n<div><strong>Invoice:</strong> {invoice}</div>\n<div><strong>Date:</strong> {date}</div>\n</div>\n<table>\n{rows}</table>\n{signature}{terms}</body>\n</html>\n",
        invoice = escape(&record.invoice_no),
        company = escape(&company.company_name),
        address = escape(&company.address),
        date = escape(&record.timestamp),
        rows = detail_rows(record),
        signature = signature_block(record),
        terms = terms_block(company),
    )
}

fn render_compact(record: &WashRecord, company: &CompanySettings) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{invoice}</title>\n<style>\nbody {{ font-family: Arial, sans-serif; margin: 1rem; font-size: 0.9rem; color: #111; }}\n.head {{ display: flex; justify-content: space-between; margin-bottom: 0.75rem; }}\ntable {{ width: 100%; border-collapse: collapse; }}\nth, td {{ text-align: left; padding: 0.2rem 0.4rem; border-bottom: 1px solid #eee; }}\n.signature img {{ max-width: 200px; margin-top: 0.75rem; }}\n.terms {{ margin-top: 1rem; font-size: 0.75rem; color: #777; }}\n</style>\n</head>\n<body>\n<div class=\"head\">\n<div><strong>{company}</strong></div>\n<div>{invoice} · {date}</div>\n</div>\n<table>\n{rows}</table>\n{signature}{terms}</body>\n</html>\n",
        invoice = escape(&record.invoice_no),
        company = escape(&company.company_name),
        date = escape(&record.timestamp),
        rows = detail_rows(record),
        signature = signature_block(record),
        terms = terms_block(company),
    )
}
