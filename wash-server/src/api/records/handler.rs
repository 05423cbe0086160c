//! Record API handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Html,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::profile;
use crate::render::{self, ReceiptTemplate};
use crate::store::{ArchiveOutcome, RecordScope};
use crate::utils::{AppError, AppResult};
use shared::{FilterSpec, filter, models::WashRecord};

/// Caller identity, forwarded by the auth proxy.
fn user_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

fn parse_date(label: &str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::invalid(format!("{label} must be YYYY-MM-DD, got '{raw}'")))
}

/// Reserved query keys are lifted into the structured filter; everything
/// left over is treated as a field-label filter.
fn parse_filters(mut params: BTreeMap<String, String>) -> AppResult<(RecordScope, FilterSpec)> {
    let scope = match params.remove("scope").as_deref() {
        None | Some("active") => RecordScope::Active,
        Some("archived") => RecordScope::Archived,
        Some(other) => {
            return Err(AppError::invalid(format!(
                "scope must be 'active' or 'archived', got '{other}'"
            )));
        }
    };

    let mut spec = FilterSpec::default();
    spec.invoice_no = params.remove("invoice_no").filter(|v| !v.is_empty());
    if let Some(raw) = params.remove("date_from").filter(|v| !v.is_empty()) {
        spec.date_from = Some(parse_date("date_from", &raw)?);
    }
    if let Some(raw) = params.remove("date_to").filter(|v| !v.is_empty()) {
        spec.date_to = Some(parse_date("date_to", &raw)?);
    }
    spec.fields = params.into_iter().filter(|(_, v)| !v.is_empty()).collect();
    Ok((scope, spec))
}

/// GET /api/records - list one record set, optionally filtered
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> AppResult<Json<Vec<WashRecord>>> {
    let (scope, spec) = parse_filters(params)?;
    let records = state.store.list(scope).await?;
    if spec.is_empty() {
        return Ok(Json(records));
    }
    Ok(Json(filter(&records, &spec)))
}

/// GET /api/records/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WashRecord>> {
    let record = state.store.get(&id).await?;
    Ok(Json(record))
}

/// GET /api/records/invoice-number - fresh code unused by any record
pub async fn next_invoice_number(
    State(state): State<ServerState>,
) -> AppResult<Json<InvoiceNumber>> {
    let invoice_no = state.store.generate_invoice_no().await?;
    Ok(Json(InvoiceNumber { invoice_no }))
}

#[derive(Debug, Serialize)]
pub struct InvoiceNumber {
    pub invoice_no: String,
}

/// POST /api/records - persist a finished record
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(mut payload): Json<WashRecord>,
) -> AppResult<Json<WashRecord>> {
    let user = user_id(&headers)?;
    if payload.id.is_empty() {
        payload.id = uuid::Uuid::new_v4().to_string();
    }
    if payload.invoice_no.is_empty() {
        payload.invoice_no = state.store.generate_invoice_no().await?;
    }
    if payload.timestamp.is_empty() {
        payload.timestamp = shared::util::now_rfc3339();
    }
    let saved = state.store.save(payload, &user).await?;
    Ok(Json(saved))
}

/// PUT /api/records/:id - replace a record; the path id wins
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<WashRecord>,
) -> AppResult<Json<WashRecord>> {
    payload.id = id;
    let updated = state.store.update(payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/records/:id - permanent removal, any scope
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted>> {
    state.store.delete(&id).await?;
    Ok(Json(Deleted { id }))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub id: String,
    pub already_archived: bool,
}

/// POST /api/records/:id/archive - idempotent
pub async fn archive(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ArchiveResponse>> {
    let outcome = state.store.archive(&id).await?;
    Ok(Json(ArchiveResponse {
        id,
        already_archived: outcome == ArchiveOutcome::AlreadyArchived,
    }))
}

/// POST /api/records/:id/unarchive
pub async fn unarchive(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WashRecord>> {
    let record = state.store.unarchive(&id).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct RenderParams {
    /// Overrides the stored binding for this render only
    pub template: Option<String>,
}

/// GET /api/records/:id/html - rendered receipt document
pub async fn render_html(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<RenderParams>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let user = user_id(&headers)?;
    let record = state.store.get(&id).await?;
    let company = profile::get_company_settings(&state.pool, &user).await?;

    let template = match params.template {
        Some(raw) => ReceiptTemplate::from_id(&raw)
            .ok_or_else(|| AppError::invalid(format!("Unknown template '{raw}'")))?,
        None => resolve_template(&state, &id)?,
    };
    Ok(Html(render::generate_html(&record, &company, template)))
}

/// Per-record binding, then the default binding, then Classic. A stale
/// binding naming a template that no longer exists falls through.
fn resolve_template(state: &ServerState, record_id: &str) -> AppResult<ReceiptTemplate> {
    Ok(state
        .store
        .template_for(record_id)?
        .and_then(|id| ReceiptTemplate::from_id(&id))
        .unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateBinding {
    pub template_id: String,
}

/// GET /api/records/:id/template - effective template for this record
pub async fn get_template(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TemplateBinding>> {
    state.store.get(&id).await?;
    let template = resolve_template(&state, &id)?;
    Ok(Json(TemplateBinding {
        template_id: template.id().to_string(),
    }))
}

/// PUT /api/records/:id/template - bind a template to this record
pub async fn set_template(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TemplateBinding>,
) -> AppResult<Json<TemplateBinding>> {
    state.store.get(&id).await?;
    let template = ReceiptTemplate::from_id(&payload.template_id)
        .ok_or_else(|| AppError::invalid(format!("Unknown template '{}'", payload.template_id)))?;
    state.store.bind_template(&id, template.id())?;
    Ok(Json(TemplateBinding {
        template_id: template.id().to_string(),
    }))
}
