//! Company settings handlers

use axum::{Json, extract::State, http::HeaderMap};

use crate::core::ServerState;
use crate::db::repository::profile;
use crate::utils::{AppError, AppResult};
use shared::models::CompanySettings;

fn user_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

/// GET /api/company - empty defaults until first saved
pub async fn get(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<CompanySettings>> {
    let user = user_id(&headers)?;
    let settings = profile::get_company_settings(&state.pool, &user).await?;
    Ok(Json(settings))
}

/// PUT /api/company
pub async fn put(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<CompanySettings>,
) -> AppResult<Json<CompanySettings>> {
    let user = user_id(&headers)?;
    profile::upsert_company_settings(&state.pool, &user, &payload).await?;
    Ok(Json(payload))
}
