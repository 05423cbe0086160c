//! Template API handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::render::ReceiptTemplate;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// GET /api/templates - every selectable layout
pub async fn list(State(_state): State<ServerState>) -> Json<Vec<TemplateInfo>> {
    let templates = ReceiptTemplate::ALL
        .into_iter()
        .map(|t| TemplateInfo {
            id: t.id(),
            name: t.name(),
        })
        .collect();
    Json(templates)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultBinding {
    pub template_id: String,
}

/// GET /api/templates/default - falls back to the built-in default when
/// nothing has been bound yet
pub async fn get_default(State(state): State<ServerState>) -> AppResult<Json<DefaultBinding>> {
    let template = state
        .store
        .default_template()?
        .and_then(|id| ReceiptTemplate::from_id(&id))
        .unwrap_or_default();
    Ok(Json(DefaultBinding {
        template_id: template.id().to_string(),
    }))
}

/// PUT /api/templates/default
pub async fn set_default(
    State(state): State<ServerState>,
    Json(payload): Json<DefaultBinding>,
) -> AppResult<Json<DefaultBinding>> {
    let template = ReceiptTemplate::from_id(&payload.template_id)
        .ok_or_else(|| AppError::invalid(format!("Unknown template '{}'", payload.template_id)))?;
    state.store.set_default_template(template.id())?;
    Ok(Json(DefaultBinding {
        template_id: template.id().to_string(),
    }))
}
