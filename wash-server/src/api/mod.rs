//! API route modules
//!
//! - [`health`] - liveness check
//! - [`records`] - record CRUD, archive lifecycle, receipt rendering
//! - [`templates`] - receipt template catalogue and default binding
//! - [`company`] - per-user company settings

pub mod company;
pub mod health;
pub mod records;
pub mod templates;

use axum::Router;

use crate::core::ServerState;

/// Every route in one router, ready for state and middleware.
pub fn router() -> Router<ServerState> {
    health::router()
        .merge(records::router())
        .merge(templates::router())
        .merge(company::router())
}
