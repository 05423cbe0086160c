//! Company settings API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/company | GET / PUT | per-user letterhead and terms |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/company",
        Router::new().route("/", get(handler::get).put(handler::put)),
    )
}
