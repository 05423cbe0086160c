//! Template API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/templates | GET | available receipt templates |
//! | /api/templates/default | GET / PUT | tenant-wide default binding |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/templates", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route(
            "/default",
            get(handler::get_default).put(handler::set_default),
        )
}
