//! Record API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/records | GET | list with filters |
//! | /api/records | POST | create |
//! | /api/records/invoice-number | GET | fresh unique invoice code |
//! | /api/records/{id} | GET / PUT / DELETE | single record |
//! | /api/records/{id}/archive | POST | move to archive |
//! | /api/records/{id}/unarchive | POST | restore from archive |
//! | /api/records/{id}/html | GET | rendered receipt |
//! | /api/records/{id}/template | GET / PUT | per-record template binding |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/records", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/invoice-number", get(handler::next_invoice_number))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/archive", post(handler::archive))
        .route("/{id}/unarchive", post(handler::unarchive))
        .route("/{id}/html", get(handler::render_html))
        .route(
            "/{id}/template",
            get(handler::get_template).put(handler::set_template),
        )
}
