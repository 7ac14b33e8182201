//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actions;

use axum::Router;
use axum::routing::{delete, get};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/actions",
            get(actions::list)
                .post(actions::create)
                .delete(actions::clear),
        )
        .route("/actions/{name}", delete(actions::remove))
        .route("/actions/{name}/history", get(actions::history))
        .route("/actions/{name}/status", get(actions::status))
}
