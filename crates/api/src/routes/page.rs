//! Route definitions for the interactive form.

use axum::routing::get;
use axum::Router;

use crate::handlers::page;
use crate::state::AppState;

/// ```text
/// GET  /    -> show_form
/// POST /    -> submit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(page::show_form).post(page::submit_form))
}
