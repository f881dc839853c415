//! Router assembly: authoring API, static admin UI, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::contest::ContestService;
use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - authoring API under `/api/v1/...`
/// - static admin UI from `./static` with index fallback
/// - CORS (allow any origin/method/headers) for a UI served from elsewhere
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: ContestService + Send + Sync + 'static,
{
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/languages", get(http::http_languages))
        .route(
            "/api/v1/problems",
            get(http::http_get_problems::<S>).post(http::http_add_problem::<S>),
        )
        .route(
            "/api/v1/problems/:index",
            delete(http::http_remove_problem::<S>).patch(http::http_update_problem::<S>),
        )
        .route("/api/v1/problems/:index/test-cases", post(http::http_add_test_case::<S>))
        .route(
            "/api/v1/problems/:index/test-cases/:tc",
            delete(http::http_remove_test_case::<S>).patch(http::http_update_test_case::<S>),
        )
        .route("/api/v1/issues", get(http::http_get_issues::<S>))
        .route("/api/v1/contests/:contest_id/problems", post(http::http_commit::<S>))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}
