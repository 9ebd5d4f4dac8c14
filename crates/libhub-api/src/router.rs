//! Route definitions for the LibHub HTTP API.
//!
//! Routes are grouped by domain. The router receives `AppState` and passes
//! it to every handler via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.storage.max_upload_bytes + FORM_OVERHEAD_BYTES;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(activity_routes())
        .merge(analytics_routes())
        .merge(student_routes())
        .merge(borrow_routes())
        .merge(resource_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Seat ledger endpoints
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(handlers::activity::check_in))
        .route("/check-out", post(handlers::activity::check_out))
        .route("/transfer", post(handlers::activity::transfer))
        .route("/today", get(handlers::activity::today_logs))
        .route("/seats", get(handlers::activity::seat_availability))
}

fn analytics_routes() -> Router<AppState> {
    Router::new().route(
        "/analytics/{roll_number}",
        get(handlers::analytics::usage_summary),
    )
}

fn student_routes() -> Router<AppState> {
    Router::new().route(
        "/students/{roll_number}",
        get(handlers::student::get_student),
    )
}

/// Borrow ledger endpoints
fn borrow_routes() -> Router<AppState> {
    Router::new()
        .route("/borrow-records", get(handlers::borrow::list_records))
        .route("/borrow-records/borrow", post(handlers::borrow::borrow_book))
        .route("/borrow-records/student", get(handlers::borrow::own_history))
        .route(
            "/borrow-records/student/{student_id}",
            get(handlers::borrow::student_history),
        )
        .route(
            "/borrow-records/{id}",
            patch(handlers::borrow::update_record),
        )
        .route(
            "/borrow-records/{id}/return",
            patch(handlers::borrow::return_book),
        )
        .route(
            "/borrow-records/{id}/reminder",
            post(handlers::borrow::send_reminder),
        )
        .route(
            "/borrow-records/{id}/fine/paid",
            patch(handlers::borrow::mark_fine_paid),
        )
        .route(
            "/borrow-records/{id}/fine/waived",
            patch(handlers::borrow::waive_fine),
        )
}

/// Digital resource catalog endpoints
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/digital-resources",
            get(handlers::resource::list_resources).post(handlers::resource::upload_resource),
        )
        .route(
            "/digital-resources/{id}",
            get(handlers::resource::get_resource).delete(handlers::resource::deactivate_resource),
        )
        .route(
            "/digital-resources/{id}/download",
            get(handlers::resource::download_resource),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
