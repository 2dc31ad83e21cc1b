//! Axum router wiring.
//!
//! Two route tables:
//! - `full`   : view, views, export, import, health (wrong method => 404)
//! - `single` : view only (wrong method => 405)
//!
//! Middleware order, outermost first: tracing, CORS/preflight, deadline.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::{migrate, views};
use crate::app_state::AppState;
use crate::config::RouteMode;
use crate::ops;
use crate::transport::{cors::cors, deadline::deadline, trace::trace_requests};

pub fn build_router(state: AppState) -> Router {
    let routes = match state.route_mode() {
        RouteMode::Full => full_routes(),
        RouteMode::Single => single_routes(),
    };

    routes
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), deadline))
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

fn full_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/view/",
            get(views::slug_required)
                .post(views::slug_required)
                .fallback(ops::not_found),
        )
        .route(
            "/view/*slug",
            get(views::get_view)
                .post(views::increment_view)
                .fallback(ops::not_found),
        )
        .route("/views", get(views::list_views).fallback(ops::not_found))
        .route("/export", get(migrate::export).fallback(ops::not_found))
        .route("/import", post(migrate::import).fallback(ops::not_found))
        .route("/health", get(ops::health).fallback(ops::not_found))
}

fn single_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/view/",
            get(views::slug_required)
                .post(views::slug_required)
                .fallback(ops::method_not_allowed),
        )
        .route(
            "/view/*slug",
            get(views::get_view)
                .post(views::increment_view)
                .fallback(ops::method_not_allowed),
        )
}
