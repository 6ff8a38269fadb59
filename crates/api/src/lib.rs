//! HTTP API server for the order service.
//!
//! Wraps [`OrderController`] in axum routes, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod controller;
pub mod error;
pub mod routes;
pub mod view;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use service::OrderService;
use store::OrderRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use controller::OrderController;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<R>))
        .route(
            "/orders",
            get(routes::orders::list::<R>).post(routes::orders::create::<R>),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get::<R>)
                .put(routes::orders::update::<R>)
                .patch(routes::orders::update::<R>)
                .delete(routes::orders::delete::<R>),
        )
        .route("/orders/{id}/summary", get(routes::orders::summary::<R>))
        .route("/summary", get(routes::orders::summary_all::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires a repository through the service and controller into shared state.
pub fn create_state<R: OrderRepository + 'static>(
    repository: R,
    storage: &'static str,
) -> Arc<AppState<R>> {
    let controller = OrderController::new(OrderService::new(repository));
    Arc::new(AppState {
        controller,
        storage,
    })
}
