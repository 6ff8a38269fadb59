//! Order CRUD and text summary endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use store::OrderRepository;

use crate::controller::{CreateOrderRequest, OrderController, OrderResponse, UpdateOrderRequest};
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R: OrderRepository> {
    pub controller: OrderController<R>,
    /// Storage backend name reported by `/health`.
    pub storage: &'static str,
}

/// POST /orders — create an order with its items.
#[tracing::instrument(skip(state, req))]
pub async fn create<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.controller.create(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — all orders, ascending by id.
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(Json(state.controller.list().await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    Ok(Json(state.controller.get(id).await?))
}

/// PUT or PATCH /orders/{id} — change the supplied fields only.
#[tracing::instrument(skip(state, req))]
pub async fn update<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    Ok(Json(state.controller.update(id, req).await?))
}

/// DELETE /orders/{id} — remove the order and its items.
#[tracing::instrument(skip(state))]
pub async fn delete<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /orders/{id}/summary — `text/plain` rendering of one order.
#[tracing::instrument(skip(state))]
pub async fn summary<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Response {
    match state.controller.summary(id).await {
        Ok(text) => text.into_response(),
        Err(err) => err.into_text_response(),
    }
}

/// GET /summary — `text/plain` rendering of every order.
#[tracing::instrument(skip(state))]
pub async fn summary_all<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Response {
    match state.controller.summary_all().await {
        Ok(text) => text.into_response(),
        Err(err) => err.into_text_response(),
    }
}
