// HTTP adapter over the summary engine

use crate::engine::SummaryEngine;
use crate::error::SummaryError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<SummaryEngine>,
}

pub fn create_router(engine: Arc<SummaryEngine>) -> Router {
    Router::new()
        .route(
            "/assignment/transaction/{transaction_id}",
            get(handle_transaction),
        )
        .route(
            "/assignment/transactionSummaryByProducts/{last_n_days}",
            get(handle_product_summary),
        )
        .route(
            "/assignment/transactionSummaryByManufacturingCity/{last_n_days}",
            get(handle_city_summary),
        )
        .with_state(ServerState { engine })
}

async fn handle_transaction(
    State(state): State<ServerState>,
    Path(transaction_id): Path<u64>,
) -> Response {
    match state.engine.find_transaction(transaction_id).await {
        Ok(Some(detail)) => (StatusCode::OK, Json(detail)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Transaction not found"})),
        )
            .into_response(),
        Err(e) => internal_error(&e).into_response(),
    }
}

async fn handle_product_summary(
    State(state): State<ServerState>,
    Path(last_n_days): Path<u32>,
) -> Response {
    match state.engine.product_summary(last_n_days).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => internal_error(&e).into_response(),
    }
}

async fn handle_city_summary(
    State(state): State<ServerState>,
    Path(last_n_days): Path<u32>,
) -> Response {
    match state.engine.city_summary(last_n_days).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => internal_error(&e).into_response(),
    }
}

/// Fatal request failures answer with an empty object
fn internal_error(e: &SummaryError) -> impl IntoResponse {
    error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
}
