//! HTTP handlers.
//!
//! ```text
//! POST /figures          cart JSON       ──► 200 {orderId, total, totalCents}
//! GET  /inventory/:kind                  ──► 200 {kind, available}
//! GET  /health                           ──► 200 {status: "ok"} | 503
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use figures_core::{Cart, FigureKind};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

// =============================================================================
// Response Bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: Uuid,
    /// Decimal dollars, e.g. "8.48".
    pub total: String,
    pub total_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct StockLevel {
    pub kind: FigureKind,
    pub available: i64,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /figures`
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<Cart>, JsonRejection>,
) -> Result<Json<OrderPlaced>, ApiError> {
    let Json(cart) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected order body");
        ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
    })?;

    let placed = state.orders.place_order(&cart).await?;

    Ok(Json(OrderPlaced {
        order_id: placed.id(),
        total: placed.charged.to_decimal_string(),
        total_cents: placed.charged.cents(),
    }))
}

/// `GET /inventory/:kind`
pub async fn stock_level(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<StockLevel>, ApiError> {
    let kind = FigureKind::parse(Some(&kind)).map_err(|err| {
        ApiError::new(StatusCode::NOT_FOUND, "unknown_figure_kind", err.to_string())
    })?;

    let available = state
        .inventory
        .available_count(kind)
        .await
        .map_err(|err| ApiError::storage_unavailable(&err))?;

    Ok(Json(StockLevel { kind, available }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    if state.inventory.health_check().await {
        Json(Health { status: "ok" }).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "unavailable",
            }),
        )
            .into_response()
    }
}
