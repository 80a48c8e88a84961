//! Error types for the Figures API.
//!
//! Every failure leaves the server as
//! `{"error": <code>, "message": <text>, "retryable": <bool>, "line"?: <n>}`
//! with a status that tells the storefront what kind of problem it was.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use figures_orders::OrderError;
use figures_store::StoreError;
use serde::Serialize;
use tracing::{error, warn};

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub line: Option<usize>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
            retryable: false,
            line: None,
        }
    }

    fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// The inventory backend could not answer.
    pub fn storage_unavailable(err: &StoreError) -> Self {
        warn!(error = %err, "Storage unavailable");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            "storage is temporarily unavailable, please retry",
        )
        .retryable()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let line = err.line();

        match &err {
            OrderError::EmptyCart => {
                ApiError::new(StatusCode::BAD_REQUEST, "empty_cart", err.to_string())
            }
            OrderError::CartTooLarge { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "cart_too_large", err.to_string())
            }
            OrderError::InvalidQuantity { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
                    .at_line(line)
            }
            OrderError::UnknownFigureKind { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "unknown_figure_kind", err.to_string())
                    .at_line(line)
            }
            OrderError::InvalidGeometry { .. } => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_geometry",
                err.to_string(),
            )
            .at_line(line),
            OrderError::PricingRuleMissing { .. } => {
                error!(error = %err, "Order failed on missing pricing rule");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "pricing_unavailable",
                    "pricing is not available for this figure",
                )
                .at_line(line)
            }
            OrderError::InsufficientStock { .. } => {
                ApiError::new(StatusCode::CONFLICT, "insufficient_stock", err.to_string())
                    .retryable()
            }
            OrderError::StorageFailure(store_err) => ApiError::storage_unavailable(store_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
            retryable: self.retryable,
            line: self.line,
        };

        (self.status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figures_core::FigureKind;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (OrderError::EmptyCart, StatusCode::BAD_REQUEST, "empty_cart", false),
            (
                OrderError::InvalidGeometry {
                    line: 1,
                    kind: FigureKind::Square,
                    detail: "sides 1 and 2 differ".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_geometry",
                false,
            ),
            (
                OrderError::UnknownFigureKind { line: 0, raw: None },
                StatusCode::BAD_REQUEST,
                "unknown_figure_kind",
                false,
            ),
            (
                OrderError::InsufficientStock {
                    kind: FigureKind::Circle,
                    requested: 3,
                    available: 2,
                },
                StatusCode::CONFLICT,
                "insufficient_stock",
                true,
            ),
            (
                OrderError::PricingRuleMissing {
                    line: 0,
                    kind: FigureKind::Square,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "pricing_unavailable",
                false,
            ),
            (
                OrderError::StorageFailure(StoreError::Timeout { millis: 2000 }),
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_unavailable",
                true,
            ),
        ];

        for (err, status, code, retryable) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status, "{code}");
            assert_eq!(api.code, code);
            assert_eq!(api.retryable, retryable, "{code}");
        }
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let api = ApiError::from(OrderError::StorageFailure(StoreError::QueryFailed(
            "no such table: inventory".to_string(),
        )));
        assert!(!api.message.contains("inventory"));
        assert_eq!(api.line, None);
    }

    #[test]
    fn test_line_is_carried() {
        let api = ApiError::from(OrderError::InvalidGeometry {
            line: 4,
            kind: FigureKind::Triangle,
            detail: "sides 1, 1, 3 violate the triangle inequality".to_string(),
        });
        assert_eq!(api.line, Some(4));
    }
}
