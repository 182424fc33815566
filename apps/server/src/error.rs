//! API error types and their HTTP mapping.
//!
//! ## Error Mapping
//! ```text
//! ApiError::Validation     → 400, JSON {success: false, error: <message>}
//! ApiError::NotFound       → 404, JSON {success: false, error: <message>}
//! ApiError::StockConflict  → 409, transaction already rolled back below
//! ApiError::Unauthorized   → 303 redirect to /login
//! ApiError::Database       → 500, generic message (details stay in logs)
//! ApiError::Pdf            → 500, generic message
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use shopbill_core::{CoreError, ValidationError};
use shopbill_db::DbError;
use shopbill_invoice::PdfError;

/// Errors surfaced by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input; the request was not applied.
    #[error("{0}")]
    Validation(String),

    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A checkout lost the race for the last units of a product.
    #[error("insufficient stock for product {product_id}")]
    StockConflict { product_id: i64, requested: i64 },

    /// No valid session cookie on a protected route.
    #[error("authentication required")]
    Unauthorized,

    /// Database failure; surfaced generically, logged in full.
    #[error("database error")]
    Database(#[source] DbError),

    /// PDF generation failure.
    #[error("pdf error")]
    Pdf(#[source] PdfError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::StockConflict { product_id, requested } => (
                StatusCode::CONFLICT,
                format!(
                    "Insufficient stock for product {} ({} requested)",
                    product_id, requested
                ),
            ),
            ApiError::Unauthorized => return Redirect::to("/login").into_response(),
            ApiError::Database(source) => {
                error!(error = %source, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Pdf(source) => {
                error!(error = %source, "PDF generation error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ApiError::Validation(v.to_string()),
            CoreError::ProductNotFound { .. }
            | CoreError::BillNotFound { .. }
            | CoreError::CustomerNotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::StockConflict {
                product_id,
                requested,
            } => ApiError::StockConflict {
                product_id,
                requested,
            },
            DbError::UniqueViolation { .. } => ApiError::Validation(err.to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        ApiError::Pdf(err)
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
