//! # Domain Error Types
//!
//! Typed errors for the core business logic. Every failure mode is an
//! explicit variant; no stringly-typed errors, no panics.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in ShopBill                              │
//! │                                                                         │
//! │  ValidationError ──► CoreError::Validation ──► DbError / ApiError       │
//! │       (field-level)        (domain-level)        (layer-specific)       │
//! │                                                                         │
//! │  Each layer wraps the one below it via #[from] conversions.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Field-level validation failures.
///
/// These carry the offending field name so the HTTP layer can build a
/// user-facing message without string parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty or missing.
    #[error("{field} is required")]
    Required { field: String },

    /// A string field was shorter than the allowed minimum.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// A string field exceeded the allowed maximum.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A numeric field must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A numeric field was outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A field had the wrong shape.
    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree did not (e.g. password confirmation).
    #[error("{field} does not match")]
    Mismatch { field: String },

    /// A unique field collided with an existing record.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

/// Domain-level errors for business operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product does not exist.
    #[error("product not found: {id}")]
    ProductNotFound { id: i64 },

    /// Bill does not exist.
    #[error("bill not found: {id}")]
    BillNotFound { id: i64 },

    /// Customer does not exist.
    #[error("customer not found: {id}")]
    CustomerNotFound { id: i64 },

    /// A checkout asked for more units than the shelf holds.
    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// A lifecycle operation was applied to a bill in the wrong status.
    #[error("bill {bill_id} is in {status} status")]
    InvalidBillStatus { bill_id: i64, status: String },

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
