//! # Validation Module
//!
//! Input validation utilities for ShopBill.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                        │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Non-numeric quantity/price fails HERE, never coerces to zero       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / UNIQUE constraints                                      │
//! │  └── stock >= 0 CHECK                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username for registration.
///
/// ## Rules
/// - Must be between 4 and 20 characters (after trimming)
///
/// ## Example
/// ```rust
/// use shopbill_core::validation::validate_username;
///
/// assert!(validate_username("cashier1").is_ok());
/// assert!(validate_username("abc").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 4 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 4,
        });
    }

    if username.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a password for registration.
///
/// ## Rules
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

/// Validates that the password confirmation matches.
pub fn validate_passwords_match(password: &str, confirm: &str) -> ValidationResult<()> {
    if password != confirm {
        return Err(ValidationError::Mismatch {
            field: "passwords".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
///
/// ## Example
/// ```rust
/// use shopbill_core::money::Money;
/// use shopbill_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_paise(1099)).is_ok());
/// assert!(validate_price(Money::from_paise(0)).is_ok());
/// assert!(validate_price(Money::from_paise(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level as entered on the product form.
///
/// ## Rules
/// - Must be non-negative
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
