//! # Stored Scalars
//!
//! Loosely-typed values as they come back from storage.
//!
//! Historical bill rows are not trustworthy: amounts may be INTEGER paise
//! (what we write), REAL rupees or numeric TEXT (what older importers
//! wrote), and timestamps come in several string shapes. The invoice
//! renderer must cope with all of them without failing, so the database
//! layer hands it these raw scalars instead of typed columns and the
//! renderer normalizes them in exactly one place.

use serde::{Deserialize, Serialize};

/// A single column value read off a row without type assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredScalar {
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

impl StoredScalar {
    /// Whether the scalar holds no usable value.
    pub fn is_null(&self) -> bool {
        matches!(self, StoredScalar::Null)
    }
}

impl From<i64> for StoredScalar {
    fn from(v: i64) -> Self {
        StoredScalar::Int(v)
    }
}

impl From<f64> for StoredScalar {
    fn from(v: f64) -> Self {
        StoredScalar::Real(v)
    }
}

impl From<String> for StoredScalar {
    fn from(v: String) -> Self {
        StoredScalar::Text(v)
    }
}

impl From<&str> for StoredScalar {
    fn from(v: &str) -> Self {
        StoredScalar::Text(v.to_string())
    }
}

impl<T> From<Option<T>> for StoredScalar
where
    T: Into<StoredScalar>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => StoredScalar::Null,
        }
    }
}

/// A bill header as fetched for rendering: typed where the schema is
/// trustworthy (bill_number, joined customer fields), raw everywhere
/// a legacy row could hold surprises.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBill {
    pub id: i64,
    pub bill_number: String,
    pub subtotal: StoredScalar,
    pub gst: StoredScalar,
    pub total: StoredScalar,
    pub payment_method: String,
    pub created_at: StoredScalar,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
}

/// A bill line item as fetched for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub product_name: String,
    pub quantity: StoredScalar,
    pub unit_price: StoredScalar,
    pub line_total: StoredScalar,
}
