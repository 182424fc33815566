//! # Domain Types
//!
//! Entity and enum definitions shared across the workspace.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ShopBill Domain Model                              │
//! │                                                                         │
//! │  Product ────┐                                                          │
//! │              ├──► BillItem ──► Bill ──► InvoiceDocument (render)        │
//! │  Customer ───┘                  │                                       │
//! │                                 ├── BillStatus (Draft → Pending → Done) │
//! │  User (login) ─── sessions      └── PaymentMethod (Cash/Card/UPI)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary columns are integer paise (see [`crate::money::Money`]);
//! the `*_paise` naming makes the unit explicit at the persistence boundary.
//!
//! The sqlx derives are feature-gated so this crate stays I/O-free for
//! consumers that only need the math.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Bill Status
// =============================================================================

/// Lifecycle status of a bill.
///
/// ## Transitions
/// ```text
/// (create) ──► Draft
/// (create) ──► PaymentPending ── complete_payment ──► Completed
/// (create) ──► Completed
/// ```
/// A bill may be created directly in any of the three states; the only
/// transition after creation is `PaymentPending → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum BillStatus {
    #[serde(rename = "Draft")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Draft"))]
    Draft,

    /// Stored as "Payment Pending" to match historical rows.
    #[serde(rename = "Payment Pending")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Payment Pending"))]
    PaymentPending,

    #[serde(rename = "Completed")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Completed"))]
    Completed,
}

impl BillStatus {
    /// The display/storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "Draft",
            BillStatus::PaymentPending => "Payment Pending",
            BillStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a bill was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Cash"))]
    Cash,

    #[serde(rename = "Card")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Card"))]
    Card,

    #[serde(rename = "UPI")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UPI"))]
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_paise: i64,
    pub stock: i64,
    pub barcode: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Unit price as `Money`.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Whether at least one unit is on the shelf.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A directory customer. Everything but the name is optional; walk-in
/// sales carry no customer at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A login account.
///
/// `password_hash` is an argon2 PHC string; the plaintext never leaves
/// the registration/login handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted bill header.
///
/// The discount/GST columns mirror the itemized checkout form: the
/// flat-rate path leaves `cgst/sgst/igst` at zero and fills `gst_paise`
/// directly, the itemized path records all three components and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bill {
    pub id: i64,
    pub bill_number: String,
    pub customer_id: Option<i64>,
    pub status: BillStatus,
    pub subtotal_paise: i64,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    pub discount_paise: i64,
    pub gst_type: Option<String>,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub igst_paise: i64,
    pub gst_paise: i64,
    pub total_paise: i64,
    pub payment_method: PaymentMethod,
    pub upi_id: Option<String>,
    pub card_number: Option<String>,
    pub card_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

/// A persisted bill line item.
///
/// `product_name` is a snapshot taken at sale time; products can be
/// deleted out from under historical bills, so the item must carry
/// everything the invoice needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub line_total_paise: i64,
}

impl BillItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
