//! # Tax & Total Calculator
//!
//! Computes bill totals in one of two modes, kept as distinct named
//! operations because they disagree about who owns the arithmetic:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Two Checkout Modes                               │
//! │                                                                         │
//! │  flat_rate(items)                itemized(items, charges)               │
//! │  ────────────────                ────────────────────────               │
//! │  subtotal = Σ qty × price        subtotal = what the caller sent        │
//! │  gst      = subtotal × 18%       gst      = cgst + sgst + igst          │
//! │  total    = subtotal + gst       total    = what the caller sent        │
//! │                                                                         │
//! │  server owns the math            POS form owns the math; the server     │
//! │                                  records the components it was given    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both modes validate line items the same way (quantity > 0, price >= 0);
//! a request that fails validation changes nothing.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_price, validate_quantity};

/// GST rate applied by the flat-rate checkout: 18% in basis points.
pub const GST_RATE_BPS: u32 = 1800;

// =============================================================================
// Inputs
// =============================================================================

/// One line of a checkout request, already converted to integer money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInput {
    pub quantity: i64,
    pub unit_price: Money,
}

impl LineInput {
    /// Exact line total: quantity × unit price, in paise.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Caller-supplied charges for the itemized mode.
///
/// Absent GST components are zero. The calculator records these values;
/// it does not re-derive them from the items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemizedCharges {
    pub subtotal: Money,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    pub discount_amount: Money,
    pub gst_type: Option<String>,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub final_total: Money,
}

// =============================================================================
// Output
// =============================================================================

/// The computed (or recorded) totals for a bill, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Money,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    pub discount: Money,
    pub gst_type: Option<String>,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub gst: Money,
    pub total: Money,
}

// =============================================================================
// Operations
// =============================================================================

/// Flat-rate mode: the server derives everything from the items.
///
/// subtotal is the exact paise sum of qty × unit price; GST is 18% of the
/// subtotal; total is their sum. No discounts, no GST split. An empty
/// item list is rejected, like any malformed line.
///
/// ## Example
/// ```rust
/// use shopbill_core::money::Money;
/// use shopbill_core::tax::{flat_rate, LineInput};
///
/// let items = [
///     LineInput { quantity: 2, unit_price: Money::from_rupees(100.0) },
///     LineInput { quantity: 1, unit_price: Money::from_rupees(50.0) },
/// ];
/// let breakdown = flat_rate(&items).unwrap();
/// assert_eq!(breakdown.subtotal.paise(), 25000); // ₹250.00
/// assert_eq!(breakdown.gst.paise(), 4500);       // ₹45.00
/// assert_eq!(breakdown.total.paise(), 29500);    // ₹295.00
/// ```
pub fn flat_rate(items: &[LineInput]) -> Result<TaxBreakdown, ValidationError> {
    validate_items(items)?;

    let subtotal = sum_lines(items);
    let gst = subtotal.percentage(GST_RATE_BPS);
    let total = subtotal + gst;

    Ok(TaxBreakdown {
        subtotal,
        discount_type: None,
        discount_value: None,
        discount: Money::zero(),
        gst_type: None,
        cgst: Money::zero(),
        sgst: Money::zero(),
        igst: Money::zero(),
        gst,
        total,
    })
}

/// Itemized mode: the POS form owns the math, the server records it.
///
/// The caller's subtotal and final_total are trusted as sent; GST is the
/// sum of the supplied CGST/SGST/IGST components. Items are still
/// validated so a malformed or empty line set never reaches the database.
pub fn itemized(
    items: &[LineInput],
    charges: ItemizedCharges,
) -> Result<TaxBreakdown, ValidationError> {
    validate_items(items)?;

    let gst = charges.cgst + charges.sgst + charges.igst;

    Ok(TaxBreakdown {
        subtotal: charges.subtotal,
        discount_type: charges.discount_type,
        discount_value: charges.discount_value,
        discount: charges.discount_amount,
        gst_type: charges.gst_type,
        cgst: charges.cgst,
        sgst: charges.sgst,
        igst: charges.igst,
        gst,
        total: charges.final_total,
    })
}

/// Exact subtotal of a set of lines.
pub fn sum_lines(items: &[LineInput]) -> Money {
    items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.line_total())
}

fn validate_items(items: &[LineInput]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
