//! # Invoice View Model
//!
//! The fully normalized document that both the print view and the PDF
//! render from. By the time a value lands here it is typed: amounts are
//! `Money`, the timestamp is a `DateTime<Utc>`, and every optional
//! customer field has been resolved or defaulted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopbill_core::Money;

/// Name shown when a bill has no customer attached (or the customer
/// was deleted after the sale).
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// The "billed to" block of the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilledTo {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Default for BilledTo {
    fn default() -> Self {
        BilledTo {
            name: WALK_IN_CUSTOMER.to_string(),
            phone: None,
            email: None,
            address: None,
        }
    }
}

/// One row of the invoice items table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    /// 1-based row number.
    pub number: usize,
    pub product: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// A fully normalized invoice, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDocument {
    pub bill_number: String,
    pub issued_at: DateTime<Utc>,
    /// e.g. "March 01, 2024"
    pub date: String,
    /// e.g. "10:30 AM"
    pub time: String,
    pub payment_method: String,
    pub billed_to: BilledTo,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Money,
    pub gst: Money,
    pub total: Money,
}

/// Formats an amount for the invoice: two decimals, thousands grouping.
///
/// The builtin PDF fonts cannot encode the rupee sign, so rendered
/// output uses the `Rs.` prefix.
///
/// ## Example
/// ```rust
/// use shopbill_core::Money;
/// use shopbill_invoice::document::format_inr;
///
/// assert_eq!(format_inr(Money::from_paise(123456789)), "Rs. 1,234,567.89");
/// assert_eq!(format_inr(Money::from_paise(500)), "Rs. 5.00");
/// ```
pub fn format_inr(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let whole = amount.whole_rupees().abs().to_string();

    let mut grouped = String::new();
    let digits: Vec<char> = whole.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}Rs. {}.{:02}", sign, grouped, amount.paise_part())
}
