//! # Bill Normalization
//!
//! The one place where raw stored scalars become a typed
//! [`InvoiceDocument`]. Every renderer (print view, PDF) goes through
//! [`normalize`]; nothing downstream ever sees a [`StoredScalar`].
//!
//! ## Rules
//!
//! - Amounts: INTEGER is paise as written by the app. REAL and numeric
//!   TEXT are rupees as written by older importers and are scaled to
//!   paise. NULL and garbage text become zero.
//! - Quantities: any numeric shape rounds to a whole count, NULL is zero.
//! - Timestamps: RFC 3339 first, then the naive shapes older rows used,
//!   then epoch seconds. A row with no recoverable timestamp renders
//!   with the current time rather than failing.
//! - A bill with no customer renders as "Walk-in Customer".
//!
//! Malformed data never produces an error here. A bill that exists must
//! always render.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shopbill_core::{Money, StoredBill, StoredItem, StoredScalar};

use crate::document::{BilledTo, InvoiceDocument, InvoiceLine};

/// Naive timestamp shapes seen in legacy rows, tried in order after
/// RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Builds a renderable invoice from a stored bill and its items.
///
/// Never fails: every malformed field degrades to a safe default
/// instead. Normalizing the same row twice yields the same document
/// (up to the current-time fallback for rows with no timestamp).
pub fn normalize(bill: &StoredBill, items: &[StoredItem]) -> InvoiceDocument {
    let issued_at = coerce_timestamp(&bill.created_at);

    let lines: Vec<InvoiceLine> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let quantity = coerce_quantity(&item.quantity);
            let unit_price = coerce_money(&item.unit_price);
            let mut line_total = coerce_money(&item.line_total);
            if line_total.is_zero() && quantity > 0 && !unit_price.is_zero() {
                line_total = unit_price.multiply_quantity(quantity);
            }
            InvoiceLine {
                number: i + 1,
                product: item.product_name.clone(),
                quantity,
                unit_price,
                line_total,
            }
        })
        .collect();

    let subtotal = coerce_money(&bill.subtotal);
    let gst = coerce_money(&bill.gst);
    let mut total = coerce_money(&bill.total);
    if total.is_zero() && !subtotal.is_zero() {
        total = subtotal + gst;
    }

    let billed_to = match &bill.customer_name {
        Some(name) if !name.trim().is_empty() => BilledTo {
            name: name.clone(),
            phone: text_field(&bill.customer_phone),
            email: text_field(&bill.customer_email),
            address: text_field(&bill.customer_address),
        },
        _ => BilledTo::default(),
    };

    InvoiceDocument {
        bill_number: bill.bill_number.clone(),
        issued_at,
        date: issued_at.format("%B %d, %Y").to_string(),
        time: issued_at.format("%I:%M %p").to_string(),
        payment_method: bill.payment_method.clone(),
        billed_to,
        lines,
        subtotal,
        gst,
        total,
    }
}

/// Coerces an amount scalar to `Money` (paise).
///
/// A whole-rupee legacy amount written as REAL gets converted to an
/// integer by SQLite's column affinity before it reaches us, so it
/// arrives as `Int` and is read as paise. Only fractional legacy REALs
/// and TEXT amounts can be recognized as rupees.
pub fn coerce_money(value: &StoredScalar) -> Money {
    match value {
        // INTEGER columns are already paise.
        StoredScalar::Int(v) => Money::from_paise(*v),
        // REAL columns hold rupees.
        StoredScalar::Real(v) if v.is_finite() => Money::from_rupees(*v),
        StoredScalar::Real(_) => Money::zero(),
        StoredScalar::Text(s) => parse_money_text(s),
        StoredScalar::Null => Money::zero(),
    }
}

/// Coerces a quantity scalar to a whole count.
pub fn coerce_quantity(value: &StoredScalar) -> i64 {
    match value {
        StoredScalar::Int(v) => *v,
        StoredScalar::Real(v) if v.is_finite() => v.round() as i64,
        StoredScalar::Real(_) => 0,
        StoredScalar::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.round() as i64))
                .unwrap_or(0)
        }
        StoredScalar::Null => 0,
    }
}

/// Recovers a timestamp from whatever shape the row holds, falling
/// back to now.
pub fn coerce_timestamp(value: &StoredScalar) -> DateTime<Utc> {
    match value {
        StoredScalar::Text(s) => parse_timestamp_text(s).unwrap_or_else(Utc::now),
        StoredScalar::Int(v) => epoch_seconds(*v).unwrap_or_else(Utc::now),
        StoredScalar::Real(v) if v.is_finite() => {
            epoch_seconds(v.round() as i64).unwrap_or_else(Utc::now)
        }
        _ => Utc::now(),
    }
}

fn parse_money_text(s: &str) -> Money {
    // Currency prefixes like "Rs." carry their own '.', so the scan
    // starts at the first digit; a '-' before it marks the sign.
    let start = match s.find(|c: char| c.is_ascii_digit()) {
        Some(i) => i,
        None => return Money::zero(),
    };
    let negative = s[..start].contains('-');
    let cleaned: String = s[start..]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        // Numeric TEXT holds rupees, like the REAL columns.
        Ok(rupees) if rupees.is_finite() => {
            Money::from_rupees(if negative { -rupees } else { rupees })
        }
        _ => Money::zero(),
    }
}

fn parse_timestamp_text(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    // Epoch seconds written as text.
    trimmed.parse::<i64>().ok().and_then(epoch_seconds)
}

fn epoch_seconds(v: i64) -> Option<DateTime<Utc>> {
    // Anything below ~2001 is more likely a stray count than a timestamp.
    if v > 1_000_000_000 {
        DateTime::from_timestamp(v, 0)
    } else {
        None
    }
}

fn text_field(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shopbill_core::StoredScalar;

    fn stored_bill() -> StoredBill {
        StoredBill {
            id: 1,
            bill_number: "BILL20240301103000-0042".to_string(),
            subtotal: StoredScalar::Int(25000),
            gst: StoredScalar::Int(4500),
            total: StoredScalar::Int(29500),
            payment_method: "Cash".to_string(),
            created_at: StoredScalar::Text("2024-03-01T10:30:00+00:00".to_string()),
            customer_name: Some("Asha Traders".to_string()),
            customer_phone: Some("9876543210".to_string()),
            customer_email: None,
            customer_address: Some("12 MG Road".to_string()),
        }
    }

    fn stored_items() -> Vec<StoredItem> {
        vec![
            StoredItem {
                product_name: "Blue Pen".to_string(),
                quantity: StoredScalar::Int(5),
                unit_price: StoredScalar::Int(1000),
                line_total: StoredScalar::Int(5000),
            },
            StoredItem {
                product_name: "Notebook".to_string(),
                quantity: StoredScalar::Int(4),
                unit_price: StoredScalar::Int(5000),
                line_total: StoredScalar::Int(20000),
            },
        ]
    }

    #[test]
    fn test_normalize_well_formed_bill() {
        let doc = normalize(&stored_bill(), &stored_items());

        assert_eq!(doc.bill_number, "BILL20240301103000-0042");
        assert_eq!(doc.date, "March 01, 2024");
        assert_eq!(doc.time, "10:30 AM");
        assert_eq!(doc.billed_to.name, "Asha Traders");
        assert_eq!(doc.billed_to.phone.as_deref(), Some("9876543210"));
        assert_eq!(doc.billed_to.email, None);
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[0].number, 1);
        assert_eq!(doc.lines[1].product, "Notebook");
        assert_eq!(doc.subtotal, Money::from_paise(25000));
        assert_eq!(doc.gst, Money::from_paise(4500));
        assert_eq!(doc.total, Money::from_paise(29500));
    }

    #[test]
    fn test_normalize_is_idempotent_on_same_row() {
        let bill = stored_bill();
        let items = stored_items();
        assert_eq!(normalize(&bill, &items), normalize(&bill, &items));
    }

    #[test]
    fn test_walk_in_customer_default() {
        let mut bill = stored_bill();
        bill.customer_name = None;
        bill.customer_phone = Some("9876543210".to_string());

        let doc = normalize(&bill, &[]);
        assert_eq!(doc.billed_to.name, "Walk-in Customer");
        // Contact details are meaningless without a customer.
        assert_eq!(doc.billed_to.phone, None);

        bill.customer_name = Some("   ".to_string());
        let doc = normalize(&bill, &[]);
        assert_eq!(doc.billed_to.name, "Walk-in Customer");
    }

    #[test]
    fn test_coerce_money_shapes() {
        assert_eq!(coerce_money(&StoredScalar::Int(29500)), Money::from_paise(29500));
        assert_eq!(coerce_money(&StoredScalar::Real(295.0)), Money::from_paise(29500));
        assert_eq!(coerce_money(&StoredScalar::Real(295.5)), Money::from_paise(29550));
        assert_eq!(
            coerce_money(&StoredScalar::Text("295.00".to_string())),
            Money::from_paise(29500)
        );
        assert_eq!(
            coerce_money(&StoredScalar::Text("1,234.50".to_string())),
            Money::from_paise(123450)
        );
        assert_eq!(
            coerce_money(&StoredScalar::Text("Rs. 295".to_string())),
            Money::from_paise(29500)
        );
        assert_eq!(
            coerce_money(&StoredScalar::Text("₹ 1,250.00".to_string())),
            Money::from_paise(125000)
        );
        assert_eq!(
            coerce_money(&StoredScalar::Text("-12.50".to_string())),
            Money::from_paise(-1250)
        );
        assert_eq!(coerce_money(&StoredScalar::Text("garbage".to_string())), Money::zero());
        assert_eq!(coerce_money(&StoredScalar::Null), Money::zero());
    }

    #[test]
    fn test_coerce_quantity_shapes() {
        assert_eq!(coerce_quantity(&StoredScalar::Int(3)), 3);
        assert_eq!(coerce_quantity(&StoredScalar::Real(3.0)), 3);
        assert_eq!(coerce_quantity(&StoredScalar::Text("7".to_string())), 7);
        assert_eq!(coerce_quantity(&StoredScalar::Text("2.0".to_string())), 2);
        assert_eq!(coerce_quantity(&StoredScalar::Text("x".to_string())), 0);
        assert_eq!(coerce_quantity(&StoredScalar::Null), 0);
    }

    #[test]
    fn test_coerce_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();

        assert_eq!(
            coerce_timestamp(&StoredScalar::Text("2024-03-01T10:30:00+00:00".to_string())),
            expected
        );
        assert_eq!(
            coerce_timestamp(&StoredScalar::Text("2024-03-01 10:30:00".to_string())),
            expected
        );
        assert_eq!(
            coerce_timestamp(&StoredScalar::Int(expected.timestamp())),
            expected
        );
        assert_eq!(
            coerce_timestamp(&StoredScalar::Text("2024-03-01".to_string())),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );

        // Unrecoverable shapes fall back to now instead of failing.
        let fallback = coerce_timestamp(&StoredScalar::Null);
        assert!((Utc::now() - fallback).num_seconds().abs() < 5);
    }

    #[test]
    fn test_missing_line_total_is_recomputed() {
        let items = vec![StoredItem {
            product_name: "Stapler".to_string(),
            quantity: StoredScalar::Int(3),
            unit_price: StoredScalar::Real(45.0),
            line_total: StoredScalar::Null,
        }];

        let doc = normalize(&stored_bill(), &items);
        assert_eq!(doc.lines[0].unit_price, Money::from_paise(4500));
        assert_eq!(doc.lines[0].line_total, Money::from_paise(13500));
    }

    #[test]
    fn test_missing_total_falls_back_to_components() {
        let mut bill = stored_bill();
        bill.total = StoredScalar::Null;

        let doc = normalize(&bill, &stored_items());
        assert_eq!(doc.total, Money::from_paise(29500));
    }
}
