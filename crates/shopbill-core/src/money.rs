//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    ₹10.00 / 3 = ₹3.33 (×3 = ₹9.99)  → Lost ₹0.01!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    1000 paise / 3 = 333 paise (×3 = 999 paise)                          │
//! │    We KNOW we lost 1 paisa, and handle it explicitly                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rupee floats exist only at the HTTP boundary (request/response DTOs);
//! everything between the boundary and the database is integer paise.
//!
//! ## Usage
//! ```rust
//! use shopbill_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(10999); // ₹109.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                       // ₹219.98
//! let total = price + Money::from_paise(500);    // ₹114.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shopbill_core::money::Money;
    ///
    /// let price = Money::from_paise(10999); // Represents ₹109.99
    /// assert_eq!(price.paise(), 10999);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from a rupee amount expressed as a float.
    ///
    /// This is the ONLY place floats enter the money domain. Request DTOs
    /// carry rupee amounts like `10.99`; converting here rounds half away
    /// from zero so `10.99` becomes exactly 1099 paise.
    ///
    /// ## Example
    /// ```rust
    /// use shopbill_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(10.99).paise(), 1099);
    /// assert_eq!(Money::from_rupees(250.0).paise(), 25000);
    /// ```
    #[inline]
    pub fn from_rupees(rupees: f64) -> Self {
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the value as rupees for display/JSON boundary conversion.
    ///
    /// ## Example
    /// ```rust
    /// use shopbill_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1099).rupees(), 10.99);
    /// ```
    #[inline]
    pub fn rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit (whole rupees) portion.
    #[inline]
    pub const fn whole_rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates a tax/percentage amount from a rate in basis points.
    ///
    /// ## Implementation
    /// Integer math with rounding: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5). i128 intermediate
    /// prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use shopbill_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(25000); // ₹250.00
    /// let gst = subtotal.percentage(1800);     // 18% GST
    /// assert_eq!(gst.paise(), 4500);           // ₹45.00
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_paise(amount as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use shopbill_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(299); // ₹2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 897); // ₹8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// Used by the invoice renderer, which always prints two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.whole_rupees().abs(),
            self.paise_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.whole_rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(10.99).paise(), 1099);
        assert_eq!(Money::from_rupees(0.0).paise(), 0);
        assert_eq!(Money::from_rupees(250.0).paise(), 25000);
        // Binary float artifacts round away cleanly
        assert_eq!(Money::from_rupees(0.1 + 0.2).paise(), 30);
    }

    #[test]
    fn test_rupees_round_trip() {
        assert_eq!(Money::from_paise(1099).rupees(), 10.99);
        assert_eq!(Money::from_paise(25000).rupees(), 250.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_percentage_basic() {
        // ₹10.00 at 10% = ₹1.00
        let amount = Money::from_paise(1000);
        assert_eq!(amount.percentage(1000).paise(), 100);
    }

    #[test]
    fn test_percentage_with_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83
        let amount = Money::from_paise(1000);
        assert_eq!(amount.percentage(825).paise(), 83);
    }

    #[test]
    fn test_gst_example() {
        // ₹250.00 at 18% GST = ₹45.00, total ₹295.00
        let subtotal = Money::from_paise(25000);
        let gst = subtotal.percentage(1800);
        assert_eq!(gst.paise(), 4500);
        assert_eq!((subtotal + gst).paise(), 29500);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(299);
        assert_eq!(unit_price.multiply_quantity(3).paise(), 897);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().paise(), 100);
    }
}
