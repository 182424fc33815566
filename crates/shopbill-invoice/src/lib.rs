//! # shopbill-invoice: Invoice Rendering for ShopBill
//!
//! Turns persisted bill rows into a printable view model and a PDF.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     shopbill-invoice (THIS CRATE)                       │
//! │                                                                         │
//! │  StoredBill + StoredItems ──► normalize() ──► InvoiceDocument           │
//! │       (raw scalars from          (ONE place)       │                    │
//! │        shopbill-db)                                ├──► print view JSON │
//! │                                                    └──► render_pdf()    │
//! │                                                                         │
//! │  Legacy rows with REAL rupees, numeric TEXT amounts, or odd timestamp   │
//! │  shapes are coerced here. Malformed optional fields become zero,        │
//! │  blank, or now. A bill that exists always renders.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`document`] - The normalized [`InvoiceDocument`] view model
//! - [`normalize`] - Raw scalar coercion, the single normalization entry
//! - [`pdf`] - Single-page A4 rendering with printpdf

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod normalize;
pub mod pdf;

// =============================================================================
// Re-exports
// =============================================================================

pub use document::{format_inr, BilledTo, InvoiceDocument, InvoiceLine, WALK_IN_CUSTOMER};
pub use normalize::normalize;
pub use pdf::{render_pdf, PdfError};
