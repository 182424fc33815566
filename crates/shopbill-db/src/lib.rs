//! # shopbill-db: Database Layer for ShopBill
//!
//! This crate provides database access for the ShopBill system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopBill Data Flow                               │
//! │                                                                         │
//! │  HTTP Handler (POST /billing/create)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   shopbill-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │  (bill.rs,    │    │  (embedded)  │    │    │
//! │  │   │               │    │   product.rs, │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│   customer.rs,│    │ 001_init.sql │    │    │
//! │  │   │ Management    │    │   user.rs)    │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (shopbill.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, customer, bill, user)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopbill_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/shopbill.db");
//! let db = Database::new(config).await?;
//!
//! let products = db.products().list(Some("pen")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bill::{BillListRow, BillRepository, CreatedBill, DailyTotal, NewBill, NewBillItem};
pub use repository::customer::{CustomerRepository, CustomerStats, NewCustomer};
pub use repository::product::{NewProduct, ProductRepository, StockLevel};
pub use repository::user::UserRepository;
