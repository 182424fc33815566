//! # Repository Modules
//!
//! One repository per aggregate. Each repository is a thin, cloneable
//! wrapper around the shared `SqlitePool`.
//!
//! - [`product`] - Catalog CRUD, search, barcode and id-or-name lookup
//! - [`customer`] - Directory CRUD and per-customer stats
//! - [`bill`] - Transactional bill creation, lifecycle, dashboard sums
//! - [`user`] - Login accounts

pub mod bill;
pub mod customer;
pub mod product;
pub mod user;

pub use bill::BillRepository;
pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
