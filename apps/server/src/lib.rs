//! # ShopBill Server
//!
//! The HTTP application: routing, session auth, and the JSON view models
//! the browser pages consume.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Flow                                     │
//! │                                                                         │
//! │  Browser ───► axum Router ───► AuthUser extractor ───► handler          │
//! │                                  (session cookie)        │              │
//! │                                                          ▼              │
//! │                              shopbill-db repositories / shopbill-core   │
//! │                              tax math / shopbill-invoice rendering      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built by [`app`]; integration tests drive it directly
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use shopbill_db::Database;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/", get(routes::auth::index))
        .route("/login", get(routes::auth::login_page).post(routes::auth::login))
        .route(
            "/register",
            get(routes::auth::register_page).post(routes::auth::register),
        )
        .route("/logout", get(routes::auth::logout))
        // Dashboard
        .route("/dashboard", get(routes::dashboard::dashboard))
        // Products
        .route("/products", get(routes::products::list))
        .route("/products/add", post(routes::products::add))
        .route("/products/edit/{id}", post(routes::products::edit))
        .route("/products/delete/{id}", get(routes::products::delete))
        // Customers
        .route("/customers", get(routes::customers::list))
        .route("/customers/add", post(routes::customers::add))
        .route("/customers/edit/{id}", post(routes::customers::edit))
        .route("/customers/delete/{id}", get(routes::customers::delete))
        // Billing
        .route("/billing", get(routes::billing::billing_page))
        .route("/billing/create", post(routes::billing::create))
        .route("/createbill", post(routes::billing::create_itemized))
        .route("/savedraft", post(routes::billing::save_draft))
        // Invoices
        .route("/invoices", get(routes::invoices::list))
        .route("/invoices/{id}", get(routes::invoices::view))
        .route("/invoices/{id}/print", get(routes::invoices::print_view))
        .route("/invoices/{id}/pdf", get(routes::invoices::pdf))
        // Payments
        .route("/confirm-payment/{id}", get(routes::payments::confirm_page))
        .route("/complete-payment/{id}", post(routes::payments::complete))
        // JSON API
        .route("/api/products", get(routes::api::products))
        .route("/api/products/search", get(routes::api::products_search))
        .route("/api/product/lookup", get(routes::api::product_lookup))
        .route("/api/products/barcode/{code}", get(routes::api::product_by_barcode))
        .route("/api/customers", get(routes::api::customers))
        .route("/api/customers/quick-add", post(routes::api::customer_quick_add))
        .route("/api/bill/{id}/items/count", get(routes::api::bill_items_count))
        .route("/api/customer/{id}/stats", get(routes::api::customer_stats))
        .route("/api/billing/stats", get(routes::api::billing_stats))
        .with_state(state)
}
