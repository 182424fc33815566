//! JSON API endpoints consumed by the billing page's scripts.
//!
//! Unknown-entity lookups here answer `{success: false, ...}` with a
//! 200 rather than a 404: the POS form treats them as empty results,
//! not failures.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use shopbill_core::validation::validate_customer_name;
use shopbill_core::{Money, Product};
use shopbill_db::NewCustomer;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Products with fewer units than this count as "low stock".
const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct QuickAddBody {
    pub name: String,
    pub phone: Option<String>,
}

fn product_json(p: &Product) -> serde_json::Value {
    json!({
        "id": p.id,
        "name": p.name,
        "price": p.price().rupees(),
        "stock": p.stock,
        "barcode": p.barcode,
    })
}

/// `GET /api/products` - the whole catalog.
pub async fn products(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().list(None).await?;
    Ok(Json(json!({
        "products": products.iter().map(product_json).collect::<Vec<_>>(),
    })))
}

/// `GET /api/products/search?q=` - substring search on the name.
pub async fn products_search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().list(Some(&query.q)).await?;
    Ok(Json(json!({
        "products": products.iter().map(product_json).collect::<Vec<_>>(),
    })))
}

/// `GET /api/product/lookup?q=` - id-or-name lookup for the POS form.
pub async fn product_lookup(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().lookup(&query.q, 10).await?;
    Ok(Json(json!({
        "products": products.iter().map(product_json).collect::<Vec<_>>(),
    })))
}

/// `GET /api/products/barcode/{code}` - in-stock barcode lookup.
///
/// An unknown barcode is a result, not an error: 200 with
/// `success: false` so the scanner UI can show its own message.
pub async fn product_by_barcode(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    match state.db.products().get_by_barcode(&code).await? {
        Some(product) => Ok(Json(json!({
            "success": true,
            "product": product_json(&product),
        }))),
        None => Ok(Json(json!({
            "success": false,
            "error": "Product not found",
        }))),
    }
}

/// `GET /api/customers` - the whole directory.
pub async fn customers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let customers = state.db.customers().list(None).await?;
    Ok(Json(json!({ "customers": customers })))
}

/// `POST /api/customers/quick-add` - minimal customer creation from the
/// billing page, without leaving checkout.
pub async fn customer_quick_add(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<QuickAddBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let name = body.name.trim().to_string();
    validate_customer_name(&name).map_err(ApiError::from)?;

    let customer = state
        .db
        .customers()
        .insert(NewCustomer {
            name,
            phone: body
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            email: None,
            address: None,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "customer": {
            "id": customer.id,
            "name": customer.name,
            "phone": customer.phone,
        },
    })))
}

/// `GET /api/bill/{id}/items/count`
pub async fn bill_items_count(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let count = state.db.bills().items_count(id).await?;
    Ok(Json(json!({ "count": count })))
}

/// `GET /api/customer/{id}/stats` - purchase history aggregates.
pub async fn customer_stats(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    // Verify the customer exists; stats alone cannot tell an unknown
    // customer from one with no bills.
    if state.db.customers().get(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Customer not found: {}", id)));
    }

    let stats = state.db.customers().stats(id).await?;
    Ok(Json(json!({
        "total_bills": stats.total_bills,
        "total_spent": Money::from_paise(stats.total_spent_paise).rupees(),
    })))
}

/// `GET /api/billing/stats` - today's bill count and low-stock alert.
pub async fn billing_stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let today_bills = state.db.bills().today_count().await?;
    let low_stock = state
        .db
        .products()
        .low_stock_count(LOW_STOCK_THRESHOLD)
        .await?;

    Ok(Json(json!({
        "today_bills": today_bills,
        "low_stock_count": low_stock,
    })))
}
