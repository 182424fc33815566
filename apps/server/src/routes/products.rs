//! Product catalog pages: listing with search, add/edit forms, delete.
//!
//! Form routes redirect back to `/products` with a status message; the
//! request is not applied when validation fails.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shopbill_core::validation::{validate_price, validate_product_name, validate_stock};
use shopbill_core::Money;
use shopbill_db::NewProduct;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::{flash_error, flash_success};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

/// The add/edit product form. Price arrives in rupees and is converted
/// to paise at this boundary.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub barcode: Option<String>,
}

impl ProductForm {
    fn validate(&self) -> Result<NewProduct, shopbill_core::ValidationError> {
        let name = self.name.trim().to_string();
        validate_product_name(&name)?;

        let price = Money::from_rupees(self.price);
        validate_price(price)?;
        validate_stock(self.stock)?;

        let barcode = self
            .barcode
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        Ok(NewProduct {
            name,
            price_paise: price.paise(),
            stock: self.stock,
            barcode,
        })
    }
}

/// `GET /products` - catalog listing, optionally filtered by name.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().list(query.search.as_deref()).await?;

    Ok(Json(json!({
        "page": "products",
        "search": query.search,
        "status": query.status,
        "message": query.message,
        "products": products.iter().map(|p| json!({
            "id": p.id,
            "name": p.name,
            "price": p.price().rupees(),
            "stock": p.stock,
            "barcode": p.barcode,
        })).collect::<Vec<_>>(),
    })))
}

/// `POST /products/add`
pub async fn add(
    State(state): State<AppState>,
    _user: AuthUser,
    Form(form): Form<ProductForm>,
) -> ApiResult<Redirect> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(err) => return Ok(flash_error("/products", &err.to_string())),
    };

    let product = state.db.products().insert(new).await?;
    info!(product_id = product.id, name = %product.name, "Product added");

    Ok(flash_success("/products", "Product added successfully"))
}

/// `POST /products/edit/{id}`
pub async fn edit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> ApiResult<Redirect> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(err) => return Ok(flash_error("/products", &err.to_string())),
    };

    match state.db.products().update(id, new).await {
        Ok(_) => Ok(flash_success("/products", "Product updated successfully")),
        Err(shopbill_db::DbError::NotFound { .. }) => {
            Ok(flash_error("/products", "Product not found"))
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /products/delete/{id}`
///
/// Unconditional: historical bill items keep their name snapshot, but
/// their product reference dangles afterwards.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    match state.db.products().delete(id).await {
        Ok(()) => Ok(flash_success("/products", "Product deleted successfully")),
        Err(shopbill_db::DbError::NotFound { .. }) => {
            Ok(flash_error("/products", "Product not found"))
        }
        Err(err) => Err(err.into()),
    }
}
