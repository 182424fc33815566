//! Customer directory pages: listing with search, add/edit forms, delete.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shopbill_core::validation::validate_customer_name;
use shopbill_db::NewCustomer;

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

#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl CustomerForm {
    fn validate(&self) -> Result<NewCustomer, shopbill_core::ValidationError> {
        let name = self.name.trim().to_string();
        validate_customer_name(&name)?;

        Ok(NewCustomer {
            name,
            phone: clean(&self.phone),
            email: clean(&self.email),
            address: clean(&self.address),
        })
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `GET /customers` - directory listing, filtered by name or phone.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let customers = state.db.customers().list(query.search.as_deref()).await?;

    Ok(Json(json!({
        "page": "customers",
        "search": query.search,
        "status": query.status,
        "message": query.message,
        "customers": customers,
    })))
}

/// `POST /customers/add`
pub async fn add(
    State(state): State<AppState>,
    _user: AuthUser,
    Form(form): Form<CustomerForm>,
) -> ApiResult<Redirect> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(err) => return Ok(flash_error("/customers", &err.to_string())),
    };

    let customer = state.db.customers().insert(new).await?;
    info!(customer_id = customer.id, "Customer added");

    Ok(flash_success("/customers", "Customer added successfully"))
}

/// `POST /customers/edit/{id}`
pub async fn edit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<CustomerForm>,
) -> ApiResult<Redirect> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(err) => return Ok(flash_error("/customers", &err.to_string())),
    };

    match state.db.customers().update(id, new).await {
        Ok(()) => Ok(flash_success("/customers", "Customer updated successfully")),
        Err(shopbill_db::DbError::NotFound { .. }) => {
            Ok(flash_error("/customers", "Customer not found"))
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /customers/delete/{id}`
///
/// Unconditional: bills keep their nullable customer reference, which
/// dangles after deletion and renders as "Walk-in Customer".
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    match state.db.customers().delete(id).await {
        Ok(()) => Ok(flash_success("/customers", "Customer deleted successfully")),
        Err(shopbill_db::DbError::NotFound { .. }) => {
            Ok(flash_error("/customers", "Customer not found"))
        }
        Err(err) => Err(err.into()),
    }
}
