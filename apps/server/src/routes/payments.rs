//! Payment completion for bills saved in `PaymentPending` status.

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payment details form. Either a UPI id or card fields, depending on
/// the method chosen on the confirmation page.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub upi_id: Option<String>,
    pub card_number: Option<String>,
    pub card_name: Option<String>,
}

/// `GET /confirm-payment/{id}` - data for the confirmation page.
pub async fn confirm_page(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let (payment_method, status) = state
        .db
        .bills()
        .payment_info(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;

    Ok(Json(json!({
        "page": "confirm-payment",
        "bill_id": id,
        "payment_method": payment_method,
        "status": status,
    })))
}

/// `POST /complete-payment/{id}` - record details, flip to `Completed`.
pub async fn complete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<PaymentForm>,
) -> ApiResult<Redirect> {
    state
        .db
        .bills()
        .complete_payment(
            id,
            clean(&form.upi_id),
            clean(&form.card_number),
            clean(&form.card_name),
        )
        .await?;

    info!(bill_id = id, "Payment completed");

    Ok(Redirect::to(&format!("/invoices/{}/print", id)))
}

fn clean(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
