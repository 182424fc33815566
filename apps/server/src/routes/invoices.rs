//! Invoice routes: listing, view model, print view, and PDF download.
//!
//! Every rendering path loads the bill through [`load_document`], so the
//! raw-scalar coercion happens in exactly one place
//! (`shopbill_invoice::normalize`).

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use shopbill_core::Money;
use shopbill_invoice::{normalize, render_pdf, InvoiceDocument};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub status: Option<String>,
    pub message: Option<String>,
}

/// Loads and normalizes a bill for rendering.
async fn load_document(state: &AppState, id: i64) -> ApiResult<InvoiceDocument> {
    let (bill, items) = state
        .db
        .bills()
        .fetch_stored(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;

    Ok(normalize(&bill, &items))
}

/// `GET /invoices` - bill listing with joined customer names.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let bills = state.db.bills().list().await?;

    Ok(Json(json!({
        "page": "invoices",
        "status": flash.status,
        "message": flash.message,
        "bills": bills.iter().map(|b| json!({
            "id": b.id,
            "bill_number": b.bill_number,
            "customer_name": b.customer_name,
            "status": b.status,
            "subtotal": Money::from_paise(b.subtotal_paise).rupees(),
            "gst": Money::from_paise(b.gst_paise).rupees(),
            "total": Money::from_paise(b.total_paise).rupees(),
            "payment_method": b.payment_method,
            "created_at": b.created_at,
        })).collect::<Vec<_>>(),
    })))
}

/// `GET /invoices/{id}` - the invoice view model.
pub async fn view(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<InvoiceDocument>> {
    Ok(Json(load_document(&state, id).await?))
}

/// `GET /invoices/{id}/print` - identical document, print-page flavor.
pub async fn print_view(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let document = load_document(&state, id).await?;

    Ok(Json(json!({
        "page": "invoice-print",
        "invoice": document,
    })))
}

/// `GET /invoices/{id}/pdf` - the invoice as a PDF download.
pub async fn pdf(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let document = load_document(&state, id).await?;
    let filename = format!("attachment; filename=\"{}.pdf\"", document.bill_number);
    let bytes = render_pdf(&document)?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, filename),
        ],
        bytes,
    ))
}
