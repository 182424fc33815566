//! Checkout routes.
//!
//! Two checkout contracts coexist, mirroring the two tax modes:
//!
//! - `POST /billing/create` - flat-rate JSON checkout; the server
//!   derives subtotal, 18% GST, and the total from the items.
//! - `POST /createbill` - itemized checkout; the POS form supplies the
//!   discount/GST components and the final total, and the server records
//!   them. This route deliberately requires no session; see the route
//!   table in DESIGN.md.
//! - `POST /savedraft` - the itemized schema, but the bill is created in
//!   `PaymentPending` status for later completion.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shopbill_core::tax::{flat_rate, itemized, ItemizedCharges, LineInput};
use shopbill_core::{BillStatus, Money, PaymentMethod};
use shopbill_db::{NewBill, NewBillItem};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

// =============================================================================
// Request Bodies
// =============================================================================

/// One checkout line as sent by the browser: price in rupees.
#[derive(Debug, Deserialize)]
pub struct ItemBody {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Body of `POST /billing/create`.
#[derive(Debug, Deserialize)]
pub struct FlatCheckoutBody {
    pub customer_id: Option<i64>,
    pub items: Vec<ItemBody>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Body of `POST /createbill` and `POST /savedraft`.
///
/// Monetary fields are rupees; absent GST components are zero.
#[derive(Debug, Deserialize)]
pub struct ItemizedCheckoutBody {
    pub customer_id: Option<i64>,
    pub items: Vec<ItemBody>,
    pub subtotal: f64,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    #[serde(default)]
    pub discount_amount: f64,
    pub gst_type: Option<String>,
    #[serde(default)]
    pub cgst: f64,
    #[serde(default)]
    pub sgst: f64,
    #[serde(default)]
    pub igst: f64,
    pub total: f64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

fn to_lines(items: &[ItemBody]) -> Vec<LineInput> {
    items
        .iter()
        .map(|i| LineInput {
            quantity: i.quantity,
            unit_price: Money::from_rupees(i.price),
        })
        .collect()
}

fn to_new_items(items: &[ItemBody]) -> Vec<NewBillItem> {
    items
        .iter()
        .map(|i| {
            let unit_price = Money::from_rupees(i.price);
            NewBillItem {
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price_paise: unit_price.paise(),
                line_total_paise: unit_price.multiply_quantity(i.quantity).paise(),
            }
        })
        .collect()
}

impl ItemizedCheckoutBody {
    fn charges(&self) -> ItemizedCharges {
        ItemizedCharges {
            subtotal: Money::from_rupees(self.subtotal),
            discount_type: self.discount_type.clone(),
            discount_value: self.discount_value,
            discount_amount: Money::from_rupees(self.discount_amount),
            gst_type: self.gst_type.clone(),
            cgst: Money::from_rupees(self.cgst),
            sgst: Money::from_rupees(self.sgst),
            igst: Money::from_rupees(self.igst),
            final_total: Money::from_rupees(self.total),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /billing` - checkout page data: sellable products and customers.
pub async fn billing_page(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().list_in_stock().await?;
    let customers = state.db.customers().list(None).await?;

    Ok(Json(json!({
        "page": "billing",
        "products": products.iter().map(|p| json!({
            "id": p.id,
            "name": p.name,
            "price": p.price().rupees(),
            "stock": p.stock,
            "barcode": p.barcode,
        })).collect::<Vec<_>>(),
        "customers": customers,
    })))
}

/// `POST /billing/create` - flat-rate checkout, bill lands `Completed`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<FlatCheckoutBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let breakdown = flat_rate(&to_lines(&body.items))?;

    let created = state
        .db
        .bills()
        .create(NewBill {
            customer_id: body.customer_id,
            status: BillStatus::Completed,
            payment_method: body.payment_method.unwrap_or_default(),
            breakdown,
            items: to_new_items(&body.items),
        })
        .await?;

    info!(
        bill_id = created.id,
        bill_number = %created.bill_number,
        cashier = %user.username,
        "Flat-rate bill created"
    );

    Ok(Json(json!({
        "success": true,
        "bill_id": created.id,
        "bill_number": created.bill_number,
    })))
}

/// `POST /createbill` - itemized checkout, bill lands `Completed`.
///
/// No `AuthUser` here: this route accepts unauthenticated requests.
pub async fn create_itemized(
    State(state): State<AppState>,
    Json(body): Json<ItemizedCheckoutBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let created = create_itemized_bill(&state, &body, BillStatus::Completed).await?;

    Ok(Json(json!({
        "status": "success",
        "bill_id": created,
    })))
}

/// `POST /savedraft` - itemized checkout saved as `PaymentPending`.
pub async fn save_draft(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<ItemizedCheckoutBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let created = create_itemized_bill(&state, &body, BillStatus::PaymentPending).await?;

    Ok(Json(json!({
        "status": "success",
        "bill_id": created,
    })))
}

async fn create_itemized_bill(
    state: &AppState,
    body: &ItemizedCheckoutBody,
    status: BillStatus,
) -> ApiResult<i64> {
    let breakdown = itemized(&to_lines(&body.items), body.charges())?;

    let created = state
        .db
        .bills()
        .create(NewBill {
            customer_id: body.customer_id,
            status,
            payment_method: body.payment_method.unwrap_or_default(),
            breakdown,
            items: to_new_items(&body.items),
        })
        .await?;

    info!(
        bill_id = created.id,
        bill_number = %created.bill_number,
        status = %status,
        "Itemized bill created"
    );

    Ok(created.id)
}
