//! Dashboard aggregates: weekly sales series, stock chart, counters,
//! and the most recent bills.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde_json::json;

use shopbill_core::Money;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /dashboard`
///
/// The weekly series always spans exactly seven days ending today; days
/// with no sales are filled with zeros.
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let bills = state.db.bills();
    let products = state.db.products();

    let daily: HashMap<String, i64> = bills
        .weekly_totals()
        .await?
        .into_iter()
        .map(|d| (d.day, d.total_paise))
        .collect();

    let today = Utc::now().date_naive();
    let mut week_labels = Vec::with_capacity(7);
    let mut week_totals = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let day = today - Duration::days(offset);
        let key = day.format("%Y-%m-%d").to_string();
        week_totals.push(Money::from_paise(*daily.get(&key).unwrap_or(&0)).rupees());
        week_labels.push(key);
    }

    let stock_levels = products.stock_levels(10).await?;
    let recent = bills.recent(5).await?;

    Ok(Json(json!({
        "page": "dashboard",
        "username": user.username,
        "week_labels": week_labels,
        "week_totals": week_totals,
        "stock_levels": stock_levels.iter().map(|s| json!({
            "name": s.name,
            "stock": s.stock,
        })).collect::<Vec<_>>(),
        "today_total": Money::from_paise(bills.today_total().await?).rupees(),
        "month_total": Money::from_paise(bills.month_total().await?).rupees(),
        "product_count": products.count().await?,
        "bill_count": bills.count().await?,
        "recent_bills": recent.iter().map(|b| json!({
            "id": b.id,
            "bill_number": b.bill_number,
            "customer_name": b.customer_name,
            "status": b.status,
            "total": Money::from_paise(b.total_paise).rupees(),
            "created_at": b.created_at,
        })).collect::<Vec<_>>(),
    })))
}
