//! # Bill Repository
//!
//! Transactional bill creation, lifecycle updates, invoice fetches, and
//! dashboard aggregates.
//!
//! ## Atomic Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create() - one transaction                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT bill header                                                   │
//! │    for each item:                                                       │
//! │      SELECT product name            ── missing? ──► NotFound, ROLLBACK  │
//! │      INSERT bill_items row (name snapshot)                              │
//! │      UPDATE products                                                    │
//! │        SET stock = stock - qty                                          │
//! │        WHERE id = ? AND stock >= qty ── 0 rows? ──► StockConflict,      │
//! │                                                     ROLLBACK            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either the bill, all its items, and every stock decrement land         │
//! │  together, or none of them do. The conditional UPDATE is the            │
//! │  oversell guard: two concurrent checkouts of the last unit cannot       │
//! │  both match the WHERE clause.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopbill_core::tax::TaxBreakdown;
use shopbill_core::{Bill, BillItem, BillStatus, PaymentMethod, StoredBill, StoredItem, StoredScalar};

// =============================================================================
// Inputs / Row Types
// =============================================================================

/// One line of a bill to be created. The product name is snapshotted
/// inside the transaction, not supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewBillItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub line_total_paise: i64,
}

/// A bill to be created.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub customer_id: Option<i64>,
    pub status: BillStatus,
    pub payment_method: PaymentMethod,
    pub breakdown: TaxBreakdown,
    pub items: Vec<NewBillItem>,
}

/// The identifiers of a freshly created bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBill {
    pub id: i64,
    pub bill_number: String,
}

/// One row of the invoice listing (joined with the customer directory).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct BillListRow {
    pub id: i64,
    pub bill_number: String,
    pub customer_name: Option<String>,
    pub status: BillStatus,
    pub subtotal_paise: i64,
    pub gst_paise: i64,
    pub total_paise: i64,
    pub payment_method: PaymentMethod,
    pub created_at: chrono::DateTime<Utc>,
}

/// One point of the dashboard weekly sales series.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyTotal {
    /// Day in `YYYY-MM-DD`.
    pub day: String,
    pub total_paise: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Creates a bill, its items, and the stock decrements atomically.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if an item references a missing product
    /// - `DbError::StockConflict` if a product has fewer units than
    ///   requested
    ///
    /// In both cases the transaction is rolled back; no bill row, item
    /// row, or stock change survives.
    pub async fn create(&self, new: NewBill) -> DbResult<CreatedBill> {
        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let bill_number = generate_bill_number(now);

        debug!(bill_number = %bill_number, items = new.items.len(), "Creating bill");

        let b = &new.breakdown;
        let result = sqlx::query(
            "INSERT INTO bills (
                bill_number, customer_id, status,
                subtotal_paise, discount_type, discount_value, discount_paise,
                gst_type, cgst_paise, sgst_paise, igst_paise, gst_paise,
                total_paise, payment_method, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&bill_number)
        .bind(new.customer_id)
        .bind(new.status)
        .bind(b.subtotal.paise())
        .bind(&b.discount_type)
        .bind(b.discount_value)
        .bind(b.discount.paise())
        .bind(&b.gst_type)
        .bind(b.cgst.paise())
        .bind(b.sgst.paise())
        .bind(b.igst.paise())
        .bind(b.gst.paise())
        .bind(b.total.paise())
        .bind(new.payment_method)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let bill_id = result.last_insert_rowid();

        for item in &new.items {
            // Name snapshot; also proves the product exists before we
            // touch its stock.
            let product_name: Option<String> =
                sqlx::query_scalar("SELECT name FROM products WHERE id = ?1")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let product_name = match product_name {
                Some(name) => name,
                // Dropping the tx rolls everything back
                None => return Err(DbError::not_found("Product", item.product_id)),
            };

            sqlx::query(
                "INSERT INTO bill_items (
                    bill_id, product_id, product_name,
                    quantity, unit_price_paise, line_total_paise
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(bill_id)
            .bind(item.product_id)
            .bind(&product_name)
            .bind(item.quantity)
            .bind(item.unit_price_paise)
            .bind(item.line_total_paise)
            .execute(&mut *tx)
            .await?;

            // Oversell guard: matches only while enough stock remains
            let updated = sqlx::query(
                "UPDATE products
                 SET stock = stock - ?1
                 WHERE id = ?2 AND stock >= ?1",
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(DbError::StockConflict {
                    product_id: item.product_id,
                    requested: item.quantity,
                });
            }
        }

        tx.commit().await?;

        debug!(bill_id = bill_id, "Bill committed");
        Ok(CreatedBill {
            id: bill_id,
            bill_number,
        })
    }

    /// Fetches a single bill header by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(
            "SELECT id, bill_number, customer_id, status,
                    subtotal_paise, discount_type, discount_value, discount_paise,
                    gst_type, cgst_paise, sgst_paise, igst_paise, gst_paise,
                    total_paise, payment_method, upi_id, card_number, card_name,
                    created_at
             FROM bills
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Fetches the line items of a bill.
    pub async fn items(&self, bill_id: i64) -> DbResult<Vec<BillItem>> {
        let items = sqlx::query_as::<_, BillItem>(
            "SELECT id, bill_id, product_id, product_name,
                    quantity, unit_price_paise, line_total_paise
             FROM bill_items
             WHERE bill_id = ?1
             ORDER BY id",
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Number of line items on a bill (0 for an unknown bill).
    pub async fn items_count(&self, bill_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_items WHERE bill_id = ?1")
            .bind(bill_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Invoice listing, newest first, with the customer name joined in.
    pub async fn list(&self) -> DbResult<Vec<BillListRow>> {
        self.list_limited(None).await
    }

    /// The `limit` most recent bills for the dashboard.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<BillListRow>> {
        self.list_limited(Some(limit)).await
    }

    async fn list_limited(&self, limit: Option<u32>) -> DbResult<Vec<BillListRow>> {
        let sql = "SELECT b.id, b.bill_number, c.name AS customer_name, b.status,
                          b.subtotal_paise, b.gst_paise, b.total_paise,
                          b.payment_method, b.created_at
                   FROM bills b
                   LEFT JOIN customers c ON c.id = b.customer_id
                   ORDER BY b.created_at DESC, b.id DESC
                   LIMIT ?1";

        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows = sqlx::query_as::<_, BillListRow>(sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Records payment details and marks the bill completed.
    pub async fn complete_payment(
        &self,
        id: i64,
        upi_id: Option<&str>,
        card_number: Option<&str>,
        card_name: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE bills
             SET status = ?1, upi_id = ?2, card_number = ?3, card_name = ?4
             WHERE id = ?5",
        )
        .bind(BillStatus::Completed)
        .bind(upi_id)
        .bind(card_number)
        .bind(card_name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bill", id));
        }

        debug!(bill_id = id, "Payment completed");
        Ok(())
    }

    /// Payment method and status of a bill, for the confirmation page.
    pub async fn payment_info(&self, id: i64) -> DbResult<Option<(PaymentMethod, BillStatus)>> {
        let info = sqlx::query_as::<_, (PaymentMethod, BillStatus)>(
            "SELECT payment_method, status FROM bills WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }

    // =========================================================================
    // Dashboard Aggregates
    // =========================================================================

    /// Total number of bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of bills created today (UTC).
    pub async fn today_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bills WHERE DATE(created_at) = DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Sum of today's bill totals in paise.
    pub async fn today_total(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_paise), 0)
             FROM bills
             WHERE DATE(created_at) = DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Sum of this month's bill totals in paise.
    pub async fn month_total(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_paise), 0)
             FROM bills
             WHERE DATE(created_at) >= DATE('now', 'start of month')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Per-day sales totals over the last seven days (inclusive of today).
    ///
    /// Days with no sales are absent; the dashboard fills the gaps with
    /// zeros when it builds the chart series.
    pub async fn weekly_totals(&self) -> DbResult<Vec<DailyTotal>> {
        let totals = sqlx::query_as::<_, DailyTotal>(
            "SELECT DATE(created_at) AS day,
                    COALESCE(SUM(total_paise), 0) AS total_paise
             FROM bills
             WHERE DATE(created_at) >= DATE('now', '-6 days')
             GROUP BY DATE(created_at)
             ORDER BY day",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    // =========================================================================
    // Invoice Fetch (raw scalars)
    // =========================================================================

    /// Fetches a bill and its items for invoice rendering.
    ///
    /// Amount and timestamp columns come back as [`StoredScalar`]s: legacy
    /// rows may hold REAL rupees or numeric TEXT where we write INTEGER
    /// paise, and the renderer (not this layer) owns the coercion rules.
    ///
    /// Returns `Ok(None)` for an unknown bill id.
    pub async fn fetch_stored(&self, id: i64) -> DbResult<Option<(StoredBill, Vec<StoredItem>)>> {
        let row = sqlx::query(
            "SELECT b.id, b.bill_number, b.subtotal_paise, b.gst_paise,
                    b.total_paise, b.payment_method, b.created_at,
                    c.name AS customer_name, c.phone AS customer_phone,
                    c.email AS customer_email, c.address AS customer_address
             FROM bills b
             LEFT JOIN customers c ON c.id = b.customer_id
             WHERE b.id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let bill = StoredBill {
            id: row.try_get("id")?,
            bill_number: scalar_to_text(raw_scalar(&row, "bill_number")),
            subtotal: raw_scalar(&row, "subtotal_paise"),
            gst: raw_scalar(&row, "gst_paise"),
            total: raw_scalar(&row, "total_paise"),
            payment_method: scalar_to_text(raw_scalar(&row, "payment_method")),
            created_at: raw_scalar(&row, "created_at"),
            customer_name: text_or_none(raw_scalar(&row, "customer_name")),
            customer_phone: text_or_none(raw_scalar(&row, "customer_phone")),
            customer_email: text_or_none(raw_scalar(&row, "customer_email")),
            customer_address: text_or_none(raw_scalar(&row, "customer_address")),
        };

        let item_rows = sqlx::query(
            "SELECT product_name, quantity, unit_price_paise, line_total_paise
             FROM bill_items
             WHERE bill_id = ?1
             ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(|row| StoredItem {
                product_name: scalar_to_text(raw_scalar(row, "product_name")),
                quantity: raw_scalar(row, "quantity"),
                unit_price: raw_scalar(row, "unit_price_paise"),
                line_total: raw_scalar(row, "line_total_paise"),
            })
            .collect();

        Ok(Some((bill, items)))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Process-wide sequence folded into bill numbers. The wall clock alone
/// cannot tell two checkouts in the same millisecond apart, and
/// `bills.bill_number` is UNIQUE.
static BILL_SEQ: AtomicI64 = AtomicI64::new(0);

/// Generates a bill number from the creation instant.
///
/// Format: `BILL<YYYYmmddHHMMSS>-<NNNN>` where the suffix mixes the
/// millisecond clock with the process-wide sequence, so two bills within
/// the same second (or the same millisecond) still get distinct numbers.
fn generate_bill_number(now: chrono::DateTime<Utc>) -> String {
    let seq = BILL_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "BILL{}-{:04}",
        now.format("%Y%m%d%H%M%S"),
        (now.timestamp_millis() + seq).rem_euclid(10000)
    )
}

/// Reads a column as whatever SQLite actually stored there.
///
/// The decode attempts are ordered int → real → text; sqlx's sqlite
/// type-compatibility checks make mismatched decodes fail instead of
/// silently converting, so the first success reflects the storage class.
///
/// INTEGER affinity on the amount columns converts a lossless-integral
/// REAL (`250.0`) to an integer at insert time, so a whole-rupee legacy
/// amount surfaces as `Int` and cannot be told apart from paise. Only
/// fractional legacy amounts survive as `Real`.
fn raw_scalar(row: &SqliteRow, column: &str) -> StoredScalar {
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(column) {
        return StoredScalar::Int(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(column) {
        return StoredScalar::Real(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(column) {
        return StoredScalar::Text(v);
    }
    StoredScalar::Null
}

fn scalar_to_text(scalar: StoredScalar) -> String {
    match scalar {
        StoredScalar::Text(s) => s,
        StoredScalar::Int(i) => i.to_string(),
        StoredScalar::Real(f) => f.to_string(),
        StoredScalar::Null => String::new(),
    }
}

fn text_or_none(scalar: StoredScalar) -> Option<String> {
    match scalar {
        StoredScalar::Text(s) if !s.trim().is_empty() => Some(s),
        StoredScalar::Int(i) => Some(i.to_string()),
        StoredScalar::Real(f) => Some(f.to_string()),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use shopbill_core::money::Money;
    use shopbill_core::tax::{flat_rate, LineInput};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price_paise: i64, stock: i64) -> i64 {
        db.products()
            .insert(NewProduct {
                name: name.to_string(),
                price_paise,
                stock,
                barcode: None,
            })
            .await
            .unwrap()
            .id
    }

    fn new_bill(items: Vec<NewBillItem>, status: BillStatus) -> NewBill {
        let lines: Vec<LineInput> = items
            .iter()
            .map(|i| LineInput {
                quantity: i.quantity,
                unit_price: Money::from_paise(i.unit_price_paise),
            })
            .collect();
        NewBill {
            customer_id: None,
            status,
            payment_method: PaymentMethod::Cash,
            breakdown: flat_rate(&lines).unwrap(),
            items,
        }
    }

    fn item(product_id: i64, quantity: i64, unit_price_paise: i64) -> NewBillItem {
        NewBillItem {
            product_id,
            quantity,
            unit_price_paise,
            line_total_paise: unit_price_paise * quantity,
        }
    }

    #[tokio::test]
    async fn test_create_decrements_stock_and_snapshots_names() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 10).await;
        let pad = seed_product(&db, "Pad", 5000, 4).await;

        let created = db
            .bills()
            .create(new_bill(
                vec![item(pen, 2, 1000), item(pad, 1, 5000)],
                BillStatus::Completed,
            ))
            .await
            .unwrap();

        assert!(created.bill_number.starts_with("BILL"));

        let bill = db.bills().get(created.id).await.unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Completed);
        assert_eq!(bill.subtotal_paise, 7000);
        assert_eq!(bill.gst_paise, 1260); // 18% of 70.00
        assert_eq!(bill.total_paise, 8260);

        let items = db.bills().items(created.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "Pen");
        assert_eq!(db.bills().items_count(created.id).await.unwrap(), 2);

        assert_eq!(db.products().get(pen).await.unwrap().unwrap().stock, 8);
        assert_eq!(db.products().get(pad).await.unwrap().unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_stock_conflict() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 10).await;
        let rare = seed_product(&db, "Rare", 9900, 1).await;

        let err = db
            .bills()
            .create(new_bill(
                vec![item(pen, 2, 1000), item(rare, 2, 9900)],
                BillStatus::Completed,
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::StockConflict {
                product_id,
                requested: 2,
            } if product_id == rare
        ));

        // Nothing survives: no bill, no items, stock untouched
        assert_eq!(db.bills().count().await.unwrap(), 0);
        assert_eq!(db.products().get(pen).await.unwrap().unwrap().stock, 10);
        assert_eq!(db.products().get(rare).await.unwrap().unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_last_unit_sells_exactly_once() {
        let db = test_db().await;
        let last = seed_product(&db, "Last One", 2500, 1).await;

        let first = db
            .bills()
            .create(new_bill(vec![item(last, 1, 2500)], BillStatus::Completed))
            .await;
        assert!(first.is_ok());

        let second = db
            .bills()
            .create(new_bill(vec![item(last, 1, 2500)], BillStatus::Completed))
            .await;
        assert!(matches!(second, Err(DbError::StockConflict { .. })));

        assert_eq!(db.products().get(last).await.unwrap().unwrap().stock, 0);
        assert_eq!(db.bills().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_unknown_product_is_not_found() {
        let db = test_db().await;

        let err = db
            .bills()
            .create(new_bill(vec![item(999, 1, 100)], BillStatus::Completed))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_complete_payment_flips_status() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 5).await;

        let created = db
            .bills()
            .create(new_bill(
                vec![item(pen, 1, 1000)],
                BillStatus::PaymentPending,
            ))
            .await
            .unwrap();

        let (method, status) = db.bills().payment_info(created.id).await.unwrap().unwrap();
        assert_eq!(method, PaymentMethod::Cash);
        assert_eq!(status, BillStatus::PaymentPending);

        db.bills()
            .complete_payment(created.id, Some("shop@upi"), None, None)
            .await
            .unwrap();

        let bill = db.bills().get(created.id).await.unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Completed);
        assert_eq!(bill.upi_id.as_deref(), Some("shop@upi"));

        assert!(matches!(
            db.bills().complete_payment(999, None, None, None).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_listing_and_aggregates() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 50).await;

        for _ in 0..3 {
            db.bills()
                .create(new_bill(vec![item(pen, 1, 1000)], BillStatus::Completed))
                .await
                .unwrap();
        }

        let list = db.bills().list().await.unwrap();
        assert_eq!(list.len(), 3);
        assert!(list[0].customer_name.is_none());

        let recent = db.bills().recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);

        assert_eq!(db.bills().count().await.unwrap(), 3);
        assert_eq!(db.bills().today_count().await.unwrap(), 3);
        // 3 × (1000 + 180)
        assert_eq!(db.bills().today_total().await.unwrap(), 3540);
        assert_eq!(db.bills().month_total().await.unwrap(), 3540);

        let weekly = db.bills().weekly_totals().await.unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].total_paise, 3540);
    }

    #[tokio::test]
    async fn test_fetch_stored_reads_raw_scalars() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 5).await;

        let created = db
            .bills()
            .create(new_bill(vec![item(pen, 2, 1000)], BillStatus::Completed))
            .await
            .unwrap();

        let (bill, items) = db.bills().fetch_stored(created.id).await.unwrap().unwrap();
        assert_eq!(bill.bill_number, created.bill_number);
        assert_eq!(bill.subtotal, StoredScalar::Int(2000));
        assert_eq!(bill.payment_method, "Cash");
        assert!(bill.customer_name.is_none());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Pen");
        assert_eq!(items[0].quantity, StoredScalar::Int(2));

        assert!(db.bills().fetch_stored(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_stored_survives_legacy_scalars() {
        let db = test_db().await;

        // Hand-write a legacy-shaped row: REAL rupees and a naive
        // datetime string instead of INTEGER paise and RFC 3339. The
        // amounts are fractional on purpose: INTEGER affinity converts
        // a lossless `250.0` to `Int(250)` at insert time.
        sqlx::query(
            "INSERT INTO bills (bill_number, status, subtotal_paise, gst_paise,
                                total_paise, payment_method, created_at)
             VALUES ('BILL-LEGACY', 'Completed', 250.5, 45.09, 295.59, 'Cash',
                     '2024-03-01 10:30:00')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let id: i64 = sqlx::query_scalar("SELECT id FROM bills WHERE bill_number = 'BILL-LEGACY'")
            .fetch_one(db.pool())
            .await
            .unwrap();

        let (bill, _) = db.bills().fetch_stored(id).await.unwrap().unwrap();
        assert_eq!(bill.subtotal, StoredScalar::Real(250.5));
        assert_eq!(bill.total, StoredScalar::Real(295.59));
        assert_eq!(
            bill.created_at,
            StoredScalar::Text("2024-03-01 10:30:00".to_string())
        );
    }

    #[test]
    fn test_bill_number_format() {
        let now = chrono::DateTime::parse_from_rfc3339("2024-03-01T10:30:00.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let number = generate_bill_number(now);
        assert!(number.starts_with("BILL20240301103000-"));
        assert_eq!(number.len(), "BILL20240301103000-0000".len());
    }

    #[test]
    fn test_bill_numbers_distinct_at_same_instant() {
        // bill_number is UNIQUE; same-millisecond checkouts must not
        // mint the same number.
        let now = Utc::now();
        assert_ne!(generate_bill_number(now), generate_bill_number(now));
    }

    #[tokio::test]
    async fn test_rapid_checkouts_all_succeed() {
        let db = test_db().await;
        let pen = seed_product(&db, "Pen", 1000, 50).await;

        let mut numbers = Vec::new();
        for _ in 0..5 {
            let created = db
                .bills()
                .create(new_bill(vec![item(pen, 1, 1000)], BillStatus::Completed))
                .await
                .unwrap();
            numbers.push(created.bill_number);
        }

        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 5);
    }
}
