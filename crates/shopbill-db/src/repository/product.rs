//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Listing with substring search
//! - Barcode lookup (in-stock only)
//! - Id-or-name lookup for the billing screen
//! - CRUD with unconditional delete
//!
//! ## Lookup Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How id-or-name lookup works                            │
//! │                                                                         │
//! │  User types: "42"          ──► all digits ──► exact id match            │
//! │  User types: "note"        ──► substring  ──► name LIKE %note%          │
//! │                                              (limit 10)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopbill_core::Product;

/// Input for creating or updating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price_paise: i64,
    pub stock: i64,
    pub barcode: Option<String>,
}

/// A (name, stock) pair for the dashboard stock chart.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StockLevel {
    pub name: String,
    pub stock: i64,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let results = repo.list(Some("pen")).await?;
/// let product = repo.get(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by a name substring.
    ///
    /// An empty or absent search term returns the whole catalog,
    /// ordered by name.
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Product>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        debug!(search = ?search, "Listing products");

        let products = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Product>(
                    "SELECT id, name, price_paise, stock, barcode, created_at
                     FROM products
                     WHERE name LIKE ?1
                     ORDER BY name",
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT id, name, price_paise, stock, barcode, created_at
                     FROM products
                     ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Lists products with at least one unit on the shelf.
    ///
    /// The billing screen only offers sellable products.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_paise, stock, barcode, created_at
             FROM products
             WHERE stock > 0
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetches a single product by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_paise, stock, barcode, created_at
             FROM products
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Looks up an in-stock product by barcode.
    ///
    /// Out-of-stock products are invisible to the scanner; an unknown
    /// barcode is `Ok(None)`, not an error.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Barcode lookup");

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_paise, stock, barcode, created_at
             FROM products
             WHERE barcode = ?1 AND stock > 0",
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Id-or-name lookup for the billing quick-entry box.
    ///
    /// An all-digit query is treated as an exact id; anything else is a
    /// name substring search capped at `limit` rows.
    pub async fn lookup(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if query.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = query.parse::<i64>() {
                return Ok(self.get(id).await?.into_iter().collect());
            }
        }

        let pattern = format!("%{}%", query);
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_paise, stock, barcode, created_at
             FROM products
             WHERE name LIKE ?1
             ORDER BY name
             LIMIT ?2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product and returns the stored row.
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO products (name, price_paise, stock, barcode, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&new.name)
        .bind(new.price_paise)
        .bind(new.stock)
        .bind(&new.barcode)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Updates a product's editable fields.
    pub async fn update(&self, id: i64, new: NewProduct) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?1, price_paise = ?2, stock = ?3, barcode = ?4
             WHERE id = ?5",
        )
        .bind(&new.name)
        .bind(new.price_paise)
        .bind(new.stock)
        .bind(&new.barcode)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product unconditionally.
    ///
    /// Historical bill items keep their snapshot of the product name and
    /// price, so the invoice history survives the deletion. The
    /// product_id they carry becomes a dangling reference.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = id, "Product deleted");
        Ok(())
    }

    /// Total number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of products with stock below the given threshold.
    pub async fn low_stock_count(&self, threshold: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock < ?1")
            .bind(threshold)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Highest stock levels for the dashboard availability chart.
    pub async fn stock_levels(&self, limit: u32) -> DbResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            "SELECT name, stock FROM products ORDER BY stock DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
