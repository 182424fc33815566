//! # Customer Repository
//!
//! Database operations for the customer directory.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopbill_core::Customer;

/// Input for creating or updating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Aggregate purchase history for one customer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomerStats {
    pub total_bills: i64,
    pub total_spent_paise: i64,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers, optionally filtered by name or phone substring.
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Customer>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        debug!(search = ?search, "Listing customers");

        let customers = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Customer>(
                    "SELECT id, name, phone, email, address, created_at
                     FROM customers
                     WHERE name LIKE ?1 OR phone LIKE ?1
                     ORDER BY name",
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Customer>(
                    "SELECT id, name, phone, email, address, created_at
                     FROM customers
                     ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(customers)
    }

    /// Fetches a single customer by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, email, address, created_at
             FROM customers
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer and returns the stored row.
    pub async fn insert(&self, new: NewCustomer) -> DbResult<Customer> {
        debug!(name = %new.name, "Inserting customer");

        let result = sqlx::query(
            "INSERT INTO customers (name, phone, email, address, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Updates a customer's editable fields.
    pub async fn update(&self, id: i64, new: NewCustomer) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers
             SET name = ?1, phone = ?2, email = ?3, address = ?4
             WHERE id = ?5",
        )
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.address)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Deletes a customer unconditionally.
    ///
    /// Historical bills keep their customer_id; the invoice renderer
    /// falls back to "Walk-in Customer" when the join finds nothing.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        debug!(id = id, "Customer deleted");
        Ok(())
    }

    /// Total number of customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Purchase history aggregates for one customer.
    ///
    /// A customer with no bills gets zeros, not a not-found.
    pub async fn stats(&self, id: i64) -> DbResult<CustomerStats> {
        let stats = sqlx::query_as::<_, CustomerStats>(
            "SELECT COUNT(*) AS total_bills,
                    COALESCE(SUM(total_paise), 0) AS total_spent_paise
             FROM bills
             WHERE customer_id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
