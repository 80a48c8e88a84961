//! # Order Repository
//!
//! SQLite-backed [`OrderStore`].
//!
//! An order and its figures are written in one transaction: a reader never
//! sees an order row without its figures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use figures_core::{Money, Order};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::store::OrderStore;

/// A stored order as read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderRecord {
    pub id: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// One stored figure of an order.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderFigureRecord {
    pub position: i64,
    pub kind: String,
    pub side_a: f64,
    pub side_b: f64,
    pub side_c: f64,
    pub count: i64,
    pub area: f64,
}

/// Repository for the `orders` and `order_figures` tables.
#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Creates a new SqliteOrderStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteOrderStore { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<OrderRecord>> {
        let record = sqlx::query_as::<_, OrderRecord>(
            "SELECT id, total_cents, created_at FROM orders WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets the figures of an order, in cart order.
    pub async fn get_figures(&self, id: Uuid) -> StoreResult<Vec<OrderFigureRecord>> {
        let figures = sqlx::query_as::<_, OrderFigureRecord>(
            r#"
            SELECT position, kind, side_a, side_b, side_c, count, area
            FROM order_figures
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(figures)
    }

    /// Counts stored orders.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn save(&self, order: &Order) -> StoreResult<Money> {
        let id = order.id().to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO orders (id, total_cents, created_at) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(order.total().cents())
            .bind(order.created_at())
            .execute(&mut *tx)
            .await?;

        for (position, figure) in order.figures().iter().enumerate() {
            let spec = figure.spec();

            sqlx::query(
                r#"
                INSERT INTO order_figures (
                    order_id, position, kind, side_a, side_b, side_c, count, area
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&id)
            .bind(position as i64)
            .bind(spec.kind.as_str())
            .bind(spec.side_a)
            .bind(spec.side_b)
            .bind(spec.side_c)
            .bind(spec.count)
            .bind(figure.area())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(order_id = %id, figures = order.figures().len(), "Saved order");
        Ok(order.total())
    }
}
