//! # Inventory Repository
//!
//! SQLite-backed [`InventoryStore`].
//!
//! ## Batch Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    for each (kind, k) in batch order:                                   │
//! │      UPDATE inventory                                                   │
//! │         SET available_count = available_count - k                       │
//! │       WHERE kind = ? AND available_count >= k                           │
//! │      rows_affected == 0?                                                │
//! │        ├── read available_count (for the error)                         │
//! │        └── ROLLBACK → InsufficientStock { kind }                        │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard lives in the UPDATE itself, so there is no window between
//! checking and decrementing. The first UPDATE takes SQLite's write lock;
//! concurrent batches wait on `busy_timeout`, and a BUSY/LOCKED failure is
//! retried up to `max_attempts` times before surfacing as
//! [`StoreError::Busy`]. A transaction dropped before COMMIT (for example a
//! cancelled future) is rolled back by sqlx.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use figures_core::{FigureKind, ReservationBatch};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{ReserveError, StoreError, StoreResult};
use crate::store::InventoryStore;

/// Base delay between reservation attempts; grows linearly per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Repository for the `inventory` table.
#[derive(Debug, Clone)]
pub struct SqliteInventory {
    pool: SqlitePool,
    max_attempts: u32,
}

impl SqliteInventory {
    /// Creates a new SqliteInventory.
    pub fn new(pool: SqlitePool, max_attempts: u32) -> Self {
        SqliteInventory {
            pool,
            max_attempts: max_attempts.max(1),
        }
    }

    /// One reservation attempt in one transaction.
    async fn reserve_once(&self, batch: &ReservationBatch) -> Result<(), ReserveError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for entry in batch.iter() {
            let result = sqlx::query(
                r#"
                UPDATE inventory
                SET available_count = available_count - ?1,
                    updated_at = ?2
                WHERE kind = ?3
                AND available_count >= ?1
                "#,
            )
            .bind(entry.count)
            .bind(now)
            .bind(entry.kind.as_str())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT available_count FROM inventory WHERE kind = ?1")
                        .bind(entry.kind.as_str())
                        .fetch_optional(&mut *tx)
                        .await?;

                tx.rollback().await?;

                return Err(ReserveError::InsufficientStock {
                    kind: entry.kind,
                    requested: entry.count,
                    available: available.unwrap_or(0),
                });
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Current counts for every kind (0 for never-provisioned kinds).
    pub async fn list_counts(&self) -> StoreResult<Vec<(FigureKind, i64)>> {
        let mut counts = Vec::with_capacity(FigureKind::ALL.len());
        for kind in FigureKind::ALL {
            counts.push((kind, self.available_count(kind).await?));
        }
        Ok(counts)
    }
}

#[async_trait]
impl InventoryStore for SqliteInventory {
    async fn try_reserve_all(&self, batch: &ReservationBatch) -> Result<(), ReserveError> {
        let mut attempt = 1;

        loop {
            match self.reserve_once(batch).await {
                Err(ReserveError::Store(err)) if err.is_busy() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Inventory busy, retrying reservation"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Ok(()) => {
                    debug!(kinds = batch.len(), attempt, "Reserved batch");
                    return Ok(());
                }
                other => return other,
            }
        }
    }

    async fn available_count(&self, kind: FigureKind) -> StoreResult<i64> {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT available_count FROM inventory WHERE kind = ?1")
                .bind(kind.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(available.unwrap_or(0))
    }

    async fn provision(&self, kind: FigureKind, count: i64) -> StoreResult<()> {
        if count < 0 {
            return Err(StoreError::InvalidStock { kind, count });
        }

        sqlx::query(
            r#"
            INSERT INTO inventory (kind, available_count, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(kind) DO UPDATE SET
                available_count = excluded.available_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(kind.as_str())
        .bind(count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(kind = %kind, count, "Provisioned inventory");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
