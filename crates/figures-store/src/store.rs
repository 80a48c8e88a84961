//! # Store Traits
//!
//! The two seams between the order pipeline and shared state.
//!
//! ```text
//!            OrderService
//!           │            │
//!           ▼            ▼
//!  Arc<dyn InventoryStore>   Arc<dyn OrderStore>
//!   ├── MemoryInventory       ├── MemoryOrderStore
//!   ├── SqliteInventory       └── SqliteOrderStore
//!   └── RedisInventory
//! ```
//!
//! Check and reserve are one call: there is no
//! "is there enough?" method that callers could race on.

use async_trait::async_trait;
use figures_core::{FigureKind, Money, Order, ReservationBatch};

use crate::error::{ReserveError, StoreResult};

/// Per-kind available counts with one atomic mutation.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Reserves every entry of the batch, or none of them.
    ///
    /// On shortage, reports the first entry (in batch order) that lacked
    /// stock and leaves every record unchanged.
    async fn try_reserve_all(&self, batch: &ReservationBatch) -> Result<(), ReserveError>;

    /// Current count for a kind. Advisory only: it may be stale by the
    /// time the caller reads it. Never-provisioned kinds report 0.
    async fn available_count(&self, kind: FigureKind) -> StoreResult<i64>;

    /// Sets the absolute count for a kind (initial provisioning).
    async fn provision(&self, kind: FigureKind, count: i64) -> StoreResult<()>;

    /// Whether the backend answers.
    async fn health_check(&self) -> bool;
}

/// Durable record of placed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists an order and returns the amount recorded for it.
    async fn save(&self, order: &Order) -> StoreResult<Money>;
}
