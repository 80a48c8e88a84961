//! # In-Memory Stores
//!
//! Process-local backends for tests and single-instance demos.
//!
//! The inventory holds one `std::sync::Mutex` over the whole map. A batch
//! is checked and applied inside a single critical section with no await
//! point, so a cancelled caller can never leave half a batch applied.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use figures_core::{FigureKind, Money, Order, ReservationBatch};
use tracing::debug;

use crate::error::{ReserveError, StoreError, StoreResult};
use crate::store::{InventoryStore, OrderStore};

// =============================================================================
// Inventory
// =============================================================================

/// Inventory kept in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    counts: Mutex<HashMap<FigureKind, i64>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        MemoryInventory::default()
    }

    /// Creates an inventory with initial counts.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::FigureKind;
    /// use figures_store::MemoryInventory;
    ///
    /// let inventory = MemoryInventory::with_stock([(FigureKind::Circle, 5)]);
    /// ```
    pub fn with_stock(stock: impl IntoIterator<Item = (FigureKind, i64)>) -> Self {
        MemoryInventory {
            counts: Mutex::new(stock.into_iter().collect()),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<FigureKind, i64>>> {
        self.counts
            .lock()
            .map_err(|_| StoreError::Internal("inventory lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryStore for MemoryInventory {
    async fn try_reserve_all(&self, batch: &ReservationBatch) -> Result<(), ReserveError> {
        let mut counts = self.lock()?;

        for entry in batch.iter() {
            let available = counts.get(&entry.kind).copied().unwrap_or(0);
            if available < entry.count {
                return Err(ReserveError::InsufficientStock {
                    kind: entry.kind,
                    requested: entry.count,
                    available,
                });
            }
        }

        for entry in batch.iter() {
            *counts.entry(entry.kind).or_insert(0) -= entry.count;
        }

        debug!(kinds = batch.len(), "Reserved batch in memory");
        Ok(())
    }

    async fn available_count(&self, kind: FigureKind) -> StoreResult<i64> {
        Ok(self.lock()?.get(&kind).copied().unwrap_or(0))
    }

    async fn provision(&self, kind: FigureKind, count: i64) -> StoreResult<()> {
        if count < 0 {
            return Err(StoreError::InvalidStock { kind, count });
        }

        self.lock()?.insert(kind, count);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.counts.lock().is_ok()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Orders kept in a vector, in save order.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        MemoryOrderStore::default()
    }

    /// Snapshot of every saved order.
    pub fn orders(&self) -> StoreResult<Vec<Order>> {
        self.orders
            .lock()
            .map(|orders| orders.clone())
            .map_err(|_| StoreError::Internal("order lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn save(&self, order: &Order) -> StoreResult<Money> {
        self.orders
            .lock()
            .map_err(|_| StoreError::Internal("order lock poisoned".to_string()))?
            .push(order.clone());

        Ok(order.total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn batch(entries: &[(FigureKind, i64)]) -> ReservationBatch {
        ReservationBatch::new(entries.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_reserve_decrements() {
        let inventory = MemoryInventory::with_stock([(FigureKind::Circle, 5)]);

        inventory
            .try_reserve_all(&batch(&[(FigureKind::Circle, 3)]))
            .await
            .unwrap();

        assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let inventory =
            MemoryInventory::with_stock([(FigureKind::Circle, 10), (FigureKind::Square, 1)]);

        let err = inventory
            .try_reserve_all(&batch(&[(FigureKind::Circle, 5), (FigureKind::Square, 2)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReserveError::InsufficientStock {
                kind: FigureKind::Square,
                requested: 2,
                available: 1
            }
        ));
        assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 10);
        assert_eq!(inventory.available_count(FigureKind::Square).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unprovisioned_kind_has_zero() {
        let inventory = MemoryInventory::new();

        assert_eq!(inventory.available_count(FigureKind::Triangle).await.unwrap(), 0);
        assert!(matches!(
            inventory
                .try_reserve_all(&batch(&[(FigureKind::Triangle, 1)]))
                .await,
            Err(ReserveError::InsufficientStock { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_provision_rejects_negative() {
        let inventory = MemoryInventory::new();
        assert!(matches!(
            inventory.provision(FigureKind::Square, -1).await,
            Err(StoreError::InvalidStock { .. })
        ));

        inventory.provision(FigureKind::Square, 7).await.unwrap();
        assert_eq!(inventory.available_count(FigureKind::Square).await.unwrap(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reservations_never_oversell() {
        let inventory = Arc::new(MemoryInventory::with_stock([(FigureKind::Circle, 10)]));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let inventory = Arc::clone(&inventory);
                tokio::spawn(async move {
                    inventory
                        .try_reserve_all(&batch(&[(FigureKind::Circle, 1)]))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut reserved = 0;
        for handle in handles {
            if handle.await.unwrap() {
                reserved += 1;
            }
        }

        assert_eq!(reserved, 10);
        assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_order_store_returns_total() {
        let store = MemoryOrderStore::new();
        let order = Order::new(Vec::new(), Money::from_cents(848));

        assert_eq!(store.save(&order).await.unwrap(), Money::from_cents(848));
        assert_eq!(store.orders().unwrap().len(), 1);
    }
}
