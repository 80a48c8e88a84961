//! End-to-end tests for `OrderService::place_order` over in-process stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use figures_core::{Cart, FigureKind, Money, Order, Position, PricingTable, ReservationBatch};
use figures_orders::{OrderError, OrderService, ReservationPolicy};
use figures_store::{
    Database, DbConfig, InventoryStore, MemoryInventory, MemoryOrderStore, OrderStore,
    ReserveError, StoreError, StoreResult,
};

// =============================================================================
// Fakes
// =============================================================================

/// Counts reservation calls and delegates to a memory inventory.
#[derive(Default)]
struct CountingInventory {
    inner: MemoryInventory,
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingInventory {
    fn with_stock(stock: &[(FigureKind, i64)]) -> Self {
        CountingInventory {
            inner: MemoryInventory::with_stock(stock.iter().copied()),
            ..Default::default()
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryStore for CountingInventory {
    async fn try_reserve_all(&self, batch: &ReservationBatch) -> Result<(), ReserveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.try_reserve_all(batch).await
    }

    async fn available_count(&self, kind: FigureKind) -> StoreResult<i64> {
        self.inner.available_count(kind).await
    }

    async fn provision(&self, kind: FigureKind, count: i64) -> StoreResult<()> {
        self.inner.provision(kind, count).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// An inventory whose backend is down.
struct DownInventory;

#[async_trait]
impl InventoryStore for DownInventory {
    async fn try_reserve_all(&self, _batch: &ReservationBatch) -> Result<(), ReserveError> {
        Err(StoreError::ConnectionFailed("connection refused".to_string()).into())
    }

    async fn available_count(&self, _kind: FigureKind) -> StoreResult<i64> {
        Err(StoreError::ConnectionFailed("connection refused".to_string()))
    }

    async fn provision(&self, _kind: FigureKind, _count: i64) -> StoreResult<()> {
        Err(StoreError::ConnectionFailed("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// An order store that always fails.
struct DownOrderStore;

#[async_trait]
impl OrderStore for DownOrderStore {
    async fn save(&self, _order: &Order) -> StoreResult<Money> {
        Err(StoreError::QueryFailed("disk I/O error".to_string()))
    }
}

fn circles(count: i64) -> Cart {
    Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, count)])
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_end_to_end_circle_order() {
    let inventory = Arc::new(MemoryInventory::with_stock([(FigureKind::Circle, 5)]));
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default());

    let placed = service.place_order(&circles(3)).await.unwrap();
    assert_eq!(placed.charged, Money::from_cents(848));
    assert_eq!(placed.order.total(), Money::from_cents(848));
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 2);

    let err = service.place_order(&circles(3)).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock {
            kind: FigureKind::Circle,
            requested: 3,
            available: 2
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 2);
    assert_eq!(orders.orders().unwrap().len(), 1);
}

#[tokio::test]
async fn test_batch_reserves_all_or_nothing() {
    let inventory = Arc::new(MemoryInventory::with_stock([
        (FigureKind::Triangle, 10),
        (FigureKind::Square, 1),
    ]));
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default());

    let cart = Cart::new(vec![
        Position::new("Triangle", 3.0, 4.0, 5.0, 2),
        Position::new("Square", 2.0, 2.0, 0.0, 2),
    ]);

    let err = service.place_order(&cart).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock {
            kind: FigureKind::Square,
            ..
        }
    ));
    assert_eq!(inventory.available_count(FigureKind::Triangle).await.unwrap(), 10);
    assert_eq!(inventory.available_count(FigureKind::Square).await.unwrap(), 1);
    assert!(orders.orders().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_kinds_are_reserved_together() {
    let inventory = Arc::new(MemoryInventory::with_stock([(FigureKind::Circle, 4)]));
    let service = OrderService::new(
        inventory.clone(),
        Arc::new(MemoryOrderStore::new()),
        PricingTable::default(),
    );

    // 2 + 3 = 5 circles across two lines; 4 in stock.
    let cart = Cart::new(vec![
        Position::new("Circle", 1.0, 0.0, 0.0, 2),
        Position::new("Circle", 2.0, 0.0, 0.0, 3),
    ]);

    let err = service.place_order(&cart).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock {
            requested: 5,
            available: 4,
            ..
        }
    ));
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 4);
}

#[tokio::test]
async fn test_unknown_kind_never_touches_inventory() {
    let inventory = Arc::new(CountingInventory::with_stock(&[(FigureKind::Circle, 5)]));
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default());

    let cart = Cart::new(vec![
        Position::new("Circle", 1.0, 0.0, 0.0, 1),
        Position::new("Hexagon", 1.0, 1.0, 1.0, 1),
    ]);

    let err = service.place_order(&cart).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::UnknownFigureKind { line: 1, ref raw } if raw.as_deref() == Some("Hexagon")
    ));
    assert!(!err.is_retryable());
    assert_eq!(inventory.calls(), 0);
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 5);
    assert!(orders.orders().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_geometry_reports_first_line() {
    let inventory = Arc::new(CountingInventory::with_stock(&[(FigureKind::Triangle, 5)]));
    let service = OrderService::new(
        inventory.clone(),
        Arc::new(MemoryOrderStore::new()),
        PricingTable::default(),
    );

    let cart = Cart::new(vec![
        Position::new("Triangle", 1.0, 1.0, 3.0, 1),
        Position::new("Square", 2.0, 3.0, 0.0, 1),
    ]);

    let err = service.place_order(&cart).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidGeometry {
            line: 0,
            kind: FigureKind::Triangle,
            ..
        }
    ));
    assert_eq!(err.line(), Some(0));
    assert_eq!(inventory.calls(), 0);
}

#[tokio::test]
async fn test_missing_pricing_rule_aborts_before_inventory() {
    let inventory = Arc::new(CountingInventory::with_stock(&[(FigureKind::Square, 5)]));
    let pricing = PricingTable::with_rules([
        (FigureKind::Triangle, 1.2),
        (FigureKind::Circle, 0.9),
    ])
    .unwrap();
    let service = OrderService::new(inventory.clone(), Arc::new(MemoryOrderStore::new()), pricing);

    let err = service
        .place_order(&Cart::new(vec![Position::new("Square", 2.0, 2.0, 0.0, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::PricingRuleMissing {
            kind: FigureKind::Square,
            line: 0
        }
    ));
    assert!(!err.is_retryable());
    assert_eq!(inventory.calls(), 0);
}

#[tokio::test]
async fn test_quantity_limits() {
    let inventory = Arc::new(CountingInventory::with_stock(&[(FigureKind::Circle, 5000)]));
    let service = OrderService::new(
        inventory.clone(),
        Arc::new(MemoryOrderStore::new()),
        PricingTable::default(),
    );

    assert!(matches!(
        service.place_order(&circles(0)).await,
        Err(OrderError::InvalidQuantity { line: 0, .. })
    ));
    assert!(matches!(
        service.place_order(&circles(1000)).await,
        Err(OrderError::InvalidQuantity { line: 0, .. })
    ));

    let oversized = Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, 1); 101]);
    assert!(matches!(
        service.place_order(&oversized).await,
        Err(OrderError::CartTooLarge { max: 100 })
    ));
    assert_eq!(inventory.calls(), 0);
}

#[tokio::test]
async fn test_inventory_down_is_storage_failure() {
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(Arc::new(DownInventory), orders.clone(), PricingTable::default());

    let err = service.place_order(&circles(1)).await.unwrap_err();
    assert!(matches!(err, OrderError::StorageFailure(StoreError::ConnectionFailed(_))));
    assert!(err.is_retryable());
    assert!(orders.orders().unwrap().is_empty());
}

#[tokio::test]
async fn test_order_store_failure_propagates() {
    let inventory = Arc::new(MemoryInventory::with_stock([(FigureKind::Circle, 5)]));
    let service = OrderService::new(inventory.clone(), Arc::new(DownOrderStore), PricingTable::default());

    let err = service.place_order(&circles(1)).await.unwrap_err();
    assert!(matches!(err, OrderError::StorageFailure(StoreError::QueryFailed(_))));

    // The reservation committed before the save failed; there is no un-reserve.
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 4);
}

#[tokio::test]
async fn test_slow_reservation_times_out() {
    let inventory = Arc::new(
        CountingInventory::with_stock(&[(FigureKind::Circle, 5)]).slow(Duration::from_millis(500)),
    );
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default())
        .with_policy(ReservationPolicy::from_millis(50));

    let err = service.place_order(&circles(1)).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::StorageFailure(StoreError::Timeout { millis: 50 })
    ));

    // The timed-out reservation was dropped before it decremented anything.
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 5);
    assert!(orders.orders().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_caller_still_saves_reserved_order() {
    let inventory = Arc::new(
        CountingInventory::with_stock(&[(FigureKind::Circle, 5)]).slow(Duration::from_millis(100)),
    );
    let orders = Arc::new(MemoryOrderStore::new());
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default());

    // The caller gives up while the reservation is still in flight.
    let cart = circles(2);
    let outcome = tokio::time::timeout(Duration::from_millis(20), service.place_order(&cart)).await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 3);
    let saved = orders.orders().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].figures()[0].count(), 2);
}

#[tokio::test]
async fn test_unused_nan_side_persists_to_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let inventory = Arc::new(db.inventory());
    let orders = Arc::new(db.orders());
    inventory.provision(FigureKind::Circle, 5).await.unwrap();
    let service = OrderService::new(inventory.clone(), orders.clone(), PricingTable::default());

    // A circle never reads side B; NaN there must not reach the NOT NULL column.
    let cart = Cart::new(vec![Position::new("Circle", 1.0, f64::NAN, 0.0, 3)]);
    let placed = service.place_order(&cart).await.unwrap();

    assert_eq!(placed.charged, Money::from_cents(848));
    assert_eq!(inventory.available_count(FigureKind::Circle).await.unwrap(), 2);
    assert_eq!(orders.count().await.unwrap(), 1);

    let figures = orders.get_figures(placed.id()).await.unwrap();
    assert_eq!(figures.len(), 1);
    assert_eq!(figures[0].side_a, 1.0);
    assert_eq!(figures[0].side_b, 0.0);
    assert_eq!(figures[0].side_c, 0.0);
}
