//! # Order Service
//!
//! ## place_order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller task                                                            │
//! │    1. quote(cart, pricing)        pure: validate + price, fail fast     │
//! │    2. Order::new(figures, total)                                        │
//! │    3. spawn ─────────────────────────────┐                              │
//! │                                          ▼                              │
//! │                              detached order task                        │
//! │                                4. try_reserve_all(batch)  (timeout)     │
//! │                                5. orders.save(order)                    │
//! │    6. await task ◄───────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the caller is dropped while awaiting step 6, the order task keeps
//! running: a reservation that committed is always followed by its save.
//!
//! ## Reservation timeout
//! The deadline in step 4 drops the `try_reserve_all` future. The in-memory
//! store has no await point inside a batch, so a timed-out reservation there
//! never happened. SQLite and Redis are not that tight: a COMMIT already
//! handed to the sqlx worker, or a script already sent to Redis, can still
//! land after the deadline. For those backends `Timeout` means the outcome
//! is unknown, and stock may stay reserved with no order saved.

use std::sync::Arc;
use std::time::Duration;

use figures_core::{quote, Cart, Money, Order, PricingTable, ReservationBatch};
use figures_store::{InventoryStore, OrderStore, StoreError};
use tracing::{debug, error, info, instrument, warn, Instrument, Span};
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};

/// Default bound on a single reservation.
pub const DEFAULT_RESERVATION_TIMEOUT: Duration = Duration::from_millis(2000);

/// How long a reservation may take before it counts as a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    pub timeout: Duration,
}

impl ReservationPolicy {
    pub fn from_millis(millis: u64) -> Self {
        ReservationPolicy {
            timeout: Duration::from_millis(millis),
        }
    }
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        ReservationPolicy {
            timeout: DEFAULT_RESERVATION_TIMEOUT,
        }
    }
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,

    /// Amount the order store recorded.
    pub charged: Money,
}

impl PlacedOrder {
    pub fn id(&self) -> Uuid {
        self.order.id()
    }
}

/// Places orders against shared inventory.
///
/// Cheap to clone; clones share the same stores and pricing table.
#[derive(Clone)]
pub struct OrderService {
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore>,
    pricing: Arc<PricingTable>,
    policy: ReservationPolicy,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("pricing", &self.pricing)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    /// Creates a service with the default reservation policy.
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        orders: Arc<dyn OrderStore>,
        pricing: PricingTable,
    ) -> Self {
        let missing = pricing.missing_kinds();
        if !missing.is_empty() {
            // Orders for these kinds will fail with PricingRuleMissing.
            error!(?missing, "Pricing table has no rule for some figure kinds");
        }

        OrderService {
            inventory,
            orders,
            pricing: Arc::new(pricing),
            policy: ReservationPolicy::default(),
        }
    }

    /// Replaces the reservation policy.
    pub fn with_policy(mut self, policy: ReservationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn inventory(&self) -> &Arc<dyn InventoryStore> {
        &self.inventory
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Validates, prices, reserves and saves one cart.
    ///
    /// ## Errors
    /// - Cart, geometry and pricing errors: nothing touched inventory
    /// - `InsufficientStock`: nothing was reserved
    /// - `StorageFailure`: a store failed or the reservation timed out
    #[instrument(skip_all, fields(lines = cart.len(), order_id = tracing::field::Empty))]
    pub async fn place_order(&self, cart: &Cart) -> OrderResult<PlacedOrder> {
        let quote = quote::quote(cart, &self.pricing).map_err(|err| {
            let err = OrderError::from(err);
            match &err {
                OrderError::PricingRuleMissing { kind, line } => {
                    error!(%kind, line, "No pricing rule for validated figure");
                }
                other => debug!(error = %other, "Rejected cart"),
            }
            err
        })?;

        let order = Order::new(quote.figures, quote.total);
        Span::current().record("order_id", tracing::field::display(order.id()));

        let task = tokio::spawn(
            reserve_and_save(
                Arc::clone(&self.inventory),
                Arc::clone(&self.orders),
                self.policy,
                quote.batch,
                order,
            )
            .instrument(Span::current()),
        );

        let placed = task.await.map_err(|err| {
            error!(error = %err, "Order task did not complete");
            OrderError::StorageFailure(StoreError::Internal(format!(
                "order task failed: {err}"
            )))
        })??;

        info!(
            total = %placed.order.total(),
            charged = %placed.charged,
            "Order placed"
        );

        Ok(placed)
    }
}

/// Steps 4 and 5. Runs on its own task.
async fn reserve_and_save(
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore>,
    policy: ReservationPolicy,
    batch: ReservationBatch,
    order: Order,
) -> OrderResult<PlacedOrder> {
    match tokio::time::timeout(policy.timeout, inventory.try_reserve_all(&batch)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            let err = OrderError::from(err);
            match &err {
                OrderError::InsufficientStock {
                    kind,
                    requested,
                    available,
                } => warn!(%kind, requested, available, "Reservation rejected"),
                other => warn!(error = %other, "Reservation failed"),
            }
            return Err(err);
        }
        Err(_) => {
            let millis = u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(timeout_ms = millis, "Reservation timed out");
            return Err(OrderError::StorageFailure(StoreError::Timeout { millis }));
        }
    }

    let charged = orders.save(&order).await.map_err(|err| {
        // Stock is already reserved for this order; there is no un-reserve.
        error!(error = %err, "Saving a reserved order failed");
        OrderError::StorageFailure(err)
    })?;

    Ok(PlacedOrder { order, charged })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use figures_core::{FigureKind, Position};
    use figures_store::{MemoryInventory, MemoryOrderStore};

    fn service(stock: &[(FigureKind, i64)]) -> (OrderService, Arc<MemoryInventory>, Arc<MemoryOrderStore>) {
        let inventory = Arc::new(MemoryInventory::with_stock(stock.iter().copied()));
        let orders = Arc::new(MemoryOrderStore::new());
        let service = OrderService::new(
            inventory.clone(),
            orders.clone(),
            PricingTable::default(),
        );
        (service, inventory, orders)
    }

    #[tokio::test]
    async fn test_place_order_charges_rounded_total() {
        let (service, _, orders) = service(&[(FigureKind::Circle, 5)]);
        let cart = Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, 3)]);

        let placed = service.place_order(&cart).await.unwrap();

        assert_eq!(placed.charged.cents(), 848);
        assert_eq!(placed.order.figures().len(), 1);
        assert_eq!(orders.orders().unwrap()[0].id(), placed.id());
    }

    #[tokio::test]
    async fn test_invalid_cart_never_saves() {
        let (service, _, orders) = service(&[(FigureKind::Circle, 5)]);

        let err = service.place_order(&Cart::default()).await.unwrap_err();
        assert!(matches!(err, OrderError::EmptyCart));
        assert!(orders.orders().unwrap().is_empty());
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(ReservationPolicy::default().timeout, Duration::from_secs(2));
        assert_eq!(ReservationPolicy::from_millis(250).timeout, Duration::from_millis(250));
    }
}
