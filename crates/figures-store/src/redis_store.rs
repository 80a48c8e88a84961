//! # Redis Inventory
//!
//! Shared counters for deployments with more than one API instance.
//!
//! ## Layout
//! One integer key per kind: `<prefix><Kind>`, e.g. `figures:stock:Circle`.
//! A missing key counts as 0.
//!
//! ## Batch Reservation
//! ```text
//! EVALSHA reserve  KEYS = [k1, k2, ...]  ARGV = [n1, n2, ...]
//!
//!   for i: if GET(k_i) < n_i  → return {i, available}   (nothing written)
//!   for i: DECRBY k_i n_i
//!   return {0, 0}
//! ```
//! Redis runs a script without interleaving other commands, so the check
//! and the decrements form one atomic step across every key in the batch.

use async_trait::async_trait;
use figures_core::{FigureKind, ReservationBatch};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use tracing::{debug, info};

use crate::error::{ReserveError, StoreError, StoreResult};
use crate::store::InventoryStore;

/// Default key prefix for inventory counters.
pub const DEFAULT_KEY_PREFIX: &str = "figures:stock:";

const RESERVE_SCRIPT: &str = r#"
for i, key in ipairs(KEYS) do
    local available = tonumber(redis.call('GET', key) or '0')
    if available < tonumber(ARGV[i]) then
        return {i, available}
    end
end
for i, key in ipairs(KEYS) do
    redis.call('DECRBY', key, ARGV[i])
end
return {0, 0}
"#;

/// Inventory held in Redis.
#[derive(Clone)]
pub struct RedisInventory {
    conn: ConnectionManager,
    prefix: String,
    reserve: Script,
}

impl std::fmt::Debug for RedisInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisInventory")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl RedisInventory {
    /// Connects to Redis. The connection manager reconnects on its own
    /// after transient failures.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        let prefix = prefix.into();

        info!(prefix = %prefix, "Connected to Redis inventory");

        Ok(RedisInventory {
            conn,
            prefix,
            reserve: Script::new(RESERVE_SCRIPT),
        })
    }

    fn key(&self, kind: FigureKind) -> String {
        format!("{}{}", self.prefix, kind.as_str())
    }
}

#[async_trait]
impl InventoryStore for RedisInventory {
    async fn try_reserve_all(&self, batch: &ReservationBatch) -> Result<(), ReserveError> {
        let mut invocation = self.reserve.prepare_invoke();
        for entry in batch.iter() {
            invocation.key(self.key(entry.kind)).arg(entry.count);
        }

        let mut conn = self.conn.clone();
        let reply: Vec<i64> = invocation.invoke_async(&mut conn).await?;

        match reply.as_slice() {
            [0, _] => {
                debug!(kinds = batch.len(), "Reserved batch in Redis");
                Ok(())
            }
            [index, available] => {
                // Lua indices are 1-based.
                let entry = usize::try_from(*index - 1)
                    .ok()
                    .and_then(|i| batch.entries().get(i))
                    .ok_or_else(|| {
                        StoreError::Backend(format!("reservation script returned index {index}"))
                    })?;

                Err(ReserveError::InsufficientStock {
                    kind: entry.kind,
                    requested: entry.count,
                    available: *available,
                })
            }
            other => Err(StoreError::Backend(format!(
                "unexpected reservation script reply: {other:?}"
            ))
            .into()),
        }
    }

    async fn available_count(&self, kind: FigureKind) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let available: Option<i64> = conn.get(self.key(kind)).await?;
        Ok(available.unwrap_or(0))
    }

    async fn provision(&self, kind: FigureKind, count: i64) -> StoreResult<()> {
        if count < 0 {
            return Err(StoreError::InvalidStock { kind, count });
        }

        let mut conn = self.conn.clone();
        let _: () = conn.set(self.key(kind), count).await?;

        debug!(kind = %kind, count, "Provisioned inventory");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}
