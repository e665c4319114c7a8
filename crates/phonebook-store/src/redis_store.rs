//! Redis-backed key-value store.
//!
//! One [`RedisStore`] owns one multiplexed, auto-reconnecting connection
//! ([`ConnectionManager`]) shared by every clone of the handle. The
//! connection is attempted once at startup via [`RedisStore::connect`]; if
//! Redis is down at that point the next command retries it. Callers that
//! arrive while an attempt is in flight await that same attempt instead of
//! queueing behind it. After [`RedisStore::close`] every command fails as
//! unavailable.
//!
//! # Commands
//!
//! ```text
//! get            → GET key
//! set_if_absent  → SET key value NX    (+OK | nil)
//! set_if_present → SET key value XX    (+OK | nil)
//! delete         → DEL key             (:1 | :0)
//! ping           → PING                (+PONG)
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, ExistenceCheck, SetOptions};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Reconnect attempts per connection establishment before giving up.
const CONNECT_RETRIES: usize = 1;

/// Expected PING reply.
const PONG: &str = "PONG";

/// One connection attempt, awaited by every caller that needs it.
type ConnectAttempt = Shared<BoxFuture<'static, StoreResult<ConnectionManager>>>;

enum Slot {
    /// Not connected yet, or the last attempt failed.
    Idle,
    Connecting(ConnectAttempt),
    Connected(ConnectionManager),
    /// Released by [`RedisStore::close`].
    Closed,
}

struct Inner {
    client: Client,
    slot: Mutex<Slot>,
}

/// Shared Redis handle. Cloning is cheap and all clones use one connection.
#[derive(Clone)]
pub struct RedisStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("addr", &self.inner.client.get_connection_info().addr)
            .finish()
    }
}

fn closed() -> StoreError {
    StoreError::Unavailable("redis connection closed".to_string())
}

impl RedisStore {
    /// Build a handle for the configured server. Performs no I/O; only an
    /// invalid host/port/db combination fails here.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::open(config.url().as_str())
            .map_err(|e| StoreError::Command(format!("invalid redis configuration: {e}")))?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                slot: Mutex::new(Slot::Idle),
            }),
        })
    }

    /// Establish the shared connection now rather than on first use.
    pub async fn connect(&self) -> StoreResult<()> {
        self.connection().await.map(|_| ())
    }

    /// Release the shared connection. Idempotent; later commands fail with
    /// [`StoreError::Unavailable`].
    pub async fn close(&self) {
        let mut slot = self.slot();
        if !matches!(*slot, Slot::Closed) {
            *slot = Slot::Closed;
            info!("redis connection closed");
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        // Every transition is a single assignment, so a poisoned slot is still valid.
        self.inner.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start_attempt(&self) -> ConnectAttempt {
        let client = self.inner.client.clone();
        async move {
            let config = ConnectionManagerConfig::new().set_number_of_retries(CONNECT_RETRIES);
            let conn = ConnectionManager::new_with_config(client, config).await?;
            debug!("redis connection established");
            Ok::<_, StoreError>(conn)
        }
        .boxed()
        .shared()
    }

    async fn connection(&self) -> StoreResult<ConnectionManager> {
        // The slot lock is never held across an await.
        let attempt = {
            let mut slot = self.slot();
            match &*slot {
                Slot::Connected(conn) => return Ok(conn.clone()),
                Slot::Closed => return Err(closed()),
                Slot::Connecting(attempt) => attempt.clone(),
                Slot::Idle => {
                    let attempt = self.start_attempt();
                    *slot = Slot::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        let mut slot = self.slot();
        let current = matches!(&*slot, Slot::Connecting(pending) if pending.ptr_eq(&attempt));
        match result {
            _ if matches!(*slot, Slot::Closed) => Err(closed()),
            Ok(conn) => {
                if current {
                    *slot = Slot::Connected(conn.clone());
                }
                Ok(conn)
            }
            Err(e) => {
                if current {
                    *slot = Slot::Idle;
                }
                Err(e)
            }
        }
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        debug!(%key, found = value.is_some(), "GET");
        Ok(value)
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let options = SetOptions::default().conditional_set(ExistenceCheck::NX);
        let reply: Option<String> = conn.set_options(key, value, options).await?;
        debug!(%key, applied = reply.is_some(), "SET NX");
        Ok(reply.is_some())
    }

    async fn set_if_present(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let options = SetOptions::default().conditional_set(ExistenceCheck::XX);
        let reply: Option<String> = conn.set_options(key, value, options).await?;
        debug!(%key, applied = reply.is_some(), "SET XX");
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(key).await?;
        debug!(%key, removed, "DEL");
        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply == PONG {
            Ok(())
        } else {
            Err(StoreError::Command(format!("unexpected PING reply: {reply}")))
        }
    }
}
