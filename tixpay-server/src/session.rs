//! Per-visitor session state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tixpay_core::cart::{CartStorage, CartStore, JsonFileStorage, MemoryStorage};
use tixpay_core::checkout::{CheckoutStepper, ScheduledRedirect};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

/// Sessions untouched for this long are dropped from memory.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

pub type SessionCart = CartStore<Box<dyn CartStorage + Send + Sync>>;

/// Cart and checkout progress of one visitor.
pub struct Session {
    pub cart: SessionCart,
    pub stepper: CheckoutStepper,
    /// Post-payment redirect; dropping the session cancels it.
    pub redirect: Option<ScheduledRedirect>,
}

impl Session {
    fn new(cart: SessionCart) -> Self {
        Self {
            cart,
            stepper: CheckoutStepper::new(),
            redirect: None,
        }
    }
}

struct SessionSlot {
    session: Arc<Mutex<Session>>,
    /// Milliseconds since the registry was created.
    last_access: AtomicU64,
}

/// Sessions with recent activity.
///
/// With a data directory every session keeps its cart snapshot under
/// `{data_dir}/{session_id}/`, so a restart or an eviction restores it on
/// next access.
#[derive(Clone)]
pub struct SessionRegistry {
    data_dir: Option<PathBuf>,
    idle_timeout: Duration,
    epoch: Instant,
    sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

impl SessionRegistry {
    pub fn new(data_dir: Option<PathBuf>, idle_timeout: Duration) -> Self {
        Self {
            data_dir,
            idle_timeout,
            epoch: Instant::now(),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Session for `id`, opened from storage on first access.
    pub async fn get_or_open(&self, id: Uuid) -> Arc<Mutex<Session>> {
        if let Some(session) = self.get(id).await {
            return session;
        }

        let now = self.now_ms();
        let mut sessions = self.sessions.write().await;
        // another request may have opened it while we waited for the lock
        let slot = sessions.entry(id).or_insert_with(|| {
            tracing::debug!(session_id = %id, "Opening session");
            SessionSlot {
                session: Arc::new(Mutex::new(Session::new(self.open_cart(id)))),
                last_access: AtomicU64::new(now),
            }
        });
        slot.last_access.store(now, Ordering::Relaxed);
        slot.session.clone()
    }

    /// Session for `id` if it is currently held in memory.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        let slot = sessions.get(&id)?;
        slot.last_access.store(self.now_ms(), Ordering::Relaxed);
        Some(slot.session.clone())
    }

    /// Run `f` on the session for `id` without registering it.
    ///
    /// A session not held in memory is loaded from storage for the call only,
    /// so read-only requests never grow the registry.
    pub async fn view<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> R {
        if let Some(session) = self.get(id).await {
            let session = session.lock().await;
            return f(&session);
        }
        f(&Session::new(self.open_cart(id)))
    }

    fn open_cart(&self, id: Uuid) -> SessionCart {
        let storage: Box<dyn CartStorage + Send + Sync> = match &self.data_dir {
            Some(dir) => Box::new(JsonFileStorage::in_dir(dir.join(id.to_string()))),
            None => Box::new(MemoryStorage::new()),
        };
        CartStore::open(storage)
    }

    /// Drop every session idle for at least the idle timeout. Sessions a
    /// request is still holding are kept. Returns how many were dropped.
    pub async fn sweep(&self) -> usize {
        let now = self.now_ms();
        let idle_ms = u64::try_from(self.idle_timeout.as_millis()).unwrap_or(u64::MAX);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let idle = now.saturating_sub(slot.last_access.load(Ordering::Relaxed));
            let keep = idle < idle_ms || Arc::strong_count(&slot.session) > 1;
            if !keep {
                tracing::debug!(session_id = %id, idle_secs = idle / 1000, "Evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
