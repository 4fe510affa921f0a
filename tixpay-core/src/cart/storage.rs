//! Persistence adapters for the cart.
//!
//! The cart is stored as a single snapshot under [`STORAGE_NAME`]:
//!
//! ```text
//! {"state":{"tickets":{"evt1-ga":{"id":"evt1-ga","name":"GA","price":"25","quantity":2}}},"version":0}
//! ```
//!
//! The snapshot is read once when a [`CartStore`](super::CartStore) is opened
//! and rewritten after every mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tixpay_sdk::objects::{CartKey, CartLineItem};

/// Name of the storage slot holding the cart snapshot.
pub const STORAGE_NAME: &str = "ticket-storage";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 0;

/// The cart contents, keyed by composite key.
pub type Tickets = BTreeMap<CartKey, CartLineItem>;

/// Errors produced by a [`CartStorage`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access cart storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed cart snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("cart storage unavailable")]
    Unavailable,
}

#[derive(Debug, Deserialize)]
struct CartSnapshot {
    state: SnapshotState,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct SnapshotState {
    tickets: Tickets,
}

/// Serialize `tickets` into the snapshot format.
pub fn encode_snapshot(tickets: &Tickets) -> Result<String, StorageError> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        state: StateRef<'a>,
        version: u32,
    }
    #[derive(Serialize)]
    struct StateRef<'a> {
        tickets: &'a Tickets,
    }

    let json = serde_json::to_string(&SnapshotRef {
        state: StateRef { tickets },
        version: SNAPSHOT_VERSION,
    })?;
    Ok(json)
}

/// Parse a snapshot produced by [`encode_snapshot`].
///
/// Line ids are re-derived from their map key.
pub fn decode_snapshot(json: &str) -> Result<Tickets, StorageError> {
    let snapshot: CartSnapshot = serde_json::from_str(json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion(snapshot.version));
    }
    let mut tickets = snapshot.state.tickets;
    for (key, line) in tickets.iter_mut() {
        if line.id != *key {
            line.id = key.clone();
        }
    }
    Ok(tickets)
}

/// A durable slot holding the cart snapshot.
///
/// Calls are synchronous: the cart is mutated from a single thread of
/// execution in response to discrete user actions.
pub trait CartStorage {
    /// Human-readable location used in log messages.
    fn name(&self) -> String;

    /// Read the stored cart. `Ok(None)` when nothing was stored yet.
    fn load(&self) -> Result<Option<Tickets>, StorageError>;

    /// Replace the stored cart.
    fn save(&self, tickets: &Tickets) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn load(&self) -> Result<Option<Tickets>, StorageError> {
        (**self).load()
    }

    fn save(&self, tickets: &Tickets) -> Result<(), StorageError> {
        (**self).save(tickets)
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process storage slot.
///
/// Clones share the same slot, so a test can hand one clone to a store and
/// inspect or reopen through another. The snapshot is kept serialized to
/// exercise the same encoding as the file backend.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
    available: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            slot: Arc::default(),
            available: true,
        }
    }

    /// A slot whose every access fails, as when storage is disabled.
    pub fn unavailable() -> Self {
        Self {
            slot: Arc::default(),
            available: false,
        }
    }

    /// Raw snapshot currently stored, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Overwrite the raw snapshot.
    pub fn set_raw(&self, json: impl Into<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(json.into());
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStorage for MemoryStorage {
    fn name(&self) -> String {
        format!("memory:{STORAGE_NAME}")
    }

    fn load(&self) -> Result<Option<Tickets>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        let slot = self.slot.lock().map_err(|_| StorageError::Unavailable)?;
        slot.as_deref().map(decode_snapshot).transpose()
    }

    fn save(&self, tickets: &Tickets) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        let json = encode_snapshot(tickets)?;
        let mut slot = self.slot.lock().map_err(|_| StorageError::Unavailable)?;
        *slot = Some(json);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStorage
// ---------------------------------------------------------------------------

/// Snapshot stored as `ticket-storage.json` inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage file inside `dir`. The directory is created on first save.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_NAME}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<Tickets>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => decode_snapshot(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tickets: &Tickets) -> Result<(), StorageError> {
        let json = encode_snapshot(tickets)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write atomically: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
