//! Application state shared across all request handlers.

use crate::config::runtime::RuntimeConfig;
use crate::session::SessionRegistry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Catalog and checkout settings (can be reloaded via SIGHUP).
    pub config: Arc<RwLock<RuntimeConfig>>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: RuntimeConfig, sessions: SessionRegistry) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            sessions,
        }
    }

    /// Get a read lock on the configuration.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, RuntimeConfig> {
        self.config.read().await
    }

    /// Replace the configuration (used during SIGHUP reload).
    pub async fn update_config(&self, new_config: RuntimeConfig) {
        let mut config = self.config.write().await;
        *config = new_config;
    }
}
