//! TOML file configuration structures.
//!
//! These structs directly map to the `tixpay.toml` file format. Every
//! section is optional; an empty file runs the demo with no events.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tixpay_sdk::objects::{CurrencyId, Event};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Cart persistence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one cart snapshot per session. Carts live in
    /// memory only when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Seconds without a request after which a session is dropped from
    /// memory. Its snapshot on disk is kept.
    #[serde(default)]
    pub session_idle_secs: Option<u64>,
}

/// Checkout widget parameters. Unset fields keep the demo defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutConfig {
    pub seller_address: Option<String>,
    pub supported_currencies: Option<Vec<CurrencyId>>,
    pub builder_id: Option<String>,
    pub redirect_to: Option<String>,
    pub redirect_delay_secs: Option<u64>,
}
