//! Runtime configuration built from the validated file configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tixpay_core::checkout::CheckoutSettings;
use tixpay_sdk::objects::{Event, EventSummary};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub session_idle: Duration,
}

/// Events offered by the storefront, featured ones first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new(mut events: Vec<Event>) -> Self {
        // stable sort keeps file order within each group
        events.sort_by_key(|event| !event.featured);
        Self { events }
    }

    pub fn get(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == event_id)
    }

    pub fn summaries(&self) -> Vec<EventSummary> {
        self.events.iter().map(EventSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// The reloadable part of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub catalog: Catalog,
    pub checkout: CheckoutSettings,
}
