//! Configuration module for tixpay-server.
//!
//! Handles loading configuration from the TOML file and CLI arguments,
//! validating the event catalog and building the runtime configuration.

pub mod file;
pub mod runtime;

use crate::config::file::{CheckoutConfig, FileConfig};
use crate::config::runtime::{Catalog, RuntimeConfig, ServerConfig, StorageConfig};
use crate::session::DEFAULT_SESSION_IDLE;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tixpay_core::checkout::CheckoutSettings;
use tixpay_core::validation::is_ethereum_address;
use tixpay_sdk::objects::{Event, KEY_SEPARATOR};

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub runtime: RuntimeConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    data_dir_override: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        data_dir_override: Option<PathBuf>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            data_dir_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// A missing file runs the demo on defaults with an empty catalog.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        // Apply CLI overrides
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(data_dir) = &self.data_dir_override {
            file_config.storage.data_dir = Some(data_dir.clone());
        }

        validate(&file_config)?;

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            storage: StorageConfig {
                data_dir: file_config.storage.data_dir,
                session_idle: file_config
                    .storage
                    .session_idle_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_SESSION_IDLE),
            },
            runtime: RuntimeConfig {
                catalog: Catalog::new(file_config.events),
                checkout: convert_checkout(file_config.checkout),
            },
        })
    }

    /// Reload the configuration (used during SIGHUP).
    ///
    /// Only the catalog and checkout settings are applied to a running
    /// server; listen address and storage stay as started.
    pub fn reload(&self) -> Result<RuntimeConfig, ConfigError> {
        self.load().map(|loaded| loaded.runtime)
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let mut event_ids = HashSet::new();
    for event in &config.events {
        validate_event(event)?;
        if !event_ids.insert(event.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate event id {}",
                event.id
            )));
        }
    }

    if config.storage.session_idle_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "storage session_idle_secs must be greater than 0".to_string(),
        ));
    }

    let checkout = &config.checkout;
    if let Some(address) = &checkout.seller_address
        && !is_ethereum_address(address)
    {
        return Err(ConfigError::ValidationError(format!(
            "checkout seller_address {address} is not an Ethereum address"
        )));
    }
    if checkout
        .supported_currencies
        .as_ref()
        .is_some_and(Vec::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "checkout supported_currencies must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_event(event: &Event) -> Result<(), ConfigError> {
    if event.id.is_empty() || event.id.contains(KEY_SEPARATOR) {
        return Err(ConfigError::ValidationError(format!(
            "event id {:?} must be non-empty and must not contain {KEY_SEPARATOR:?}",
            event.id
        )));
    }
    let mut tier_ids = HashSet::new();
    for tier in &event.ticket_tiers {
        if tier.id.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "event {} has a ticket tier without id",
                event.id
            )));
        }
        if !tier_ids.insert(tier.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "event {} has duplicate ticket tier {}",
                event.id, tier.id
            )));
        }
        if tier.price.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "ticket tier {}-{} has a negative price",
                event.id, tier.id
            )));
        }
        if tier.price.checked_mul(Decimal::from(tier.available)).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "ticket tier {}-{} price times availability overflows",
                event.id, tier.id
            )));
        }
    }
    Ok(())
}

fn convert_checkout(c: CheckoutConfig) -> CheckoutSettings {
    let defaults = CheckoutSettings::default();
    CheckoutSettings {
        seller_address: c.seller_address.unwrap_or(defaults.seller_address),
        supported_currencies: c
            .supported_currencies
            .map(|currencies| currencies.into_iter().collect())
            .unwrap_or(defaults.supported_currencies),
        builder_id: c.builder_id.or(defaults.builder_id),
        redirect_to: c.redirect_to.unwrap_or(defaults.redirect_to),
        redirect_delay: c
            .redirect_delay_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.redirect_delay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> FileConfig {
        toml::from_str(toml_str).unwrap()
    }

    const EVENT: &str = r#"
image = "/a.jpg"
headerImage = "/b.jpg"
type = "Concert"
dateTime = "2025-06-01T18:00:00Z"
endDateTime = "2025-06-01T23:00:00Z"
startingPrice = 10
location = { venue = "V", address = "A", city = "C", country = "X", coordinates = { lat = 0.0, lng = 0.0 } }
organizer = { name = "O", logo = "/o.png", description = "" }
"#;

    fn event_block(id: &str, tiers: &[&str]) -> String {
        let mut block = format!("[[events]]\nid = \"{id}\"\nname = \"{id}\"\n{EVENT}");
        for tier in tiers {
            block.push_str(&format!(
                "[[events.ticketTiers]]\nid = \"{tier}\"\nname = \"{tier}\"\nprice = 10\navailable = 5\n"
            ));
        }
        block
    }

    #[test]
    fn test_valid_catalog() {
        let config = parse(&format!(
            "{}\n{}",
            event_block("evt1", &["ga", "vip"]),
            event_block("evt2", &["early-bird"])
        ));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_duplicate_event_id() {
        let config = parse(&format!(
            "{}\n{}",
            event_block("evt1", &["ga"]),
            event_block("evt1", &["vip"])
        ));
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate event id evt1"));
    }

    #[test]
    fn test_duplicate_tier_id() {
        let config = parse(&event_block("evt1", &["ga", "ga"]));
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate ticket tier ga"));
    }

    #[test]
    fn test_event_id_with_separator() {
        let config = parse(&event_block("summer-fest", &["ga"]));
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_seller_address() {
        let config = parse("[checkout]\nseller_address = \"0x1234\"\n");
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_checkout_defaults_and_overrides() {
        let settings = convert_checkout(parse("").checkout);
        assert_eq!(settings, CheckoutSettings::default());

        let settings = convert_checkout(
            parse("[checkout]\nredirect_to = \"/thanks\"\nredirect_delay_secs = 2\n").checkout,
        );
        assert_eq!(settings.redirect_to, "/thanks");
        assert_eq!(settings.redirect_delay, Duration::from_secs(2));
        assert_eq!(
            settings.seller_address,
            CheckoutSettings::default().seller_address
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loader = ConfigLoader::new(
            "/nonexistent/tixpay.toml",
            Some(SocketAddr::from(([127, 0, 0, 1], 9000))),
            Some(PathBuf::from("/tmp/carts")),
        );
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.server.listen.port(), 9000);
        assert_eq!(loaded.storage.data_dir, Some(PathBuf::from("/tmp/carts")));
        assert_eq!(loaded.storage.session_idle, DEFAULT_SESSION_IDLE);
        assert_eq!(loaded.runtime.catalog.len(), 0);
    }

    #[test]
    fn test_tier_value_overflow_rejected() {
        let mut config = parse(&event_block("evt1", &["ga"]));
        config.events[0].ticket_tiers[0].price = Decimal::MAX;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("evt1-ga price times availability overflows"));

        config.events[0].ticket_tiers[0].available = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_session_idle_rejected() {
        let config = parse("[storage]\nsession_idle_secs = 0\n");
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(validate(&parse("[storage]\nsession_idle_secs = 60\n")).is_ok());
    }
}
