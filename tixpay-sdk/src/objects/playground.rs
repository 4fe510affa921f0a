//! Playground report types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::widget::PaymentWidgetProps;

/// Field path to message, one message per failing field.
///
/// Paths are dotted (`sellerInfo.name`); list entries use their index
/// (`supportedCurrencies.2`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `path` unless the field already has one.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Result of validating one playground draft.
///
/// `preview` and `integration_code` are produced even when the draft is
/// invalid, mirroring the live preview next to the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundReport {
    pub valid: bool,
    pub errors: ValidationErrors,
    pub preview: PaymentWidgetProps,
    pub integration_code: String,
}
