//! Cart line items and their composite keys.

use compact_str::{CompactString, format_compact};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::num::NonZeroU32;

/// Joins the scope (event) id and the tier id inside a [`CartKey`].
pub const KEY_SEPARATOR: char = '-';

/// Composite cart key: `{scope}-{tier}`.
///
/// The scope is everything before the first separator, so scope ids must not
/// contain `-` while tier ids may.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(CompactString);

impl CartKey {
    pub fn new(scope: &str, tier: &str) -> Self {
        Self(format_compact!("{scope}{KEY_SEPARATOR}{tier}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent scope id, the substring before the first separator.
    ///
    /// A key without separator is its own scope.
    pub fn scope(&self) -> &str {
        self.0
            .split_once(KEY_SEPARATOR)
            .map_or(self.0.as_str(), |(scope, _)| scope)
    }

    /// Tier id, the substring after the first separator.
    pub fn tier(&self) -> Option<&str> {
        self.0.split_once(KEY_SEPARATOR).map(|(_, tier)| tier)
    }

    /// Whether this key was built for `scope`.
    ///
    /// Compares against `"{scope}-"` so that `evt1` does not claim `evt10-*`.
    pub fn belongs_to(&self, scope: &str) -> bool {
        self.0
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR))
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CartKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CartKey {
    fn from(value: &str) -> Self {
        Self(CompactString::from(value))
    }
}

impl From<String> for CartKey {
    fn from(value: String) -> Self {
        Self(CompactString::from(value))
    }
}

/// One selected tier in the cart.
///
/// `name` and `price` are copied when the line is first created and are not
/// refreshed afterwards. `quantity` is never zero; such a line is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: CartKey,
    pub name: String,
    pub price: Decimal,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// `price * quantity`, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_scope_and_tier() {
        let key = CartKey::new("evt1", "tierA");
        assert_eq!(key.as_str(), "evt1-tierA");
        assert_eq!(key.scope(), "evt1");
        assert_eq!(key.tier(), Some("tierA"));

        let key = CartKey::new("evt1", "early-bird");
        assert_eq!(key.scope(), "evt1");
        assert_eq!(key.tier(), Some("early-bird"));
    }

    #[test]
    fn test_key_without_separator() {
        let key = CartKey::from("orphan");
        assert_eq!(key.scope(), "orphan");
        assert_eq!(key.tier(), None);
    }

    #[test]
    fn test_belongs_to_requires_separator() {
        let key = CartKey::new("evt10", "vip");
        assert!(key.belongs_to("evt10"));
        assert!(!key.belongs_to("evt1"));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let json = r#"{"id":"evt1-ga","name":"GA","price":"25","quantity":0}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_line_total() {
        let line = CartLineItem {
            id: CartKey::new("evt1", "ga"),
            name: "GA".to_string(),
            price: Decimal::new(1250, 2),
            quantity: NonZeroU32::new(3).unwrap(),
        };
        assert_eq!(line.line_total(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_line_total_saturates() {
        let line = CartLineItem {
            id: CartKey::new("evt1", "ga"),
            name: "GA".to_string(),
            price: Decimal::MAX,
            quantity: NonZeroU32::new(2).unwrap(),
        };
        assert_eq!(line.line_total(), Decimal::MAX);
    }
}
