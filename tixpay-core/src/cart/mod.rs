//! Session-scoped ticket cart.
//!
//! [`CartStore`] owns the selected line items and writes a snapshot to its
//! [`CartStorage`] after every mutation. Mutations never fail: a storage
//! error is logged and the store keeps working in memory only.

mod storage;

pub use storage::{
    CartStorage, JsonFileStorage, MemoryStorage, SNAPSHOT_VERSION, STORAGE_NAME, StorageError,
    Tickets, decode_snapshot, encode_snapshot,
};

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::num::NonZeroU32;
use tixpay_sdk::objects::{CartKey, CartLineItem, TicketTier};
use tracing::{debug, warn};

/// Outcome of [`CartStore::decrement_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line is still in the cart with this quantity.
    Decreased(NonZeroU32),
    /// The line held a single ticket and was removed.
    Removed,
    /// No line exists for the key; nothing changed.
    Missing,
}

/// Cart state with injected persistence.
pub struct CartStore<S> {
    tickets: Tickets,
    /// `None` once the backend failed and the store went memory-only.
    storage: Option<S>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart stored in `storage`.
    ///
    /// A missing snapshot gives an empty cart. So does an unreadable one,
    /// after logging the failure.
    pub fn open(storage: S) -> Self {
        let tickets = match storage.load() {
            Ok(Some(tickets)) => {
                debug!(
                    storage = %storage.name(),
                    lines = tickets.len(),
                    "Restored cart snapshot"
                );
                tickets
            }
            Ok(None) => Tickets::new(),
            Err(e) => {
                warn!(
                    storage = %storage.name(),
                    error = %e,
                    "Failed to load cart snapshot, starting with an empty cart"
                );
                Tickets::new()
            }
        };
        Self {
            tickets,
            storage: Some(storage),
        }
    }

    /// Add one ticket of `tier` under `key`.
    ///
    /// A new line copies the tier's name and price. An existing line only
    /// has its quantity bumped; its name and price stay as first recorded.
    /// Capacity is not checked here.
    pub fn increment_quantity(&mut self, key: CartKey, tier: &TicketTier) -> NonZeroU32 {
        let quantity = match self.tickets.entry(key) {
            Entry::Occupied(mut entry) => {
                let line = entry.get_mut();
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            Entry::Vacant(entry) => {
                let id = entry.key().clone();
                let line = entry.insert(CartLineItem {
                    id,
                    name: tier.name.clone(),
                    price: tier.price,
                    quantity: NonZeroU32::MIN,
                });
                line.quantity
            }
        };
        self.persist();
        quantity
    }

    /// Remove one ticket from the line under `key`.
    ///
    /// A line at quantity 1 is removed entirely. Decrementing a key that is
    /// not in the cart is a caller bug; it is logged and ignored.
    pub fn decrement_quantity(&mut self, key: &str) -> Decrement {
        let Some(line) = self.tickets.get_mut(key) else {
            warn!(key, "Ignoring decrement of a ticket that is not in the cart");
            return Decrement::Missing;
        };

        let outcome = match NonZeroU32::new(line.quantity.get() - 1) {
            Some(quantity) => {
                line.quantity = quantity;
                Decrement::Decreased(quantity)
            }
            None => {
                self.tickets.remove(key);
                Decrement::Removed
            }
        };
        self.persist();
        outcome
    }

    /// Empty the cart. Returns how many lines were dropped.
    pub fn clear_tickets(&mut self) -> usize {
        let cleared = self.tickets.len();
        self.tickets = Tickets::new();
        self.persist();
        cleared
    }

    fn persist(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.save(&self.tickets) {
            warn!(
                storage = %storage.name(),
                error = %e,
                "Failed to persist cart, continuing in memory only"
            );
            self.storage = None;
        }
    }
}

impl<S> CartStore<S> {
    /// Every line, keyed by composite key.
    pub fn tickets(&self) -> &Tickets {
        &self.tickets
    }

    pub fn get(&self, key: &str) -> Option<&CartLineItem> {
        self.tickets.get(key)
    }

    /// Quantity held under `key`, 0 when absent.
    pub fn quantity(&self, key: &str) -> u32 {
        self.tickets.get(key).map_or(0, |line| line.quantity.get())
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Sum of `price * quantity` over the whole cart, saturating at
    /// [`Decimal::MAX`].
    pub fn total(&self) -> Decimal {
        sum_lines(self.tickets.values())
    }

    /// Sum of `price * quantity` over the lines of one scope (event).
    pub fn scope_total(&self, scope: &str) -> Decimal {
        sum_lines(
            self.tickets
                .iter()
                .filter(|(key, _)| key.belongs_to(scope))
                .map(|(_, line)| line),
        )
    }

    /// Lines grouped by the scope part of their key.
    pub fn line_items_by_scope(&self) -> BTreeMap<&str, Vec<&CartLineItem>> {
        let mut groups: BTreeMap<&str, Vec<&CartLineItem>> = BTreeMap::new();
        for (key, line) in &self.tickets {
            groups.entry(key.scope()).or_default().push(line);
        }
        groups
    }

    /// Whether mutations are still written to storage.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }
}

fn sum_lines<'a>(lines: impl Iterator<Item = &'a CartLineItem>) -> Decimal {
    lines.fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.line_total()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(id: &str, name: &str, price: i64) -> TicketTier {
        TicketTier {
            id: id.to_string(),
            name: name.to_string(),
            price: Decimal::from(price),
            description: String::new(),
            available: 10,
        }
    }

    fn store() -> (CartStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CartStore::open(storage.clone()), storage)
    }

    #[test]
    fn test_first_increment_creates_line() {
        let (mut cart, _) = store();
        let quantity = cart.increment_quantity(
            CartKey::new("evt1", "tierA"),
            &tier("tierA", "GA", 25),
        );

        assert_eq!(quantity.get(), 1);
        assert_eq!(cart.len(), 1);
        let line = cart.get("evt1-tierA").unwrap();
        assert_eq!(line.id.as_str(), "evt1-tierA");
        assert_eq!(line.name, "GA");
        assert_eq!(line.price, Decimal::from(25));
        assert_eq!(line.quantity.get(), 1);
    }

    #[test]
    fn test_repeat_increments_keep_first_name_and_price() {
        let (mut cart, _) = store();
        let key = CartKey::new("evt1", "tierA");
        cart.increment_quantity(key.clone(), &tier("tierA", "GA", 25));
        cart.increment_quantity(key.clone(), &tier("tierA", "General", 30));
        cart.increment_quantity(key.clone(), &tier("tierA", "Renamed", 99));

        let line = cart.get(key.as_str()).unwrap();
        assert_eq!(line.quantity.get(), 3);
        assert_eq!(line.name, "GA");
        assert_eq!(line.price, Decimal::from(25));
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let (mut cart, _) = store();
        let key = CartKey::new("evt1", "tierA");
        cart.increment_quantity(key.clone(), &tier("tierA", "GA", 25));
        cart.increment_quantity(key.clone(), &tier("tierA", "GA", 25));

        assert_eq!(
            cart.decrement_quantity("evt1-tierA"),
            Decrement::Decreased(NonZeroU32::MIN)
        );
        assert_eq!(cart.quantity("evt1-tierA"), 1);

        assert_eq!(cart.decrement_quantity("evt1-tierA"), Decrement::Removed);
        assert!(cart.is_empty());
        assert!(cart.get("evt1-tierA").is_none());
    }

    #[test]
    fn test_decrement_missing_key_is_noop() {
        let (mut cart, storage) = store();
        cart.increment_quantity(CartKey::new("evt1", "tierA"), &tier("tierA", "GA", 25));
        let before = storage.raw();

        assert_eq!(cart.decrement_quantity("evt1-tierB"), Decrement::Missing);
        assert_eq!(cart.len(), 1);
        assert_eq!(storage.raw(), before);
    }

    #[test]
    fn test_clear_empties_cart_and_storage() {
        let (mut cart, storage) = store();
        cart.increment_quantity(CartKey::new("evt1", "a"), &tier("a", "A", 10));
        cart.increment_quantity(CartKey::new("evt2", "b"), &tier("b", "B", 20));

        assert_eq!(cart.clear_tickets(), 2);
        assert!(cart.tickets().is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        let reopened = CartStore::open(storage);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_totals_per_scope() {
        let (mut cart, _) = store();
        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        cart.increment_quantity(CartKey::new("evt1", "vip"), &tier("vip", "VIP", 100));
        cart.increment_quantity(CartKey::new("evt10", "ga"), &tier("ga", "GA", 7));

        assert_eq!(cart.scope_total("evt1"), Decimal::from(150));
        assert_eq!(cart.scope_total("evt10"), Decimal::from(7));
        assert_eq!(cart.scope_total("evt2"), Decimal::ZERO);
        assert_eq!(cart.total(), Decimal::from(157));
    }

    #[test]
    fn test_reopen_restores_identical_cart() {
        let (mut cart, storage) = store();
        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        cart.increment_quantity(CartKey::new("evt2", "early-bird"), &tier("early-bird", "Early", 5));

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.tickets(), cart.tickets());
        assert!(reopened.is_persistent());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set_raw("{not json");
        let cart = CartStore::open(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let mut cart = CartStore::open(MemoryStorage::unavailable());
        assert!(cart.is_persistent());

        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        assert!(!cart.is_persistent());

        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));
        assert_eq!(cart.quantity("evt1-ga"), 2);
        assert_eq!(cart.decrement_quantity("evt1-ga"), Decrement::Decreased(NonZeroU32::MIN));
    }

    #[test]
    fn test_no_line_ever_reaches_zero() {
        let (mut cart, _) = store();
        let keys = ["e1-a", "e1-b", "e2-a"];
        let ops: [(usize, bool); 12] = [
            (0, true),
            (1, true),
            (0, false),
            (0, false),
            (2, true),
            (2, true),
            (1, false),
            (2, false),
            (1, false),
            (0, true),
            (2, false),
            (2, false),
        ];
        for (index, increment) in ops {
            let key = keys[index];
            if increment {
                cart.increment_quantity(CartKey::from(key), &tier("t", "T", 1));
            } else {
                cart.decrement_quantity(key);
            }
            assert!(cart.tickets().values().all(|line| line.quantity.get() >= 1));
        }
        assert_eq!(cart.quantity("e1-a"), 1);
        assert_eq!(cart.quantity("e1-b"), 0);
        assert_eq!(cart.quantity("e2-a"), 0);
    }

    #[test]
    fn test_line_items_by_scope() {
        let (mut cart, _) = store();
        cart.increment_quantity(CartKey::new("evt2", "early-bird"), &tier("early-bird", "Early", 5));
        cart.increment_quantity(CartKey::new("evt1", "vip"), &tier("vip", "VIP", 100));
        cart.increment_quantity(CartKey::new("evt1", "ga"), &tier("ga", "GA", 25));

        let groups = cart.line_items_by_scope();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ["evt1", "evt2"]);

        let evt1: Vec<&str> = groups["evt1"].iter().map(|line| line.id.as_str()).collect();
        assert_eq!(evt1, ["evt1-ga", "evt1-vip"]);
        assert_eq!(groups["evt2"][0].name, "Early");

        cart.clear_tickets();
        assert!(cart.line_items_by_scope().is_empty());
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let (mut cart, _) = store();
        let expensive = TicketTier {
            price: Decimal::MAX,
            ..tier("gold", "Gold", 0)
        };
        cart.increment_quantity(CartKey::new("evt1", "gold"), &expensive);
        cart.increment_quantity(CartKey::new("evt1", "gold"), &expensive);
        cart.increment_quantity(CartKey::new("evt2", "gold"), &expensive);

        assert_eq!(cart.get("evt1-gold").unwrap().line_total(), Decimal::MAX);
        assert_eq!(cart.scope_total("evt1"), Decimal::MAX);
        assert_eq!(cart.total(), Decimal::MAX);
    }
}
