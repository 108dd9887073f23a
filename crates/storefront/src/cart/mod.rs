//! The shopping cart.
//!
//! [`CartStore`] is the only way to read or change the cart. It keeps lines in
//! insertion order, enforces one line per `(id, kind)`, and writes the whole
//! cart back to storage after every change once it has been hydrated.
//!
//! Operations on items that are not in the cart are silent no-ops; the callers
//! are trusted front-end code, not an external boundary.

mod line_item;
mod persistence;

pub use line_item::{DEFAULT_QUANTITY_CAP, LineItem, LineKey};
pub use persistence::CartPersistence;

use std::sync::Arc;

use pawshop_core::{ItemKind, Price};

use crate::models::CatalogEntry;
use crate::storage::KeyValueStore;

/// Ordered cart lines plus the hydration flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<LineItem>,
    loaded: bool,
}

/// Cart state bound to its persistence.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    persistence: CartPersistence,
}

impl CartStore {
    /// An empty, not yet hydrated cart. Nothing is written until
    /// [`hydrate`](Self::hydrate) has run.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: CartState::default(),
            persistence: CartPersistence::new(storage),
        }
    }

    /// Create and hydrate in one step.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut cart = Self::new(storage);
        cart.hydrate();
        cart
    }

    /// Load the persisted cart. Runs once; later calls do nothing.
    pub fn hydrate(&mut self) {
        if self.state.loaded {
            return;
        }
        self.state.items = self.persistence.load();
        self.state.loaded = true;
    }

    /// Whether persisted state has finished loading.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    /// Put a catalog entry in the cart.
    ///
    /// A product already in the cart gains one unit, up to its stock bound. A
    /// pet already in the cart is left alone. Out-of-stock products are not
    /// added.
    pub fn add(&mut self, entry: &CatalogEntry) {
        self.update(|items| {
            let Some(fresh) = LineItem::from_entry(entry) else {
                tracing::debug!(name = entry.name(), "not adding out-of-stock product");
                return false;
            };

            match items.iter_mut().find(|i| i.key() == fresh.key()) {
                Some(existing) => match existing.kind() {
                    ItemKind::Product => existing.set_quantity(existing.quantity().saturating_add(1)),
                    ItemKind::Animal => false,
                },
                None => {
                    items.push(fresh);
                    true
                }
            }
        });
    }

    /// Drop the line for `key`, if present.
    pub fn remove(&mut self, key: impl Into<LineKey>) {
        let key = key.into();
        self.update(|items| {
            let before = items.len();
            items.retain(|i| i.key() != key);
            items.len() != before
        });
    }

    /// Set the quantity of the line for `key`.
    ///
    /// Zero removes the line. Otherwise the quantity is capped at the stock
    /// bound (or [`DEFAULT_QUANTITY_CAP`]); pet lines always stay at one.
    pub fn set_quantity(&mut self, key: impl Into<LineKey>, quantity: u32) {
        let key = key.into();
        if quantity < 1 {
            self.remove(key);
            return;
        }
        self.update(|items| {
            items
                .iter_mut()
                .find(|i| i.key() == key)
                .is_some_and(|line| line.set_quantity(quantity))
        });
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.update(|items| {
            let had_items = !items.is_empty();
            items.clear();
            had_items
        });
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state
            .items
            .iter()
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity()))
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.items.iter().map(LineItem::line_total).sum()
    }

    #[must_use]
    pub fn contains(&self, key: impl Into<LineKey>) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: impl Into<LineKey>) -> Option<&LineItem> {
        let key = key.into();
        self.state.items.iter().find(|i| i.key() == key)
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Apply `change` and persist if it reports a modification.
    ///
    /// Every mutation goes through here, so the merge-by-identity rule is
    /// applied against the current lines in one step.
    fn update(&mut self, change: impl FnOnce(&mut Vec<LineItem>) -> bool) {
        if change(&mut self.state.items) && self.state.loaded {
            self.persistence.save(&self.state.items);
        }
    }
}
