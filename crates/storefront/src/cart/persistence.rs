//! Round-trips the cart through key-value storage.

use std::collections::HashSet;
use std::sync::Arc;

use pawshop_core::Price;

use super::line_item::LineItem;
use crate::storage::{CART_KEY, KeyValueStore};

/// Reads and writes the cart under [`CART_KEY`].
///
/// Failures never reach the caller: an unreadable cart is discarded (and
/// erased when the stored value itself is bad), a failed write is logged.
#[derive(Clone)]
pub struct CartPersistence {
    storage: Arc<dyn KeyValueStore>,
}

impl CartPersistence {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load the stored cart, or an empty one.
    #[must_use]
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.storage.get(CART_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored cart, starting empty");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(items) => {
                tracing::debug!(lines = items.len(), "restored cart");
                items
            }
            Err(reason) => {
                tracing::warn!(%reason, "discarding malformed stored cart");
                if let Err(e) = self.storage.remove(CART_KEY) {
                    tracing::warn!(error = %e, "could not erase malformed cart");
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the stored cart with `items`.
    pub fn save(&self, items: &[LineItem]) {
        let encoded = match serde_json::to_string_pretty(items) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "could not encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.set(CART_KEY, &encoded) {
            tracing::warn!(error = %e, "could not persist cart");
        }
    }
}

impl std::fmt::Debug for CartPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPersistence")
            .field("key", &CART_KEY)
            .finish_non_exhaustive()
    }
}

fn decode(raw: &str) -> Result<Vec<LineItem>, String> {
    let items: Vec<LineItem> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut seen = HashSet::with_capacity(items.len());
    let items = items
        .into_iter()
        .map(|item| {
            if !seen.insert(item.key()) {
                return Err(format!("duplicate line {}", item.key()));
            }
            item.validated()
        })
        .collect::<Result<Vec<_>, _>>()?;

    items
        .iter()
        .try_fold(Price::ZERO, |acc, item| acc.checked_add(item.line_total()))
        .ok_or_else(|| "cart subtotal overflows".to_owned())?;
    Ok(items)
}
