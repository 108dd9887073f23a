//! Cart lines and their identity.

use serde::{Deserialize, Serialize};

use pawshop_core::{ItemKind, PetId, Price, ProductId};

use crate::models::CatalogEntry;

/// Quantity cap applied when a product line carries no stock bound.
pub const DEFAULT_QUANTITY_CAP: u32 = 999;

/// Identity of a cart line: the catalog id plus which catalog it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKey {
    Product(ProductId),
    Animal(PetId),
}

impl LineKey {
    /// Build a key from a raw id and kind.
    #[must_use]
    pub const fn new(id: i32, kind: ItemKind) -> Self {
        match kind {
            ItemKind::Product => Self::Product(ProductId::new(id)),
            ItemKind::Animal => Self::Animal(PetId::new(id)),
        }
    }

    #[must_use]
    pub const fn id(&self) -> i32 {
        match self {
            Self::Product(id) => id.as_i32(),
            Self::Animal(id) => id.as_i32(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::Animal(_) => ItemKind::Animal,
        }
    }
}

impl From<ProductId> for LineKey {
    fn from(id: ProductId) -> Self {
        Self::Product(id)
    }
}

impl From<PetId> for LineKey {
    fn from(id: PetId) -> Self {
        Self::Animal(id)
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id())
    }
}

/// One entry in the cart.
///
/// Name, price, image and category are copied from the listing when the item
/// is added and do not follow later catalog changes. The persisted field
/// names (`id`, `type`, `price`, `image`, `maxQuantity`, ...) are part of the
/// stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: i32,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: String,
    #[serde(rename = "price", default)]
    unit_price: Price,
    #[serde(default)]
    image: Option<String>,
    quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_quantity: Option<u32>,
    #[serde(default)]
    category: Option<String>,
}

impl LineItem {
    /// A fresh line with quantity one, or `None` for a product with no stock.
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry) -> Option<Self> {
        let (id, max_quantity, category) = match entry {
            CatalogEntry::Product(p) => {
                if p.stock_quantity == 0 {
                    return None;
                }
                (
                    p.product_id.as_i32(),
                    Some(p.stock_quantity),
                    p.category.clone(),
                )
            }
            CatalogEntry::Pet(p) => (p.pet_id.as_i32(), None, p.species.clone()),
        };

        Some(Self {
            id,
            kind: entry.kind(),
            name: entry.name().to_owned(),
            unit_price: entry.price(),
            image: entry.primary_image().map(str::to_owned),
            quantity: 1,
            max_quantity,
            category,
        })
    }

    #[must_use]
    pub const fn key(&self) -> LineKey {
        LineKey::new(self.id, self.kind)
    }

    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stock bound for products; `None` for pets.
    #[must_use]
    pub const fn max_quantity(&self) -> Option<u32> {
        self.max_quantity
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// The most units this line may hold.
    #[must_use]
    pub fn quantity_cap(&self) -> u32 {
        match self.kind {
            ItemKind::Animal => 1,
            ItemKind::Product => self.max_quantity.unwrap_or(DEFAULT_QUANTITY_CAP),
        }
    }

    /// Set the quantity, clamped to `[1, quantity_cap]`. Returns whether it changed.
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> bool {
        let clamped = quantity.clamp(1, self.quantity_cap());
        let changed = clamped != self.quantity;
        self.quantity = clamped;
        changed
    }

    /// Check a line read back from storage.
    ///
    /// Pet lines have their stock bound dropped; every other violation is
    /// reported.
    pub(crate) fn validated(mut self) -> Result<Self, String> {
        if self.kind == ItemKind::Animal {
            self.max_quantity = None;
        }
        if self.quantity == 0 {
            return Err(format!("{} has zero quantity", self.key()));
        }
        if self.quantity > self.quantity_cap() {
            return Err(format!(
                "{} quantity {} exceeds cap {}",
                self.key(),
                self.quantity,
                self.quantity_cap()
            ));
        }
        if self.unit_price.checked_times(self.quantity).is_none() {
            return Err(format!("{} line total overflows", self.key()));
        }
        Ok(self)
    }
}
