//! Catalog listings as returned by the backend.
//!
//! Field names follow the backend's JSON (`dogProductItemId`, `itemName`, ...);
//! the Rust names describe what the fields mean.

use serde::{Deserialize, Serialize};

use pawshop_core::{ItemKind, PetId, PetType, Price, ProductId, SpeciesId};

/// A product from the shop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    #[serde(rename = "dogProductItemId")]
    pub product_id: ProductId,
    #[serde(rename = "itemName")]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Units in stock.
    #[serde(rename = "quantity", default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub category: Option<String>,
}

/// A pet from the shop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetListing {
    #[serde(rename = "dogItemId")]
    pub pet_id: PetId,
    #[serde(rename = "dogName")]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(rename = "dogSpeciesName", default)]
    pub species: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PetListing {
    /// Case-insensitive match of `term` against the name and description.
    /// A blank term matches everything.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

/// A breed, from `GET /DogItems/get-all-species`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    #[serde(rename = "dogSpeciesId")]
    pub species_id: SpeciesId,
    #[serde(rename = "dogSpeciesName")]
    pub name: String,
}

impl Species {
    /// Breed ids 1-10 are dogs and 11-17 are cats in the shop's catalog.
    #[must_use]
    pub const fn pet_type(&self) -> PetType {
        match self.species_id.as_i32() {
            1..=10 => PetType::Dog,
            11..=17 => PetType::Cat,
            _ => PetType::Other,
        }
    }
}

/// Something that can be put in the cart.
///
/// The listing kind is resolved here, once, when the shopper picks an item;
/// the cart never re-inspects raw payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Product(ProductListing),
    Pet(PetListing),
}

impl CatalogEntry {
    /// The cart kind this entry produces.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::Pet(_) => ItemKind::Animal,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Product(p) => &p.name,
            Self::Pet(p) => &p.name,
        }
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        match self {
            Self::Product(p) => p.price,
            Self::Pet(p) => p.price,
        }
    }

    /// First listing image, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        let images = match self {
            Self::Product(p) => p.images.as_deref(),
            Self::Pet(p) => p.images.as_deref(),
        };
        images.and_then(<[String]>::first).map(String::as_str)
    }
}

impl From<ProductListing> for CatalogEntry {
    fn from(listing: ProductListing) -> Self {
        Self::Product(listing)
    }
}

impl From<PetListing> for CatalogEntry {
    fn from(listing: PetListing) -> Self {
        Self::Pet(listing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_listing_from_backend_json() {
        let json = r#"{
            "dogProductItemId": 1,
            "itemName": "Dog Food",
            "price": 150000,
            "images": ["img.jpg"],
            "quantity": 10,
            "category": "Food",
            "description": "ignored"
        }"#;
        let listing: ProductListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.product_id, ProductId::new(1));
        assert_eq!(listing.stock_quantity, 10);

        let entry = CatalogEntry::from(listing);
        assert_eq!(entry.kind(), ItemKind::Product);
        assert_eq!(entry.primary_image(), Some("img.jpg"));
    }

    #[test]
    fn test_pet_listing_tolerates_missing_images() {
        let json = r#"{"dogItemId": 3, "dogName": "Milo", "price": 5000000, "images": null}"#;
        let listing: PetListing = serde_json::from_str(json).unwrap();
        let entry = CatalogEntry::from(listing);
        assert_eq!(entry.kind(), ItemKind::Animal);
        assert_eq!(entry.name(), "Milo");
        assert_eq!(entry.primary_image(), None);
    }

    #[test]
    fn test_pet_search_covers_description() {
        let json = r#"{"dogItemId": 3, "dogName": "Milo", "description": "Playful Corgi puppy"}"#;
        let listing: PetListing = serde_json::from_str(json).unwrap();
        assert!(listing.matches_search("milo"));
        assert!(listing.matches_search(" CORGI "));
        assert!(listing.matches_search(""));
        assert!(!listing.matches_search("poodle"));
    }

    #[test]
    fn test_species_pet_type_by_id_range() {
        let species: Vec<Species> = serde_json::from_str(
            r#"[{"dogSpeciesId": 2, "dogSpeciesName": "Corgi"},
                {"dogSpeciesId": 11, "dogSpeciesName": "Mèo Anh lông ngắn"},
                {"dogSpeciesId": 30, "dogSpeciesName": "Hamster"}]"#,
        )
        .unwrap();
        let types: Vec<PetType> = species.iter().map(Species::pet_type).collect();
        assert_eq!(types, [PetType::Dog, PetType::Cat, PetType::Other]);
    }
}
