//! Cache types for catalog responses.

use pawshop_core::{PetId, ProductId, SpeciesId};

use crate::models::{PetListing, ProductListing, Species};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Pets,
    Pet(PetId),
    Species,
    PetsBySpecies(SpeciesId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<ProductListing>),
    Product(Box<ProductListing>),
    Pets(Vec<PetListing>),
    Pet(Box<PetListing>),
    Species(Vec<Species>),
}
