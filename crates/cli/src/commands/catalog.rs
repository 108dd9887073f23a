//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! paws catalog products
//! paws catalog pets
//! paws catalog pets --species 2 --search corgi
//! paws catalog species
//! paws catalog product 12
//! paws catalog pet 4
//! ```

use pawshop_core::{PetId, ProductId, SpeciesId};
use pawshop_storefront::api::{ApiError, PetShopClient};
use pawshop_storefront::models::{PetListing, ProductListing};
use pawshop_storefront::{AppError, Storefront};

pub async fn products(client: &PetShopClient) -> Result<(), ApiError> {
    let products = client.products().await?;
    if products.is_empty() {
        println!("No products available.");
    }
    for product in &products {
        println!("{}", product_row(product));
    }
    Ok(())
}

pub async fn pets(
    storefront: &Storefront,
    species: Option<SpeciesId>,
    search: Option<&str>,
) -> Result<(), AppError> {
    let pets = storefront
        .browse_pets(species, search.unwrap_or_default())
        .await?;
    if pets.is_empty() {
        println!("No pets available.");
    }
    for pet in &pets {
        println!("{}", pet_row(pet));
    }
    Ok(())
}

pub async fn species(client: &PetShopClient) -> Result<(), ApiError> {
    for species in client.species().await? {
        println!(
            "#{:<5} {:<30} {}",
            species.species_id.to_string(),
            species.name,
            species.pet_type().label()
        );
    }
    Ok(())
}

pub async fn product(client: &PetShopClient, id: ProductId) -> Result<(), ApiError> {
    let product = client.product(id).await?;
    println!("{}", product_row(&product));
    if let Some(category) = &product.category {
        println!("  Category: {category}");
    }
    for image in product.images.iter().flatten() {
        println!("  Image: {image}");
    }
    Ok(())
}

pub async fn pet(client: &PetShopClient, id: PetId) -> Result<(), ApiError> {
    let pet = client.pet(id).await?;
    println!("{}", pet_row(&pet));
    if let Some(description) = &pet.description {
        println!("  {description}");
    }
    for image in pet.images.iter().flatten() {
        println!("  Image: {image}");
    }
    Ok(())
}

fn product_row(product: &ProductListing) -> String {
    let stock = if product.stock_quantity == 0 {
        "out of stock".to_string()
    } else {
        format!("{} in stock", product.stock_quantity)
    };
    format!(
        "#{:<5} {:<40} {:>14}  ({stock})",
        product.product_id.to_string(),
        product.name,
        product.price.to_string()
    )
}

fn pet_row(pet: &PetListing) -> String {
    format!(
        "#{:<5} {:<40} {:>14}  {}",
        pet.pet_id.to_string(),
        pet.name,
        pet.price.to_string(),
        pet.species.as_deref().unwrap_or("")
    )
}
