//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! paws cart show
//! paws cart add-product 12
//! paws cart add-pet 4
//! paws cart set-quantity product 12 3
//! paws cart remove pet 4
//! paws cart clear
//! ```

use pawshop_core::{ItemKind, PetId, ProductId};
use pawshop_storefront::cart::{CartStore, LineItem, LineKey};
use pawshop_storefront::{AppError, Storefront};

pub fn show(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in cart.items() {
        println!("{}", line_row(item));
    }
    println!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal()
    );
}

pub async fn add_product(storefront: &mut Storefront, id: ProductId) -> Result<(), AppError> {
    match storefront.add_product(id).await? {
        Some(item) => println!("In cart: {}", line_row(&item)),
        None => println!("Sorry, that product is out of stock."),
    }
    Ok(())
}

pub async fn add_pet(storefront: &mut Storefront, id: PetId) -> Result<(), AppError> {
    match storefront.add_pet(id).await? {
        Some(item) => println!("In cart: {}", line_row(&item)),
        None => println!("That pet could not be added."),
    }
    Ok(())
}

pub fn remove(storefront: &mut Storefront, kind: ItemKind, id: i32) {
    let key = LineKey::new(id, kind);
    if !storefront.cart().contains(key) {
        println!("{key} is not in your cart.");
        return;
    }
    storefront.cart_mut().remove(key);
    println!("Removed {key}.");
}

pub fn set_quantity(storefront: &mut Storefront, kind: ItemKind, id: i32, quantity: u32) {
    let key = LineKey::new(id, kind);
    if !storefront.cart().contains(key) {
        println!("{key} is not in your cart.");
        return;
    }
    storefront.cart_mut().set_quantity(key, quantity);
    match storefront.cart().get(key) {
        Some(item) if item.quantity() < quantity => {
            println!("Only {} available: {}", item.quantity(), line_row(item));
        }
        Some(item) => println!("Updated: {}", line_row(item)),
        None => println!("Removed {key}."),
    }
}

pub fn clear(storefront: &mut Storefront) {
    storefront.cart_mut().clear();
    println!("Cart cleared.");
}

fn line_row(item: &LineItem) -> String {
    format!(
        "{:<14} {:<40} {:>3} x {:>12} = {:>14}",
        item.key().to_string(),
        item.name(),
        item.quantity(),
        item.unit_price().to_string(),
        item.line_total().to_string()
    )
}
