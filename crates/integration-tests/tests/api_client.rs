//! Integration tests for the pet shop API client against the stub server.

#![allow(clippy::unwrap_used)]

use pawshop_core::{Email, OrderId, OrderStatus, PetId, PetType, Price, ProductId, SpeciesId};
use pawshop_integration_tests::{PASSWORD, StubShop, TOKEN, default_data};
use pawshop_storefront::api::{ApiError, PetShopClient};
use secrecy::SecretString;
use serde_json::json;

async fn client_for(shop: &StubShop) -> PetShopClient {
    let dir = tempfile::tempdir().unwrap();
    PetShopClient::new(&shop.config(dir.path()).unwrap()).unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_list_is_cached() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let first = client.products().await.unwrap();
    let second = client.products().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].price, Price::from_dong(250_000));
    assert_eq!(first[1].stock_quantity, 0);
    assert_eq!(shop.data().await.product_list_hits, 1);

    client.invalidate_catalog();
    client.products().await.unwrap();
    assert_eq!(shop.data().await.product_list_hits, 2);
}

#[tokio::test]
async fn test_single_lookups_and_not_found() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let pet = client.pet(PetId::new(4)).await.unwrap();
    assert_eq!(pet.name, "Milo");
    assert_eq!(pet.species.as_deref(), Some("Corgi"));

    let product = client.product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.category.as_deref(), Some("Thức ăn"));

    let err = client.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_species_and_pets_by_species() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let species = client.species().await.unwrap();
    assert_eq!(species.len(), 3);
    assert_eq!(species[0].name, "Corgi");
    assert_eq!(species[2].pet_type(), PetType::Cat);

    let corgis = client.pets_by_species(SpeciesId::new(2)).await.unwrap();
    assert_eq!(corgis.len(), 1);
    assert_eq!(corgis[0].pet_id, PetId::new(4));

    let poodles = client.pets_by_species(SpeciesId::new(5)).await.unwrap();
    assert!(poodles.is_empty());

    let err = client.pets_by_species(SpeciesId::new(99)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(what) if what == "species 99"));
}

#[tokio::test]
async fn test_species_list_is_cached() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let first = client.species().await.unwrap();
    shop.data().await.species.clear();
    assert_eq!(client.species().await.unwrap(), first);

    client.invalidate_catalog();
    assert!(client.species().await.unwrap().is_empty());
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_profile_and_token() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let response = client
        .login("  an@example.com ", &format!("{PASSWORD}\n"))
        .await
        .unwrap();
    let (identity, _token) = response.into_parts();
    assert_eq!(identity.email.as_str(), "an@example.com");
    assert_eq!(identity.full_name(), "An Nguyen");
}

#[tokio::test]
async fn test_rejected_login_carries_server_message() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;

    let err = client.login("an@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 401, .. }));
    assert_eq!(err.server_message(), Some("Sai email hoặc mật khẩu"));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop).await;
    let email = Email::parse("an@example.com").unwrap();

    let err = client.orders_for(&email).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    let authed = client.with_token(Some(SecretString::from(TOKEN)));
    assert!(authed.orders_for(&email).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_history_escapes_email() {
    let shop = StubShop::start().await.unwrap();
    let client = client_for(&shop)
        .await
        .with_token(Some(SecretString::from(TOKEN)));

    let email = Email::parse("an+pets@example.com").unwrap();
    client.orders_for(&email).await.unwrap();

    assert_eq!(shop.data().await.history_lookups, vec!["an+pets@example.com"]);
}

#[tokio::test]
async fn test_order_detail_decodes_embedded_lines() {
    let mut data = default_data();
    let lines = json!([
        {"id": 1, "type": "product", "name": "Royal Canin", "quantity": 2, "price": 250000, "stock": 5, "images": []}
    ]);
    data.history.push(json!({
        "id": 7,
        "createAt": "2025-03-01T09:30:00",
        "status": "Đang giao",
        "total": 500000,
        "payment": "COD",
        "name": "An Nguyen",
        "address": "12 Nguyen Hue",
        "data": lines.to_string()
    }));
    let shop = StubShop::start_with(data).await.unwrap();
    let client = client_for(&shop)
        .await
        .with_token(Some(SecretString::from(TOKEN)));

    let order = client.order_detail(OrderId::new(7)).await.unwrap();
    assert_eq!(order.summary.status, OrderStatus::Shipping);
    assert_eq!(order.summary.total, Some(Price::from_dong(500_000)));
    assert!(order.summary.created_at.is_some());

    let lines = order.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_total(), Price::from_dong(500_000));

    let err = client.order_detail(OrderId::new(8)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
