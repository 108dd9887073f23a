//! Order history commands.
//!
//! # Usage
//!
//! ```bash
//! paws orders list
//! paws orders show 42
//! ```

use pawshop_core::OrderId;
use pawshop_storefront::models::OrderSummary;
use pawshop_storefront::{AppError, Storefront};

pub async fn list(storefront: &mut Storefront) -> Result<(), AppError> {
    let orders = storefront.orders().await?;
    if orders.is_empty() {
        println!("You have no orders yet.");
    }
    for order in &orders {
        println!("{}", summary_row(order));
    }
    Ok(())
}

pub async fn show(storefront: &mut Storefront, id: OrderId) -> Result<(), AppError> {
    let order = storefront.order(id).await?;
    println!("{}", summary_row(&order.summary));

    for (label, value) in [
        ("Name", &order.name),
        ("Email", &order.email),
        ("Phone", &order.phone_number),
        ("Address", &order.address),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }

    for line in order.lines() {
        println!(
            "  - {} x{} @ {} = {}",
            line.name,
            line.quantity,
            line.price,
            line.line_total()
        );
    }
    Ok(())
}

fn summary_row(order: &OrderSummary) -> String {
    let placed = order
        .created_at
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default();
    let total = order.total.map(|t| t.to_string()).unwrap_or_default();
    format!(
        "#{:<6} {:<17} {:<12} {:>14}  {}",
        order.id.to_string(),
        placed,
        order.status.to_string(),
        total,
        order.payment.as_deref().unwrap_or("")
    )
}
