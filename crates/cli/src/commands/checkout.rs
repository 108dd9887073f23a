//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! paws checkout --address "12 Nguyen Hue, Q1" --payment bank --voucher SALE10
//! ```
//!
//! Name, contact email and phone default to the signed-in profile.

use pawshop_core::PaymentMethod;
use pawshop_storefront::services::{CheckoutError, CustomerDetails};
use pawshop_storefront::{AppError, Storefront};

/// Details typed on the command line; unset fields fall back to the profile.
#[derive(Debug, Clone)]
pub struct DetailOverrides {
    pub address: String,
    pub payment: PaymentMethod,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DetailOverrides {
    fn apply(self, mut details: CustomerDetails) -> CustomerDetails {
        details.address = self.address;
        details.payment = self.payment;
        if let Some(name) = self.name {
            details.name = name;
        }
        if let Some(email) = self.email {
            details.email = email;
        }
        if let Some(phone) = self.phone {
            details.phone = phone;
        }
        details
    }
}

pub async fn run(
    storefront: &mut Storefront,
    overrides: DetailOverrides,
    voucher: Option<&str>,
) -> Result<(), AppError> {
    let prefilled = storefront
        .session()
        .identity()
        .map(CustomerDetails::prefill)
        .unwrap_or_default();
    let details = overrides.apply(prefilled);

    let subtotal = storefront.cart().subtotal();
    let outcome = match storefront.checkout(&details, voucher).await {
        Ok(outcome) => outcome,
        Err(AppError::Checkout(CheckoutError::SignInRequired)) => {
            eprintln!("Sign in with: paws login -e <email>");
            return Err(CheckoutError::SignInRequired.into());
        }
        Err(e) => return Err(e),
    };

    println!("Order placed! Reference {}", outcome.confirmation.reference);
    println!("  Subtotal: {subtotal}");
    if !outcome.discount.is_zero() {
        println!("  Discount: -{}", outcome.discount);
    }
    println!("  Total:    {}", outcome.confirmation.total);
    println!("  Payment:  {}", details.payment);
    if let Some(message) = &outcome.confirmation.message {
        println!("  {message}");
    }
    Ok(())
}
