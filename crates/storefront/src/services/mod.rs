//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - Voucher application and order submission
//! - `account` - Registration, password and profile forms
//! - `grooming` - Grooming appointment bookings
//!
//! The backend calls checkout depends on are behind the [`VoucherService`]
//! and [`OrderService`] traits; [`PetShopClient`](crate::api::PetShopClient)
//! implements both, tests substitute fakes.

pub mod account;
pub mod checkout;
pub mod grooming;

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{OrderPayload, OrderReceipt, Voucher};

pub use account::{AccountError, PasswordChange, PasswordReset, ProfileChanges, Registration};
pub use checkout::{Checkout, CheckoutError, CustomerDetails, OrderConfirmation, OrderReference};
pub use grooming::{Booking, BookingError};

/// Source of the vouchers currently on offer.
#[async_trait]
pub trait VoucherService: Send + Sync {
    async fn list_vouchers(&self) -> Result<Vec<Voucher>, ApiError>;
}

/// Accepts orders.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit `payload`. `Ok` means the backend accepted the order.
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ApiError>;
}
