//! Turns the cart and the signed-in identity into an order.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use pawshop_core::{Email, OrderId, OrderStatus, PaymentMethod, Price};

use super::{OrderService, VoucherService};
use crate::api::ApiError;
use crate::cart::{CartStore, LineItem};
use crate::models::{Identity, OrderLine, OrderPayload};
use crate::session::Session;

const VOUCHER_FALLBACK: &str = "Unable to apply the voucher code, please try again";
const ORDER_FALLBACK: &str = "Order failed, please try again";

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please sign in to place an order")]
    SignInRequired,

    #[error("Invalid voucher code")]
    InvalidVoucher,

    #[error("Please enter your {0}")]
    MissingDetail(&'static str),

    #[error("Please enter a valid contact email")]
    InvalidContactEmail,

    /// The voucher list could not be fetched.
    #[error("{}", VOUCHER_FALLBACK)]
    VoucherLookup(#[source] ApiError),

    /// The backend refused the order or could not be reached.
    #[error("{}", .0.server_message().unwrap_or(ORDER_FALLBACK))]
    OrderRejected(#[source] ApiError),
}

impl CheckoutError {
    /// The backend reported the bearer token as invalid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::VoucherLookup(ApiError::Unauthorized) | Self::OrderRejected(ApiError::Unauthorized)
        )
    }
}

/// Shipping and contact details typed at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment: PaymentMethod,
}

impl CustomerDetails {
    /// Details pre-filled from the signed-in profile. Address is left blank
    /// and payment defaults to cash on delivery.
    #[must_use]
    pub fn prefill(identity: &Identity) -> Self {
        Self {
            name: identity.full_name(),
            email: identity.email.to_string(),
            phone: identity.phone_number.clone().unwrap_or_default(),
            address: String::new(),
            payment: PaymentMethod::default(),
        }
    }

    fn validate(&self) -> Result<(), CheckoutError> {
        for (label, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone number", &self.phone),
            ("shipping address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingDetail(label));
            }
        }
        Email::parse(&self.email).map_err(|_| CheckoutError::InvalidContactEmail)?;
        Ok(())
    }
}

/// How a placed order is referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderReference {
    /// Id assigned by the backend.
    Server(OrderId),
    /// Local timestamp (milliseconds) used when the backend returned no id.
    Local(i64),
}

impl OrderReference {
    fn local() -> Self {
        Self::Local(chrono::Utc::now().timestamp_millis())
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "#{id}"),
            Self::Local(millis) => write!(f, "#{millis}"),
        }
    }
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    /// Amount charged after the discount.
    pub total: Price,
    /// Message the backend attached to the receipt, if any.
    pub message: Option<String>,
}

/// Checkout state for one visit to the checkout page: the applied discount.
pub struct Checkout<'a> {
    vouchers: &'a dyn VoucherService,
    orders: &'a dyn OrderService,
    discount: Price,
    voucher_code: Option<String>,
}

impl<'a> Checkout<'a> {
    #[must_use]
    pub fn new(vouchers: &'a dyn VoucherService, orders: &'a dyn OrderService) -> Self {
        Self {
            vouchers,
            orders,
            discount: Price::ZERO,
            voucher_code: None,
        }
    }

    /// Discount currently applied.
    #[must_use]
    pub const fn discount(&self) -> Price {
        self.discount
    }

    /// Code of the voucher currently applied.
    #[must_use]
    pub fn voucher_code(&self) -> Option<&str> {
        self.voucher_code.as_deref()
    }

    /// Amount that would be charged for `cart` now.
    #[must_use]
    pub fn total(&self, cart: &CartStore) -> Price {
        cart.subtotal().saturating_sub(self.discount)
    }

    /// Look `code` up and, if it names a voucher with a positive percentage,
    /// set the discount to that share of the current subtotal (rounded down).
    ///
    /// A blank code does nothing. On any error the discount is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidVoucher`] for an unknown code and
    /// [`CheckoutError::VoucherLookup`] if the vouchers cannot be fetched.
    #[instrument(skip(self, cart))]
    pub async fn apply_voucher_code(
        &mut self,
        code: &str,
        cart: &CartStore,
    ) -> Result<Price, CheckoutError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(self.discount);
        }

        let vouchers = self.vouchers.list_vouchers().await.map_err(|e| {
            tracing::warn!(error = %e, "could not fetch vouchers");
            CheckoutError::VoucherLookup(e)
        })?;

        let percent = vouchers
            .iter()
            .find(|v| v.matches(code))
            .and_then(|v| v.percent())
            .ok_or(CheckoutError::InvalidVoucher)?;

        self.discount = percent_of(cart.subtotal(), percent);
        self.voucher_code = Some(code.to_owned());
        tracing::info!(%percent, discount = %self.discount, "voucher applied");
        Ok(self.discount)
    }

    /// The signed-in shopper, if `cart` can be checked out at all.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] or
    /// [`CheckoutError::SignInRequired`], in that order.
    pub fn ready<'s>(cart: &CartStore, session: &'s Session) -> Result<&'s Identity, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        session
            .identity()
            .filter(|_| session.is_authenticated())
            .ok_or(CheckoutError::SignInRequired)
    }

    /// Place the order for everything in `cart`.
    ///
    /// Nothing is sent when the cart is empty, the session is signed out, or
    /// the details are incomplete. On success the cart is cleared and the
    /// discount reset; on failure both are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition, or
    /// [`CheckoutError::OrderRejected`] if the backend refuses the order.
    #[instrument(skip_all, fields(lines = cart.items().len()))]
    pub async fn submit_order(
        &mut self,
        details: &CustomerDetails,
        cart: &mut CartStore,
        session: &Session,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let identity = Self::ready(cart, session)?;
        details.validate()?;

        let payload = self.build_payload(identity, details, cart);
        let total = payload.total;

        let receipt = self.orders.create_order(&payload).await.map_err(|e| {
            tracing::warn!(error = %e, "order was not accepted");
            CheckoutError::OrderRejected(e)
        })?;

        if let Some(status) = receipt.status
            && !(200..300).contains(&status)
        {
            tracing::warn!(status, "order accepted but receipt reports a non-success status");
        }

        let reference = receipt.id.map_or_else(OrderReference::local, OrderReference::Server);
        cart.clear();
        self.discount = Price::ZERO;
        self.voucher_code = None;

        tracing::info!(%reference, %total, "order placed");
        Ok(OrderConfirmation {
            reference,
            total,
            message: receipt.message,
        })
    }

    fn build_payload(
        &self,
        identity: &Identity,
        details: &CustomerDetails,
        cart: &CartStore,
    ) -> OrderPayload {
        OrderPayload {
            user_id: identity.email.clone(),
            total: self.total(cart),
            address: details.address.trim().to_owned(),
            status: OrderStatus::Processing,
            payment: details.payment,
            email: details.email.trim().to_owned(),
            phone_number: details.phone.trim().to_owned(),
            name: details.name.trim().to_owned(),
            lines: cart.items().iter().map(order_line).collect(),
        }
    }
}

impl fmt::Debug for Checkout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("discount", &self.discount)
            .field("voucher_code", &self.voucher_code)
            .finish_non_exhaustive()
    }
}

fn order_line(item: &LineItem) -> OrderLine {
    OrderLine {
        id: item.id(),
        kind: item.kind(),
        name: item.name().to_owned(),
        quantity: item.quantity(),
        price: item.unit_price(),
        stock: item.quantity_cap(),
        images: item.image().map(ToOwned::to_owned).into_iter().collect(),
    }
}

/// `floor(subtotal * percent / 100)`, never more than the subtotal.
fn percent_of(subtotal: Price, percent: Decimal) -> Price {
    let raw = subtotal
        .amount()
        .checked_mul(percent)
        .map_or_else(|| subtotal.amount(), |v| (v / Decimal::ONE_HUNDRED).floor());
    Price::new(raw).map_or(Price::ZERO, |discount| discount.min(subtotal))
}
