//! Domain models for the storefront.
//!
//! Wire shapes for the Paws & Co backend: catalog listings, vouchers, orders,
//! grooming appointments and the account endpoints.

pub mod appointment;
pub mod catalog;
pub mod order;
pub mod user;
pub mod voucher;

pub use appointment::{
    Appointment, AppointmentRequest, GROOMING_SERVICES, GroomingService, TIME_SLOTS,
};
pub use catalog::{CatalogEntry, PetListing, ProductListing, Species};
pub use order::{OrderDetail, OrderLine, OrderPayload, OrderReceipt, OrderSummary};
pub use user::{
    ChangePasswordRequest, ForgotPasswordRequest, Identity, LoginRequest, LoginResponse, Profile,
    ProfileUpdate, RegisterRequest, ResetPasswordRequest,
};
pub use voucher::Voucher;
