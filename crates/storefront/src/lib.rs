//! Paws & Co storefront library.
//!
//! The shopper-side session of the pet shop: the persisted cart, the
//! signed-in identity, checkout, and the client for the shop's REST API.
//! Front ends (the `paws` CLI) drive it through [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use state::Storefront;
