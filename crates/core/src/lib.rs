//! Paws & Co Core - Shared types library.
//!
//! This crate provides common types used across the Paws & Co components:
//! - `storefront` - Shopping session library (cart, session, checkout, API client)
//! - `cli` - The `paws` command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for catalog IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
