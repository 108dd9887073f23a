//! Subcommand implementations. Each prints its results to stdout.

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod grooming;
pub mod orders;
