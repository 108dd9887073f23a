//! Pet shop domain types: resource ids, dong prices, account emails and
//! the item, pet, payment and status enums shared by the storefront and CLI.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
