//! Newtype IDs for catalog and order references.
//!
//! Pets and products live in separate id spaces on the backend, so a bare
//! integer is not enough to identify a cart line. The `define_id!` macro gives
//! each space its own type.

/// Defines an `i32` id newtype for one backend resource.
///
/// The second argument names the resource in messages: `describe()` on
/// `PetId::new(4)` gives `"pet 4"`. Ids serialize as plain numbers and parse
/// from trimmed decimal text, so they work as clap arguments.
///
/// ```rust
/// # use pawshop_core::define_id;
/// define_id!(CageId, "cage");
///
/// assert_eq!(CageId::new(3).describe(), "cage 3");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $noun:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Resource name used in messages.
            pub const NOUN: &'static str = $noun;

            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// `"<noun> <id>"`, e.g. for not-found messages.
            #[must_use]
            pub fn describe(&self) -> String {
                format!("{} {}", Self::NOUN, self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(PetId, "pet");
define_id!(ProductId, "product");
define_id!(OrderId, "order");
define_id!(SpeciesId, "species");
define_id!(AppointmentId, "appointment");
