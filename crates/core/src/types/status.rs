//! Kind and status enums shared by the cart, order and appointment records.
//!
//! Wire spellings follow the backend: item kinds are lowercase, payment methods
//! are `COD` / `Bank`, and order and appointment statuses are the Vietnamese
//! labels the admin back-office writes.

use serde::{Deserialize, Serialize};

/// What a cart line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Goods from the shop catalog; quantity is bounded by stock.
    Product,
    /// A pet. Each one is unique, so the quantity is always one.
    Animal,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
            Self::Animal => write!(f, "animal"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "product" => Ok(Self::Product),
            "animal" | "pet" => Ok(Self::Animal),
            _ => Err(format!("invalid item kind: {s}")),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
    /// Bank transfer.
    #[serde(rename = "Bank")]
    Bank,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "COD"),
            Self::Bank => write!(f, "Bank"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::Cod),
            "bank" => Ok(Self::Bank),
            _ => Err(format!("invalid payment method: {s} (expected COD or Bank)")),
        }
    }
}

/// Order fulfilment status as reported by the backend.
///
/// Unknown labels are kept verbatim in [`OrderStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Newly placed, waiting for the shop.
    #[default]
    Processing,
    /// Handed to the courier.
    Shipping,
    /// Delivered to the customer.
    Delivered,
    /// Closed out by the shop.
    Completed,
    /// Cancelled.
    Cancelled,
    /// Any other label.
    Other(String),
}

impl OrderStatus {
    /// The label the backend stores for this status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Processing => "Đang xử lý",
            Self::Shipping => "Đang giao",
            Self::Delivered => "Đã giao",
            Self::Completed => "Hoàn thành",
            Self::Cancelled => "Đã hủy",
            Self::Other(label) => label,
        }
    }

    /// Whether the order has reached a final state.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Completed | Self::Cancelled)
    }
}

impl From<String> for OrderStatus {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "đang xử lý" => Self::Processing,
            "đang giao" => Self::Shipping,
            "đã giao" => Self::Delivered,
            "hoàn thành" => Self::Completed,
            "đã hủy" => Self::Cancelled,
            _ => Self::Other(label),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(label) => label,
            known => known.label().to_owned(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind of animal a grooming appointment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    #[default]
    Dog,
    Cat,
    Other,
}

impl PetType {
    /// The label the shop writes into appointment notes.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dog => "Chó",
            Self::Cat => "Mèo",
            Self::Other => "Khác",
        }
    }
}

impl std::fmt::Display for PetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dog => write!(f, "dog"),
            Self::Cat => write!(f, "cat"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid pet type: {s} (expected dog, cat or other)")),
        }
    }
}

/// Grooming appointment status as reported by the backend.
///
/// Unknown labels are kept verbatim in [`AppointmentStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    /// Booked, waiting for the shop to confirm.
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    /// Any other label.
    Other(String),
}

impl AppointmentStatus {
    /// The label the backend stores for this status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Chờ xác nhận",
            Self::Confirmed => "Đã xác nhận",
            Self::Completed => "Đã hoàn thành",
            Self::Cancelled => "Đã hủy",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "chờ xác nhận" => Self::Pending,
            "đã xác nhận" => Self::Confirmed,
            "đã hoàn thành" => Self::Completed,
            "đã hủy" => Self::Cancelled,
            _ => Self::Other(label),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(label) => label,
            known => known.label().to_owned(),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
