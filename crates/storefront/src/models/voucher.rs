//! Voucher records from `GET /Voucher/list`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(default)]
    pub code: Option<String>,
    /// Percentage off the subtotal, e.g. `10` for 10%.
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

impl Voucher {
    /// Case-insensitive exact match on the voucher code.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == code.to_lowercase())
    }

    /// The discount percentage, if the voucher carries a usable one.
    #[must_use]
    pub fn percent(&self) -> Option<Decimal> {
        self.discount_percent.filter(|p| *p > Decimal::ZERO)
    }
}
