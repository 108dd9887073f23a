//! Order records: the checkout payload and order history.
//!
//! The create payload uses the backend's PascalCase field names; history
//! records come back camelCase.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use pawshop_core::{Email, ItemKind, OrderId, OrderStatus, PaymentMethod, Price};

/// Body of `POST /Checkout/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// The account the order belongs to.
    #[serde(rename = "User_id")]
    pub user_id: Email,
    /// Subtotal minus discount.
    #[serde(rename = "Total")]
    pub total: Price,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Status")]
    pub status: OrderStatus,
    #[serde(rename = "Payment")]
    pub payment: PaymentMethod,
    /// Contact email typed at checkout; may differ from the account email.
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Data")]
    pub lines: Vec<OrderLine>,
}

/// One purchased line, embedded in the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    /// Stock bound captured when the item entered the cart.
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
}

impl OrderLine {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Response body of `POST /Checkout/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Status code some backend versions embed in the body.
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of `GET /Checkout/list/{email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(rename = "createAt", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default)]
    pub total: Option<Price>,
    #[serde(default)]
    pub payment: Option<String>,
}

/// `GET /Checkout/detail/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    /// Purchased lines, stored by the backend as a JSON string.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl OrderDetail {
    /// Decode the embedded line list.
    ///
    /// Accepts either the JSON string the backend stores or an inline array.
    /// Anything unreadable yields an empty list.
    #[must_use]
    pub fn lines(&self) -> Vec<OrderLine> {
        let decoded = match &self.data {
            None | Some(serde_json::Value::Null) => return Vec::new(),
            Some(serde_json::Value::String(raw)) if raw.trim().is_empty() => return Vec::new(),
            Some(serde_json::Value::String(raw)) => serde_json::from_str(raw),
            Some(value) => serde_json::from_value(value.clone()),
        };
        decoded.unwrap_or_else(|e| {
            tracing::warn!(order_id = %self.summary.id, error = %e, "unreadable order line data");
            Vec::new()
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps and the offset-less form ASP.NET emits.
/// Unparseable values become `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_uses_backend_field_names() {
        let payload = OrderPayload {
            user_id: Email::parse("an@example.com").unwrap(),
            total: Price::from_dong(450_000),
            address: "1 Le Loi".to_owned(),
            status: OrderStatus::Processing,
            payment: PaymentMethod::Cod,
            email: "an@example.com".to_owned(),
            phone_number: "0901234567".to_owned(),
            name: "An".to_owned(),
            lines: vec![OrderLine {
                id: 1,
                kind: ItemKind::Product,
                name: "Dog Food".to_owned(),
                quantity: 3,
                price: Price::from_dong(150_000),
                stock: 10,
                images: vec![],
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["User_id"], "an@example.com");
        assert_eq!(json["Status"], "Đang xử lý");
        assert_eq!(json["Payment"], "COD");
        assert_eq!(json["Data"][0]["type"], "product");
        assert_eq!(json["Data"][0]["stock"], 10);
        assert_eq!(json["Total"].as_f64(), Some(450_000.0));
    }

    #[test]
    fn test_summary_parses_aspnet_timestamps() {
        let summary: OrderSummary = serde_json::from_str(
            r#"{"id": 9, "createAt": "2025-03-01T08:30:00.123", "status": "Đang giao", "total": 200000, "payment": "COD"}"#,
        )
        .unwrap();
        assert_eq!(summary.status, OrderStatus::Shipping);
        assert!(summary.created_at.is_some());

        let odd: OrderSummary =
            serde_json::from_str(r#"{"id": 9, "createAt": "yesterday", "total": null}"#).unwrap();
        assert_eq!(odd.created_at, None);
        assert_eq!(odd.total, None);
    }

    #[test]
    fn test_detail_lines_from_string_or_array() {
        let from_string: OrderDetail = serde_json::from_str(
            r#"{"id": 1, "data": "[{\"id\":2,\"type\":\"animal\",\"name\":\"Milo\",\"quantity\":1,\"price\":5000000,\"stock\":1,\"images\":[]}]"}"#,
        )
        .unwrap();
        let lines = from_string.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, ItemKind::Animal);
        assert_eq!(lines[0].line_total(), Price::from_dong(5_000_000));

        let from_array: OrderDetail = serde_json::from_str(
            r#"{"id": 1, "data": [{"id":2,"type":"product","name":"Leash","quantity":2,"price":10,"stock":5}]}"#,
        )
        .unwrap();
        assert_eq!(from_array.lines()[0].line_total(), Price::from_dong(20));
    }

    #[test]
    fn test_detail_lines_fail_soft() {
        let broken: OrderDetail = serde_json::from_str(r#"{"id": 1, "data": "{not json"}"#).unwrap();
        assert!(broken.lines().is_empty());
        let empty: OrderDetail = serde_json::from_str(r#"{"id": 1, "data": ""}"#).unwrap();
        assert!(empty.lines().is_empty());
    }
}
