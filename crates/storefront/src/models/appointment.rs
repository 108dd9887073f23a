//! Grooming appointments: the service menu, bookable slots and the
//! `Appointment` endpoints' wire shapes.
//!
//! The create body uses the backend's mixed `Snake_case` field names; history
//! records come back lowercase snake case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pawshop_core::{AppointmentId, AppointmentStatus, Email, Price};

/// A service on the grooming menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroomingService {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    /// Whole dong.
    pub price_dong: i64,
    pub duration: &'static str,
}

/// The grooming menu. The backend stores only the service name.
pub const GROOMING_SERVICES: [GroomingService; 4] = [
    GroomingService {
        id: 1,
        name: "Grooming Cơ Bản",
        description: "Tắm, sấy, cắt móng, vệ sinh tai",
        price_dong: 200_000,
        duration: "1 giờ",
    },
    GroomingService {
        id: 2,
        name: "Grooming Premium",
        description: "Tắm spa, cắt tỉa lông, massage, làm móng",
        price_dong: 400_000,
        duration: "2 giờ",
    },
    GroomingService {
        id: 3,
        name: "Cắt Tỉa Tạo Kiểu",
        description: "Cắt tỉa lông theo yêu cầu, tạo kiểu đẹp",
        price_dong: 350_000,
        duration: "1.5 giờ",
    },
    GroomingService {
        id: 4,
        name: "Chăm Sóc Sức Khỏe",
        description: "Kiểm tra sức khỏe, vệ sinh răng miệng, xử lý ve bọ",
        price_dong: 300_000,
        duration: "1 giờ",
    },
];

/// Start times the shop takes bookings for.
pub const TIME_SLOTS: [&str; 8] = [
    "09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];

impl GroomingService {
    /// Look a service up by its menu number.
    #[must_use]
    pub fn find(id: u8) -> Option<&'static Self> {
        GROOMING_SERVICES.iter().find(|service| service.id == id)
    }

    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_dong(self.price_dong)
    }
}

/// Body of `POST /Appointment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    /// Always 0: bookings are for the shopper's own pet, not a listed one.
    #[serde(rename = "Dog_item_id")]
    pub pet_id: i32,
    /// The account the appointment belongs to.
    #[serde(rename = "User_id")]
    pub user_id: Email,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Hour")]
    pub hour: String,
    /// `"<pet name> (<pet type>) - <note>"`.
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Phone_number")]
    pub phone_number: String,
    #[serde(rename = "User_name")]
    pub user_name: String,
    /// Service name from the menu.
    #[serde(rename = "Service")]
    pub service: String,
    /// Filled in by the shop after the visit.
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Status")]
    pub status: AppointmentStatus,
}

/// One entry of `GET /Appointment/all/{email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: AppointmentId,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    /// Shown as sent; the backend may append a time component.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub hour: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
