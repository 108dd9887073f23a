//! Grooming appointment booking.

use chrono::NaiveDate;
use thiserror::Error;

use pawshop_core::{AppointmentStatus, Email, PetType};

use crate::models::{AppointmentRequest, GroomingService, Identity, TIME_SLOTS};

const NO_NOTE: &str = "Không có ghi chú";

/// Why a booking was not sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("There is no grooming service number {0}")]
    UnknownService(u8),

    #[error("Please enter your {0}")]
    MissingDetail(&'static str),

    #[error("Appointments cannot be booked for a past date ({0})")]
    DateInPast(NaiveDate),

    #[error("{0} is not a bookable time; choose one of {slots}", slots = TIME_SLOTS.join(", "))]
    UnavailableTime(String),
}

/// The booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Menu number from [`GROOMING_SERVICES`](crate::models::GROOMING_SERVICES).
    pub service_id: u8,
    pub pet_name: String,
    pub pet_type: PetType,
    pub owner_name: String,
    pub phone: String,
    pub date: NaiveDate,
    /// One of [`TIME_SLOTS`].
    pub time: String,
    pub note: Option<String>,
}

impl Booking {
    /// A booking for `service_id` with owner name and phone taken from the
    /// signed-in profile.
    #[must_use]
    pub fn prefill(identity: &Identity, service_id: u8, pet_name: &str, date: NaiveDate) -> Self {
        let owner_name = match identity.full_name() {
            name if name.is_empty() => identity.username.clone().unwrap_or_default(),
            name => name,
        };
        Self {
            service_id,
            pet_name: pet_name.to_owned(),
            pet_type: PetType::default(),
            owner_name,
            phone: identity.phone_number.clone().unwrap_or_default(),
            date,
            time: TIME_SLOTS[0].to_owned(),
            note: None,
        }
    }

    /// The request body for `account`, checked against `today`.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] for an unknown service, a blank detail, a
    /// past date or a time outside [`TIME_SLOTS`].
    pub fn request(
        &self,
        account: &Email,
        today: NaiveDate,
    ) -> Result<AppointmentRequest, BookingError> {
        let service = GroomingService::find(self.service_id)
            .ok_or(BookingError::UnknownService(self.service_id))?;

        for (label, value) in [
            ("pet's name", &self.pet_name),
            ("name", &self.owner_name),
            ("phone number", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(BookingError::MissingDetail(label));
            }
        }
        if self.date < today {
            return Err(BookingError::DateInPast(self.date));
        }
        let time = self.time.trim();
        if !TIME_SLOTS.contains(&time) {
            return Err(BookingError::UnavailableTime(time.to_owned()));
        }

        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .unwrap_or(NO_NOTE);

        Ok(AppointmentRequest {
            pet_id: 0,
            user_id: account.clone(),
            date: self.date,
            hour: time.to_owned(),
            description: format!("{} ({}) - {note}", self.pet_name.trim(), self.pet_type),
            phone_number: self.phone.trim().to_owned(),
            user_name: self.owner_name.trim().to_owned(),
            service: service.name.to_owned(),
            result: String::new(),
            status: AppointmentStatus::Pending,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        serde_json::from_str(
            r#"{"email": "an@example.com", "username": "an", "firstName": "An", "phoneNumber": "0901"}"#,
        )
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn booking() -> Booking {
        Booking::prefill(&identity(), 1, "Milo", today())
    }

    #[test]
    fn test_prefill_from_profile() {
        let booking = booking();
        assert_eq!(booking.owner_name, "An");
        assert_eq!(booking.phone, "0901");
        assert_eq!(booking.time, "09:00");

        let mut bare = identity();
        bare.first_name = None;
        assert_eq!(Booking::prefill(&bare, 1, "Milo", today()).owner_name, "an");
    }

    #[test]
    fn test_request_describes_the_pet() {
        let mut booking = booking();
        booking.pet_type = PetType::Cat;
        booking.time = "14:00".to_owned();
        let account = identity().email;

        let request = booking.request(&account, today()).unwrap();
        assert_eq!(request.description, "Milo (cat) - Không có ghi chú");
        assert_eq!(request.service, "Grooming Cơ Bản");
        assert_eq!(request.user_id, account);
        assert_eq!(request.pet_id, 0);
        assert_eq!(request.status, AppointmentStatus::Pending);

        booking.note = Some(" nhát người ".to_owned());
        let request = booking.request(&account, today()).unwrap();
        assert_eq!(request.description, "Milo (cat) - nhát người");
    }

    #[test]
    fn test_request_rejections() {
        let account = identity().email;

        let mut past = booking();
        past.date = today().pred_opt().unwrap();
        assert_eq!(
            past.request(&account, today()),
            Err(BookingError::DateInPast(past.date))
        );

        let mut late = booking();
        late.time = "12:00".to_owned();
        assert_eq!(
            late.request(&account, today()),
            Err(BookingError::UnavailableTime("12:00".to_owned()))
        );

        let mut unknown = booking();
        unknown.service_id = 7;
        assert_eq!(
            unknown.request(&account, today()),
            Err(BookingError::UnknownService(7))
        );

        let mut nameless = booking();
        nameless.pet_name = " ".to_owned();
        assert_eq!(
            nameless.request(&account, today()),
            Err(BookingError::MissingDetail("pet's name"))
        );
    }

    #[test]
    fn test_today_is_bookable() {
        let booking = booking();
        assert!(booking.request(&identity().email, today()).is_ok());
    }
}
