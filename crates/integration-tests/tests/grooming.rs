//! Grooming appointments: booking and history against the stub server.

#![allow(clippy::unwrap_used)]

use chrono::{Days, Local, NaiveDate};
use pawshop_core::{AppointmentId, AppointmentStatus, PetType};
use pawshop_integration_tests::{KNOWN_EMAIL, PASSWORD, StubShop};
use pawshop_storefront::services::{Booking, BookingError};
use pawshop_storefront::{AppError, Storefront};
use tempfile::TempDir;

async fn open(shop: &StubShop, dir: &TempDir) -> Storefront {
    Storefront::open(shop.config(dir.path()).unwrap()).unwrap()
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive().checked_add_days(Days::new(1)).unwrap()
}

fn booking(storefront: &Storefront, service_id: u8) -> Booking {
    let identity = storefront.session().identity().unwrap();
    Booking {
        pet_type: PetType::Dog,
        time: "15:00".to_owned(),
        ..Booking::prefill(identity, service_id, "Milo", tomorrow())
    }
}

#[tokio::test]
async fn test_book_and_list_appointments() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();

    let premium = booking(&storefront, 2);
    let sent = storefront.book_appointment(&premium).await.unwrap();
    assert_eq!(sent.service, "Grooming Premium");

    {
        let data = shop.data().await;
        let body = &data.booked[0];
        assert_eq!(body["Dog_item_id"], 0);
        assert_eq!(body["User_id"], KNOWN_EMAIL);
        assert_eq!(body["Date"], tomorrow().format("%Y-%m-%d").to_string());
        assert_eq!(body["Hour"], "15:00");
        assert_eq!(body["Description"], "Milo (dog) - Không có ghi chú");
        assert_eq!(body["User_name"], "An Nguyen");
        assert_eq!(body["Phone_number"], "0901234567");
        assert_eq!(body["Result"], "");
        assert_eq!(body["Status"], "Chờ xác nhận");
    }

    let appointments = storefront.appointments().await.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].appointment_id, AppointmentId::new(1));
    assert_eq!(appointments[0].status, AppointmentStatus::Pending);
    assert_eq!(appointments[0].hour.as_deref(), Some("15:00"));
}

#[tokio::test]
async fn test_booking_requires_sign_in() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();
    let booking = booking(&storefront, 1);
    storefront.logout().unwrap();

    let err = storefront.book_appointment(&booking).await.unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));
    assert!(shop.data().await.booked.is_empty());
}

#[tokio::test]
async fn test_invalid_bookings_are_not_sent() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();

    let yesterday = Local::now().date_naive().checked_sub_days(Days::new(1)).unwrap();
    let past = Booking {
        date: yesterday,
        ..booking(&storefront, 1)
    };
    let err = storefront.book_appointment(&past).await.unwrap_err();
    assert!(matches!(err, AppError::Booking(BookingError::DateInPast(_))));

    let unknown = booking(&storefront, 5);
    let err = storefront.book_appointment(&unknown).await.unwrap_err();
    assert!(matches!(err, AppError::Booking(BookingError::UnknownService(5))));

    assert!(shop.data().await.booked.is_empty());
}

#[tokio::test]
async fn test_appointments_with_revoked_token_sign_out() {
    let shop = StubShop::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut storefront = open(&shop, &dir).await;
    storefront.login(KNOWN_EMAIL, PASSWORD).await.unwrap();
    shop.data().await.token_revoked = true;

    let err = storefront.appointments().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!storefront.session().is_authenticated());
}
