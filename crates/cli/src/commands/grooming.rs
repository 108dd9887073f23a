//! Grooming service commands.
//!
//! # Usage
//!
//! ```bash
//! paws grooming services
//! paws grooming book --service 2 --pet Milo --pet-type dog --date 2026-10-20 --time 14:00
//! paws grooming list
//! ```
//!
//! Owner name and phone default to the signed-in profile.

use chrono::NaiveDate;
use pawshop_core::PetType;
use pawshop_storefront::models::{Appointment, GROOMING_SERVICES, TIME_SLOTS};
use pawshop_storefront::services::Booking;
use pawshop_storefront::{AppError, Storefront};

/// Booking details typed on the command line.
#[derive(Debug, Clone)]
pub struct BookingArgs {
    pub service: u8,
    pub pet: String,
    pub pet_type: PetType,
    pub date: NaiveDate,
    pub time: String,
    pub owner: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

pub fn services() {
    for service in &GROOMING_SERVICES {
        println!(
            "{}. {:<22} {:>10}  ({})",
            service.id,
            service.name,
            service.price().to_string(),
            service.duration
        );
        println!("   {}", service.description);
    }
    println!();
    println!("Times: {}", TIME_SLOTS.join(", "));
}

pub async fn book(storefront: &mut Storefront, args: BookingArgs) -> Result<(), AppError> {
    let Some(identity) = storefront.session().identity() else {
        eprintln!("Sign in with: paws login -e <email>");
        return Err(AppError::SignInRequired);
    };

    let mut booking = Booking::prefill(identity, args.service, &args.pet, args.date);
    booking.pet_type = args.pet_type;
    booking.time = args.time;
    booking.note = args.note;
    if let Some(owner) = args.owner {
        booking.owner_name = owner;
    }
    if let Some(phone) = args.phone {
        booking.phone = phone;
    }

    let sent = storefront.book_appointment(&booking).await?;
    println!(
        "Booked {} for {} on {} at {}.",
        sent.service,
        booking.pet_name.trim(),
        sent.date.format("%d/%m/%Y"),
        sent.hour
    );
    println!("The shop will call {} to confirm.", sent.phone_number);
    Ok(())
}

pub async fn list(storefront: &mut Storefront) -> Result<(), AppError> {
    let appointments = storefront.appointments().await?;
    if appointments.is_empty() {
        println!("You have no appointments yet.");
    }
    for appointment in &appointments {
        println!("{}", appointment_row(appointment));
    }
    Ok(())
}

fn appointment_row(appointment: &Appointment) -> String {
    // The backend may append a time to the date
    let date = appointment
        .date
        .as_deref()
        .map(|d| d.split('T').next().unwrap_or(d))
        .unwrap_or_default();
    format!(
        "#{:<5} {:<22} {:<10} {:<5}  {}",
        appointment.appointment_id.to_string(),
        appointment.service.as_deref().unwrap_or("-"),
        date,
        appointment.hour.as_deref().unwrap_or(""),
        appointment.status
    )
}
