//! Booking entity model and DTOs.

use eventease_core::booking::{BookingRejection, ProposedBooking};
use eventease_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::postgres::PgRow;

use crate::models::event::Event;
use crate::models::venue::Venue;

/// A booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub event_id: DbId,
    pub venue_id: DbId,
    pub booking_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A booking with its event and venue loaded.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub event: Event,
    pub venue: Venue,
}

impl<'r> FromRow<'r, PgRow> for BookingDetail {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            booking: Booking::from_row(row)?,
            event: Event::from_prefixed_row(row, "event__")?,
            venue: Venue::from_prefixed_row(row, "venue__")?,
        })
    }
}

/// DTO for creating a new booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBooking {
    pub event_id: DbId,
    pub venue_id: DbId,
    pub booking_date: Timestamp,
}

impl CreateBooking {
    pub fn proposal(&self) -> ProposedBooking {
        ProposedBooking {
            event_id: self.event_id,
            venue_id: self.venue_id,
            booking_date: self.booking_date,
        }
    }
}

/// DTO for editing a booking. Replaces every mutable field; no conflict
/// check is performed on edit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateBooking {
    pub event_id: DbId,
    pub venue_id: DbId,
    pub booking_date: Timestamp,
}

/// Result of a validated booking insert.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    Created(Booking),
    Rejected(BookingRejection),
}
