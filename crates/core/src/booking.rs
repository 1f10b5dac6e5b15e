//! Booking validation rules.
//!
//! A new booking is accepted only if its event exists and no other booking
//! at the same venue is already scheduled on the same date. The check is
//! pure: callers load the event and the venue's existing bookings, call
//! [`validate_booking`], and persist only on `Ok`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Message shown when the referenced event does not exist.
pub const EVENT_MISSING_MESSAGE: &str = "The selected event does not exist.";

/// Message shown when the venue is already taken on that date.
pub const SCHEDULING_CONFLICT_MESSAGE: &str =
    "This venue is already booked for another event at the same date and time.";

// ---------------------------------------------------------------------------
// Conflict basis
// ---------------------------------------------------------------------------

/// Which date two bookings at the same venue are compared on.
///
/// `EventDate` compares the dates of the bookings' events, not the
/// bookings' own `booking_date`. Two bookings with different booking
/// timestamps still collide when their events fall on the same date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictBasis {
    #[default]
    EventDate,
    BookingDate,
}

impl ConflictBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictBasis::EventDate => "event_date",
            ConflictBasis::BookingDate => "booking_date",
        }
    }
}

impl fmt::Display for ConflictBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "event_date" => Ok(ConflictBasis::EventDate),
            "booking_date" => Ok(ConflictBasis::BookingDate),
            other => Err(format!(
                "Invalid conflict basis '{other}'. Must be one of: event_date, booking_date"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The booking being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedBooking {
    pub event_id: DbId,
    pub venue_id: DbId,
    pub booking_date: Timestamp,
}

/// The schedule of the event a proposed booking refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSchedule {
    pub id: DbId,
    pub event_date: Timestamp,
}

/// An already-persisted booking joined with its event's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledBooking {
    pub id: DbId,
    pub venue_id: DbId,
    pub event_date: Timestamp,
    pub booking_date: Timestamp,
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a proposed booking was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRejection {
    #[error("The selected event does not exist.")]
    EventMissing { event_id: DbId },

    #[error("This venue is already booked for another event at the same date and time.")]
    SchedulingConflict {
        venue_id: DbId,
        conflicting_booking_id: DbId,
    },
}

impl From<BookingRejection> for CoreError {
    fn from(rejection: BookingRejection) -> Self {
        match &rejection {
            BookingRejection::EventMissing { .. } => CoreError::Validation(rejection.to_string()),
            BookingRejection::SchedulingConflict { .. } => {
                CoreError::Conflict(rejection.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a proposed booking against the current state of the store.
///
/// `event` is the result of looking up `proposed.event_id`; `None` means the
/// event does not exist. `existing` may contain bookings at any venue, only
/// those at `proposed.venue_id` are considered.
pub fn validate_booking(
    proposed: &ProposedBooking,
    event: Option<&EventSchedule>,
    existing: &[ScheduledBooking],
    basis: ConflictBasis,
) -> Result<(), BookingRejection> {
    let event = event
        .filter(|e| e.id == proposed.event_id)
        .ok_or(BookingRejection::EventMissing {
            event_id: proposed.event_id,
        })?;

    let conflict = existing
        .iter()
        .filter(|b| b.venue_id == proposed.venue_id)
        .find(|b| match basis {
            ConflictBasis::EventDate => b.event_date == event.event_date,
            ConflictBasis::BookingDate => b.booking_date == proposed.booking_date,
        });

    match conflict {
        Some(b) => Err(BookingRejection::SchedulingConflict {
            venue_id: proposed.venue_id,
            conflicting_booking_id: b.id,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    const VENUE_A: DbId = 1;
    const VENUE_B: DbId = 2;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn proposed(event_id: DbId, venue_id: DbId, booking_date: Timestamp) -> ProposedBooking {
        ProposedBooking {
            event_id,
            venue_id,
            booking_date,
        }
    }

    fn booked(id: DbId, venue_id: DbId, event_date: Timestamp) -> ScheduledBooking {
        ScheduledBooking {
            id,
            venue_id,
            event_date,
            booking_date: at(2025, 1, 15, 9),
        }
    }

    #[test]
    fn test_first_booking_at_venue_accepted() {
        let event = EventSchedule {
            id: 10,
            event_date: at(2025, 6, 1, 18),
        };
        let result = validate_booking(
            &proposed(10, VENUE_A, at(2025, 5, 1, 9)),
            Some(&event),
            &[],
            ConflictBasis::EventDate,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_event_rejected() {
        let result = validate_booking(
            &proposed(99, VENUE_A, at(2025, 5, 1, 9)),
            None,
            &[],
            ConflictBasis::EventDate,
        );
        assert_eq!(result, Err(BookingRejection::EventMissing { event_id: 99 }));
    }

    #[test]
    fn test_event_lookup_for_other_id_treated_as_missing() {
        let other = EventSchedule {
            id: 11,
            event_date: at(2025, 6, 1, 18),
        };
        let result = validate_booking(
            &proposed(10, VENUE_A, at(2025, 5, 1, 9)),
            Some(&other),
            &[],
            ConflictBasis::EventDate,
        );
        assert_matches!(result, Err(BookingRejection::EventMissing { event_id: 10 }));
    }

    #[test]
    fn test_same_venue_same_event_date_conflicts() {
        let e2 = EventSchedule {
            id: 20,
            event_date: at(2025, 6, 1, 18),
        };
        let existing = [booked(5, VENUE_A, at(2025, 6, 1, 18))];
        let result = validate_booking(
            &proposed(20, VENUE_A, at(2025, 5, 2, 9)),
            Some(&e2),
            &existing,
            ConflictBasis::EventDate,
        );
        assert_eq!(
            result,
            Err(BookingRejection::SchedulingConflict {
                venue_id: VENUE_A,
                conflicting_booking_id: 5,
            })
        );
    }

    #[test]
    fn test_different_venue_same_event_date_accepted() {
        let e2 = EventSchedule {
            id: 20,
            event_date: at(2025, 6, 1, 18),
        };
        let existing = [booked(5, VENUE_A, at(2025, 6, 1, 18))];
        let result = validate_booking(
            &proposed(20, VENUE_B, at(2025, 5, 2, 9)),
            Some(&e2),
            &existing,
            ConflictBasis::EventDate,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_event_date_basis_ignores_booking_date() {
        // Distinct booking timestamps still collide on a shared event date.
        let e2 = EventSchedule {
            id: 20,
            event_date: at(2025, 6, 1, 18),
        };
        let mut existing = booked(5, VENUE_A, at(2025, 6, 1, 18));
        existing.booking_date = at(2024, 12, 1, 8);
        let result = validate_booking(
            &proposed(20, VENUE_A, at(2025, 3, 3, 3)),
            Some(&e2),
            &[existing],
            ConflictBasis::EventDate,
        );
        assert_matches!(result, Err(BookingRejection::SchedulingConflict { .. }));
    }

    #[test]
    fn test_event_date_compared_exactly() {
        let e2 = EventSchedule {
            id: 20,
            event_date: at(2025, 6, 1, 20),
        };
        let existing = [booked(5, VENUE_A, at(2025, 6, 1, 18))];
        let result = validate_booking(
            &proposed(20, VENUE_A, at(2025, 5, 2, 9)),
            Some(&e2),
            &existing,
            ConflictBasis::EventDate,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_booking_date_basis_compares_booking_dates() {
        let e2 = EventSchedule {
            id: 20,
            event_date: at(2025, 6, 1, 18),
        };
        let existing = [booked(5, VENUE_A, at(2025, 6, 1, 18))];

        // Same event date but different booking date: accepted.
        let result = validate_booking(
            &proposed(20, VENUE_A, at(2025, 5, 2, 9)),
            Some(&e2),
            &existing,
            ConflictBasis::BookingDate,
        );
        assert!(result.is_ok());

        // Same booking date: rejected.
        let result = validate_booking(
            &proposed(20, VENUE_A, at(2025, 1, 15, 9)),
            Some(&e2),
            &existing,
            ConflictBasis::BookingDate,
        );
        assert_matches!(result, Err(BookingRejection::SchedulingConflict { .. }));
    }

    #[test]
    fn test_missing_event_reported_before_conflict() {
        let existing = [booked(5, VENUE_A, at(2025, 6, 1, 18))];
        let result = validate_booking(
            &proposed(99, VENUE_A, at(2025, 1, 15, 9)),
            None,
            &existing,
            ConflictBasis::BookingDate,
        );
        assert_matches!(result, Err(BookingRejection::EventMissing { .. }));
    }

    #[test]
    fn test_rejection_maps_to_core_error() {
        let missing: CoreError = BookingRejection::EventMissing { event_id: 1 }.into();
        assert_matches!(missing, CoreError::Validation(msg) if msg == EVENT_MISSING_MESSAGE);

        let conflict: CoreError = BookingRejection::SchedulingConflict {
            venue_id: 1,
            conflicting_booking_id: 2,
        }
        .into();
        assert_matches!(conflict, CoreError::Conflict(msg) if msg == SCHEDULING_CONFLICT_MESSAGE);
    }

    #[test]
    fn test_rejection_messages_match_constants() {
        assert_eq!(
            BookingRejection::EventMissing { event_id: 1 }.to_string(),
            EVENT_MISSING_MESSAGE
        );
        assert_eq!(
            BookingRejection::SchedulingConflict {
                venue_id: 1,
                conflicting_booking_id: 2,
            }
            .to_string(),
            SCHEDULING_CONFLICT_MESSAGE
        );
    }

    #[test]
    fn test_conflict_basis_parse() {
        assert_eq!("event_date".parse(), Ok(ConflictBasis::EventDate));
        assert_eq!(" booking_date ".parse(), Ok(ConflictBasis::BookingDate));
        assert!("tomorrow".parse::<ConflictBasis>().is_err());
        assert_eq!(ConflictBasis::default(), ConflictBasis::EventDate);
        assert_eq!(ConflictBasis::BookingDate.to_string(), "booking_date");
    }
}
