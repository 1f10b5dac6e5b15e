//! Delete guards for entities that bookings depend on.
//!
//! Venues and events may only be removed once no booking references them.
//! Bookings themselves are deleted unconditionally and have no guard.

use crate::error::CoreError;
use crate::types::DbId;

/// Entity kinds protected by a delete guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedEntity {
    Venue,
    Event,
}

impl GuardedEntity {
    /// Entity name used in `NotFound` errors.
    pub fn name(self) -> &'static str {
        match self {
            GuardedEntity::Venue => "Venue",
            GuardedEntity::Event => "Event",
        }
    }

    /// User-facing message for a refused delete.
    pub fn blocked_message(self) -> String {
        let noun = match self {
            GuardedEntity::Venue => "venue",
            GuardedEntity::Event => "event",
        };
        format!("Cannot delete this {noun} because it is associated with existing bookings.")
    }
}

/// Result of a guarded delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Refused; `bookings` rows still reference the entity.
    Referenced { bookings: i64 },
}

impl DeleteOutcome {
    /// Convert a non-`Deleted` outcome into the matching domain error.
    pub fn into_result(self, entity: GuardedEntity, id: DbId) -> Result<(), CoreError> {
        match self {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(CoreError::NotFound {
                entity: entity.name(),
                id,
            }),
            DeleteOutcome::Referenced { .. } => {
                Err(CoreError::ReferentialIntegrity(entity.blocked_message()))
            }
        }
    }
}

/// An entity may be deleted only while no booking references it.
pub fn can_delete(referencing_bookings: i64) -> bool {
    referencing_bookings == 0
}
