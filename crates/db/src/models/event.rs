//! Event entity model and DTOs.

use eventease_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use crate::models::venue::Venue;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_name: String,
    pub event_date: Timestamp,
    pub description: Option<String>,
    pub venue_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Decode an event whose columns were selected with a name prefix
    /// (e.g. `event__id`) as part of a join.
    pub(crate) fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Self {
            id: row.try_get(col("id").as_str())?,
            event_name: row.try_get(col("event_name").as_str())?,
            event_date: row.try_get(col("event_date").as_str())?,
            description: row.try_get(col("description").as_str())?,
            venue_id: row.try_get(col("venue_id").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}

/// An event together with the venue hosting it.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithVenue {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Venue,
}

impl<'r> FromRow<'r, PgRow> for EventWithVenue {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            event: Event::from_row(row)?,
            venue: Venue::from_prefixed_row(row, "venue__")?,
        })
    }
}

/// DTO for creating a new event.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateEvent {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub event_name: String,
    pub event_date: Timestamp,
    pub description: Option<String>,
    pub venue_id: DbId,
}

/// DTO for editing an event. Replaces every mutable field.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateEvent {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub event_name: String,
    pub event_date: Timestamp,
    pub description: Option<String>,
    pub venue_id: DbId,
}
