//! Repository for the `events` table.

use eventease_core::lifecycle::{DeleteOutcome, GuardedEntity};
use eventease_core::types::DbId;
use sqlx::PgPool;

use super::{prefixed_columns, qualified_columns, venue_repo};
use crate::models::event::{CreateEvent, Event, EventWithVenue, UpdateEvent};

/// Column names shared across queries to avoid repetition.
pub(crate) const COLUMN_NAMES: &[&str] = &[
    "id",
    "event_name",
    "event_date",
    "description",
    "venue_id",
    "created_at",
    "updated_at",
];

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_name, event_date, description, venue_id, created_at, updated_at";

/// `SELECT ... FROM events e JOIN venues v` prefix used by the eager reads.
fn select_with_venue() -> String {
    format!(
        "SELECT {}, {} FROM events e JOIN venues v ON v.id = e.venue_id",
        qualified_columns("e", COLUMN_NAMES),
        prefixed_columns("v", "venue__", venue_repo::COLUMN_NAMES),
    )
}

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (event_name, event_date, description, venue_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.event_name)
            .bind(input.event_date)
            .bind(&input.description)
            .bind(input.venue_id)
            .fetch_one(pool)
            .await
    }

    /// Find an event by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an event by ID together with its venue.
    pub async fn find_by_id_with_venue(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EventWithVenue>, sqlx::Error> {
        let query = format!("{} WHERE e.id = $1", select_with_venue());
        sqlx::query_as::<_, EventWithVenue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all events with their venues, soonest first.
    pub async fn list_with_venue(pool: &PgPool) -> Result<Vec<EventWithVenue>, sqlx::Error> {
        let query = format!("{} ORDER BY e.event_date, e.id", select_with_venue());
        sqlx::query_as::<_, EventWithVenue>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace an event's mutable fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                event_name = $2,
                event_date = $3,
                description = $4,
                venue_id = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.event_name)
            .bind(input.event_date)
            .bind(&input.description)
            .bind(input.venue_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event unless a booking still references it.
    pub async fn delete_if_unreferenced(
        pool: &PgPool,
        id: DbId,
    ) -> Result<DeleteOutcome, sqlx::Error> {
        super::guarded_delete(pool, GuardedEntity::Event, id).await
    }

    /// Whether the event may currently be deleted (no referencing bookings).
    pub async fn can_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let bookings = super::count_referencing_bookings(pool, GuardedEntity::Event, id).await?;
        Ok(eventease_core::lifecycle::can_delete(bookings))
    }
}
