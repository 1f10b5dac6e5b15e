//! Repository for the `bookings` table.

use eventease_core::booking::{
    validate_booking, ConflictBasis, EventSchedule, ScheduledBooking,
};
use eventease_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::{escape_like, event_repo, prefixed_columns, qualified_columns, venue_repo};
use crate::models::booking::{
    Booking, BookingDetail, BookingOutcome, CreateBooking, UpdateBooking,
};

/// Column names shared across queries to avoid repetition.
const COLUMN_NAMES: &[&str] = &[
    "id",
    "event_id",
    "venue_id",
    "booking_date",
    "created_at",
    "updated_at",
];

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, venue_id, booking_date, created_at, updated_at";

/// `SELECT ... FROM bookings b JOIN events e JOIN venues v` used by the
/// eager reads.
fn select_detail() -> String {
    format!(
        "SELECT {}, {}, {} FROM bookings b \
         JOIN events e ON e.id = b.event_id \
         JOIN venues v ON v.id = b.venue_id",
        qualified_columns("b", COLUMN_NAMES),
        prefixed_columns("e", "event__", event_repo::COLUMN_NAMES),
        prefixed_columns("v", "venue__", venue_repo::COLUMN_NAMES),
    )
}

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Validate and insert a booking in one transaction.
    ///
    /// The venue row is locked `FOR UPDATE` and the event row `FOR SHARE`
    /// before the check, so concurrent bookings for the same venue (and
    /// deletes of the venue or event) serialize behind this one. Nothing is
    /// written when the booking is rejected.
    pub async fn create_validated(
        pool: &PgPool,
        input: &CreateBooking,
        basis: ConflictBasis,
    ) -> Result<BookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM venues WHERE id = $1 FOR UPDATE")
            .bind(input.venue_id)
            .fetch_optional(&mut *tx)
            .await?;

        let event: Option<(DbId, Timestamp)> =
            sqlx::query_as("SELECT id, event_date FROM events WHERE id = $1 FOR SHARE")
                .bind(input.event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let event = event.map(|(id, event_date)| EventSchedule { id, event_date });

        let existing: Vec<(DbId, DbId, Timestamp, Timestamp)> = sqlx::query_as(
            "SELECT b.id, b.venue_id, e.event_date, b.booking_date \
             FROM bookings b JOIN events e ON e.id = b.event_id \
             WHERE b.venue_id = $1",
        )
        .bind(input.venue_id)
        .fetch_all(&mut *tx)
        .await?;
        let existing: Vec<ScheduledBooking> = existing
            .into_iter()
            .map(|(id, venue_id, event_date, booking_date)| ScheduledBooking {
                id,
                venue_id,
                event_date,
                booking_date,
            })
            .collect();

        if let Err(rejection) =
            validate_booking(&input.proposal(), event.as_ref(), &existing, basis)
        {
            tracing::info!(
                event_id = input.event_id,
                venue_id = input.venue_id,
                %basis,
                reason = %rejection,
                "Booking rejected"
            );
            return Ok(BookingOutcome::Rejected(rejection));
        }

        let query = format!(
            "INSERT INTO bookings (event_id, venue_id, booking_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.event_id)
            .bind(input.venue_id)
            .bind(input.booking_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BookingOutcome::Created(booking))
    }

    /// Find a booking by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking by ID together with its event and venue.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!("{} WHERE b.id = $1", select_detail());
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List bookings with their event and venue.
    ///
    /// A non-blank `search` keeps only bookings whose event name or venue
    /// name contains it (case-insensitive).
    pub async fn list_details(
        pool: &PgPool,
        search: Option<&str>,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "{} WHERE ($1::text IS NULL OR e.event_name ILIKE $1 OR v.venue_name ILIKE $1) \
             ORDER BY b.booking_date, b.id",
            select_detail()
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Replace a booking's mutable fields. No conflict check is run.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBooking,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET
                event_id = $2,
                venue_id = $3,
                booking_date = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(input.event_id)
            .bind(input.venue_id)
            .bind(input.booking_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a booking by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of bookings.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
