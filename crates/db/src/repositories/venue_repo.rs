//! Repository for the `venues` table.

use eventease_core::lifecycle::{DeleteOutcome, GuardedEntity};
use eventease_core::types::DbId;
use eventease_core::venue::resolve_image_url;
use sqlx::{PgExecutor, PgPool};

use crate::models::venue::{CreateVenue, UpdateVenue, Venue};

/// Column names shared across queries to avoid repetition.
pub(crate) const COLUMN_NAMES: &[&str] = &[
    "id",
    "venue_name",
    "location",
    "capacity",
    "image_url",
    "created_at",
    "updated_at",
];

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, venue_name, location, capacity, image_url, created_at, updated_at";

/// Provides CRUD operations for venues.
pub struct VenueRepo;

impl VenueRepo {
    /// Insert a new venue, returning the created row.
    ///
    /// A missing or blank `image_url` is stored as the placeholder image.
    pub async fn create(pool: &PgPool, input: &CreateVenue) -> Result<Venue, sqlx::Error> {
        let query = format!(
            "INSERT INTO venues (venue_name, location, capacity, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(&input.venue_name)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(resolve_image_url(input.image_url.as_deref()))
            .fetch_one(pool)
            .await
    }

    /// Find a venue by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a venue and lock its row until the surrounding transaction ends.
    ///
    /// Deletes of the venue wait on this lock, so a multi-step edit cannot
    /// lose its row halfway through.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all venues in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues ORDER BY id");
        sqlx::query_as::<_, Venue>(&query).fetch_all(pool).await
    }

    /// Replace a venue's mutable fields.
    ///
    /// `image_url` overrides the stored URL (an uploaded image's URL when the
    /// edit carried a file); a blank value falls back to the placeholder.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateVenue,
    ) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!(
            "UPDATE venues SET
                venue_name = $2,
                location = $3,
                capacity = $4,
                image_url = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .bind(&input.venue_name)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(resolve_image_url(input.image_url.as_deref()))
            .fetch_optional(executor)
            .await
    }

    /// Delete a venue unless a booking still references it.
    pub async fn delete_if_unreferenced(
        pool: &PgPool,
        id: DbId,
    ) -> Result<DeleteOutcome, sqlx::Error> {
        super::guarded_delete(pool, GuardedEntity::Venue, id).await
    }

    /// Whether the venue may currently be deleted (no referencing bookings).
    pub async fn can_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let bookings = super::count_referencing_bookings(pool, GuardedEntity::Venue, id).await?;
        Ok(eventease_core::lifecycle::can_delete(bookings))
    }
}
