//! Venue entity model and DTOs.

use eventease_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use validator::Validate;

/// A venue row from the `venues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Venue {
    pub id: DbId,
    pub venue_name: String,
    pub location: String,
    pub capacity: i32,
    /// Never null; falls back to the placeholder image.
    pub image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Venue {
    /// Decode a venue whose columns were selected with a name prefix
    /// (e.g. `venue__id`) as part of a join.
    pub(crate) fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Self {
            id: row.try_get(col("id").as_str())?,
            venue_name: row.try_get(col("venue_name").as_str())?,
            location: row.try_get(col("location").as_str())?,
            capacity: row.try_get(col("capacity").as_str())?,
            image_url: row.try_get(col("image_url").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}

/// DTO for creating a new venue.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateVenue {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub venue_name: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub location: String,
    #[validate(range(min = 1, message = "capacity must be a positive number"))]
    pub capacity: i32,
    /// Defaults to the placeholder image when omitted or blank.
    pub image_url: Option<String>,
}

/// DTO for editing a venue. Replaces every mutable field.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateVenue {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub venue_name: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub location: String,
    #[validate(range(min = 1, message = "capacity must be a positive number"))]
    pub capacity: i32,
    /// Falls back to the placeholder image when omitted or blank.
    pub image_url: Option<String>,
}
