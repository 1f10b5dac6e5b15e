//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

use eventease_core::lifecycle::{can_delete, DeleteOutcome, GuardedEntity};
use eventease_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

pub mod booking_repo;
pub mod event_repo;
pub mod venue_repo;

pub use booking_repo::BookingRepo;
pub use event_repo::EventRepo;
pub use venue_repo::VenueRepo;

/// Render `alias.col AS {prefix}col` for every column, for joins whose
/// rows are decoded with `from_prefixed_row`.
pub(crate) fn prefixed_columns(alias: &str, prefix: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{alias}.{c} AS {prefix}{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `alias.col` for every column.
pub(crate) fn qualified_columns(alias: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn table_of(entity: GuardedEntity) -> &'static str {
    match entity {
        GuardedEntity::Venue => "venues",
        GuardedEntity::Event => "events",
    }
}

fn booking_column_of(entity: GuardedEntity) -> &'static str {
    match entity {
        GuardedEntity::Venue => "venue_id",
        GuardedEntity::Event => "event_id",
    }
}

/// Count bookings referencing the given venue or event.
pub(crate) async fn count_referencing_bookings<'e>(
    executor: impl PgExecutor<'e>,
    entity: GuardedEntity,
    id: DbId,
) -> Result<i64, sqlx::Error> {
    let query = format!(
        "SELECT COUNT(*) FROM bookings WHERE {} = $1",
        booking_column_of(entity)
    );
    let row: (i64,) = sqlx::query_as(&query).bind(id).fetch_one(executor).await?;
    Ok(row.0)
}

/// Delete a venue or event only if no booking references it.
///
/// The row is locked `FOR UPDATE` before counting references so a
/// concurrent booking insert (which locks the same row) cannot slip in
/// between the check and the delete.
pub(crate) async fn guarded_delete(
    pool: &PgPool,
    entity: GuardedEntity,
    id: DbId,
) -> Result<DeleteOutcome, sqlx::Error> {
    let table = table_of(entity);
    let mut tx = pool.begin().await?;

    let locked: Option<(DbId,)> =
        sqlx::query_as(&format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if locked.is_none() {
        return Ok(DeleteOutcome::NotFound);
    }

    let bookings = count_referencing_bookings(&mut *tx, entity, id).await?;
    if !can_delete(bookings) {
        tracing::info!(
            entity = entity.name(),
            id,
            bookings,
            "Delete refused, entity still referenced by bookings"
        );
        return Ok(DeleteOutcome::Referenced { bookings });
    }

    sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(DeleteOutcome::Deleted)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_columns() {
        assert_eq!(
            prefixed_columns("v", "venue__", &["id", "venue_name"]),
            "v.id AS venue__id, v.venue_name AS venue__venue_name"
        );
    }

    #[test]
    fn test_qualified_columns() {
        assert_eq!(qualified_columns("b", &["id", "event_id"]), "b.id, b.event_id");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Hall"), "Hall");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
