use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A delete was refused because dependent rows still reference the entity.
    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
