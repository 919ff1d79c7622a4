use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Camera required: {0}")]
    CameraRequired(String),

    #[error("Already submitted: session {0}")]
    AlreadySubmitted(DbId),

    #[error("Internal error: {0}")]
    Internal(String),
}
