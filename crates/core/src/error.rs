use crate::board::BoardError;
use crate::forms::FormErrors;
use crate::schedule::ScheduleError;
use crate::types::EntityId;
use crate::work_status::TransitionError;

/// Domain-level error shared by every crate in the workspace.
///
/// The rule-specific enums stay typed so callers can tell which phase,
/// member, or field was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid form: {0}")]
    Form(#[from] FormErrors),

    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("Invalid status change: {0}")]
    Transition(#[from] TransitionError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
