use thiserror::Error;

use crate::service::ServiceError;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Workspace not found: {0}")]
    NotFound(String),

    /// The workspace could not be resolved for editing; carries the reason
    /// reported by the data service.
    #[error("Workspace unavailable: {0}")]
    InvalidWorkspace(String),

    /// The server rejected a create or update. The sequence that triggered
    /// it has already been aborted and the message surfaced.
    #[error("Update rejected: {0}")]
    PersistFailure(String),

    /// A stop or start command was rejected.
    #[error("{command} command rejected: {message}")]
    CommandFailure {
        command: &'static str,
        message: String,
    },

    /// A stack carries a source kind the resolver has no mapping for.
    /// Fatal precondition violation; propagates to the caller untouched.
    #[error("Unsupported stack source kind: {0}")]
    UnsupportedSourceKind(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Config(#[from] wksp_core::WkspError),
}
