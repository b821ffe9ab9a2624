use thiserror::Error;

/// Errors raised by the stores, the entity services and the ticket workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A list lookup that must return at least one record came back empty.
    #[error("No {0} found")]
    NoneFound(&'static str),

    #[error("{entity} with ID {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("Ticket cannot have a dispatched time in the future for truck ID: {truck_id}")]
    FutureDispatch { truck_id: i64 },

    #[error("Ticket with dispatched time {dispatched_time} already exists for truck ID: {truck_id}")]
    DuplicateDispatch {
        truck_id: i64,
        dispatched_time: String,
    },

    #[error(
        "Ticket with dispatched time {dispatched_time} is duplicated within the batch for truck ID: {truck_id}"
    )]
    BatchDuplicate {
        truck_id: i64,
        dispatched_time: String,
    },

    #[error("Ticket number already taken for site ID: {site_id}")]
    NumberingConflict { site_id: i64 },

    #[error("{entity} with ID {id} is still referenced and cannot be deleted")]
    InUse { entity: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(String),
}

impl DispatchError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DispatchError::NotFound { entity, id }
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NotFound { .. } | DispatchError::NoneFound(_) => "NOT_FOUND",
            DispatchError::MissingReference { .. } => "MISSING_REFERENCE",
            DispatchError::FutureDispatch { .. } => "FUTURE_DISPATCH",
            DispatchError::DuplicateDispatch { .. } => "DUPLICATE_DISPATCH",
            DispatchError::BatchDuplicate { .. } => "BATCH_DUPLICATE",
            DispatchError::NumberingConflict { .. } => "NUMBERING_CONFLICT",
            DispatchError::InUse { .. } => "IN_USE",
            DispatchError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<rusqlite::Error> for DispatchError {
    fn from(e: rusqlite::Error) -> Self {
        DispatchError::Database(e.to_string())
    }
}

/// Returns true when the error is a SQLite constraint violation of the given kind.
pub(crate) fn is_constraint(e: &rusqlite::Error, code: std::os::raw::c_int) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.extended_code == code
    )
}
