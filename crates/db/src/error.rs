use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Failures raised by the storage gateway.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),

    #[error("generated id {0} does not fit a signed id")]
    IdOutOfRange(u64),

    #[error("invalid value for column '{column}': {value}")]
    InvalidValue { column: &'static str, value: String },

    #[error("storage unavailable")]
    Unavailable,
}
