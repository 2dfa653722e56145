use crate::database::DatabaseError;
use crate::models::SumError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Telegram API errors
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Balance arithmetic left the representable decimal range
    #[error("Balance overflow for user {0}")]
    Overflow(i64),

    /// Balance arithmetic would have rounded the result
    #[error("Balance for user {0} would lose precision")]
    PrecisionLoss(i64),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Map a refused balance sum for `user_id`
    pub fn from_sum(user_id: i64, err: SumError) -> Self {
        match err {
            SumError::OutOfRange => RepositoryError::Overflow(user_id),
            SumError::Inexact => RepositoryError::PrecisionLoss(user_id),
        }
    }

    /// The amount itself cannot be applied, as opposed to a store fault
    pub fn is_amount_rejected(&self) -> bool {
        matches!(self, RepositoryError::Overflow(_) | RepositoryError::PrecisionLoss(_))
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                // Check for common PostgreSQL error codes
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    // Check constraint violation
                    Some("23514") => {
                        RepositoryError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => RepositoryError::Query(err),
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}
