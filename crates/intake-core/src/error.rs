//! Error types and result handling for intake operations.
//!
//! Every failure on the intake path collapses to a single user-visible
//! response shape at the HTTP boundary; the variants here exist so the
//! logs and tests can tell malformed input apart from infrastructure
//! failures.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for intake operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request body is not valid JSON, or does not have the shape an
    /// endpoint requires.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Database connectivity or statement execution failed.
    #[error("database error: {0}")]
    Database(String),

    /// A database constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(format!("unique constraint violation: {db_err}"))
            },
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::ConstraintViolation(format!("foreign key constraint violation: {db_err}"))
            },
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                Self::ConstraintViolation(format!("check constraint violation: {db_err}"))
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parse_failure_maps_to_invalid_payload() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err = CoreError::from(parse_err);

        assert!(matches!(err, CoreError::InvalidPayload(_)));
        assert!(err.to_string().starts_with("invalid payload:"));
    }

    #[test]
    fn generic_sqlx_failure_maps_to_database() {
        let err = CoreError::from(sqlx::Error::PoolTimedOut);

        assert!(matches!(err, CoreError::Database(_)));
        assert!(err.to_string().starts_with("database error:"));
    }

    #[test]
    fn display_carries_the_failure_description() {
        let err = CoreError::InvalidPayload("expected value at line 1".into());
        assert_eq!(err.to_string(), "invalid payload: expected value at line 1");
    }
}
