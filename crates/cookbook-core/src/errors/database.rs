// ABOUTME: Structured error types for persistence gateway operations
// ABOUTME: Single translator between driver-native failures and the error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by the persistence gateway
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No live row matches the lookup
    #[error("{entity_type} not found: {entity_id}")]
    NotFound {
        /// Table or entity kind that was queried
        entity_type: &'static str,
        /// Identifier or natural key that was looked up
        entity_id: String,
    },

    /// A unique index rejected the write
    #[error("{entity_type} already exists: {key}")]
    Conflict {
        /// Table or entity kind that was written
        entity_type: &'static str,
        /// Offending natural key, when known
        key: String,
    },

    /// Query execution failed
    #[error("query failed: {context}")]
    QueryError {
        /// Driver message and operation context
        context: String,
    },

    /// Pool or connection failure
    #[error("connection failed: {0}")]
    ConnectionError(String),

    /// Schema migration failure
    #[error("migration failed: {0}")]
    MigrationError(String),

    /// A stored value could not be decoded into its domain type
    #[error("invalid stored value in {column}: {reason}")]
    InvalidData {
        /// Column holding the bad value
        column: &'static str,
        /// Why decoding failed
        reason: String,
    },
}

impl DatabaseError {
    /// Whether this error means "no live row matches"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is a uniqueness violation
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let code = match &error {
            DatabaseError::NotFound { .. } => ErrorCode::ResourceNotFound,
            DatabaseError::Conflict { .. } => ErrorCode::ResourceAlreadyExists,
            DatabaseError::QueryError { .. }
            | DatabaseError::ConnectionError(_)
            | DatabaseError::MigrationError(_)
            | DatabaseError::InvalidData { .. } => ErrorCode::StorageError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound {
                entity_type: "row",
                entity_id: String::new(),
            },
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => Self::Conflict {
                entity_type: "row",
                key: db_error.message().to_owned(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionError(error.to_string())
            }
            other => Self::QueryError {
                context: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let error: AppError = DatabaseError::NotFound {
            entity_type: "categories",
            entity_id: "abc".to_owned(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::ResourceNotFound);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let error: AppError = DatabaseError::Conflict {
            entity_type: "tags",
            key: "vegan".to_owned(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
    }

    #[test]
    fn test_query_failure_maps_to_storage() {
        let error: AppError = DatabaseError::QueryError {
            context: "disk I/O error".to_owned(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::StorageError);
        assert_eq!(error.http_status(), 500);
    }
}
