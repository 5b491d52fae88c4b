// ABOUTME: Database handle, connection pool and schema migration for metadata storage
// ABOUTME: One AnyPool serves SQLite (tests, local runs) and PostgreSQL (production)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! # Database Management
//!
//! The persistence gateway. Every read applies the live-row predicate from [`query`],
//! every write runs in one transaction, and every driver failure is translated into
//! [`DatabaseError`] here and nowhere else.

/// Generic CRUD over the five metadata tables
pub mod metadata;
/// Live-row query builder
pub mod query;
/// Repository traits and their SQL implementations
pub mod repositories;
/// Search helpers and association writes
pub mod search;

mod schema;

pub use crate::errors::DatabaseError;
pub use metadata::{MetadataManager, StorageKey};
pub use search::SearchManager;

use crate::config::DatabaseUrl;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::info;

/// Database manager wrapping the shared connection pool
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
    url: DatabaseUrl,
}

impl Database {
    /// Connect to the database without migrating
    ///
    /// In-memory `SQLite` is pinned to a single connection that never expires,
    /// since every new connection would open an empty database.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the pool cannot be established
    pub async fn connect(url: &DatabaseUrl, max_connections: u32) -> Result<Self, DatabaseError> {
        sqlx::any::install_default_drivers();

        let options = if url.is_memory() {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(max_connections)
        };

        let pool = options
            .connect(&url.to_connection_string())
            .await
            .map_err(|e| DatabaseError::ConnectionError(format!("{url}: {e}")))?;

        info!(database = %url, "connected to the database");
        Ok(Self {
            pool,
            url: url.clone(),
        })
    }

    /// Connect and bring the schema up to date
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or migrating fails
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> Result<Self, DatabaseError> {
        let database = Self::connect(url, max_connections).await?;
        database.migrate().await?;
        Ok(database)
    }

    /// Fresh, migrated in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot be opened or migrated
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(&DatabaseUrl::Memory, 1).await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Location this handle is connected to
    #[must_use]
    pub const fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Create the metadata and association tables and their indexes
    ///
    /// # Errors
    ///
    /// Returns `MigrationError` if any statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        info!("performing database migrations");
        for statement in schema::statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(format!("{e}: {statement}")))?;
        }
        Ok(())
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the database does not answer
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_migrates_twice() {
        let database = Database::in_memory().await.unwrap();
        database.migrate().await.unwrap();
        database.ping().await.unwrap();
        assert!(database.url().is_memory());
    }
}
