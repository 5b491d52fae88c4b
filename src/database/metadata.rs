// ABOUTME: Generic database operations for the five metadata tables
// ABOUTME: Transactional create/update/soft-delete and live-row reads with driver error translation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::query::{LiveQuery, LIVE};
use super::DatabaseError;
use chrono::{DateTime, SecondsFormat, Utc};
use cookbook_core::models::{MetadataEntity, MetadataRecord};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row};
use std::fmt::Display;
use std::marker::PhantomData;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Query type produced by `sqlx::query` against the Any driver
pub type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// A natural key column value that can be bound and decoded portably
pub trait StorageKey: Clone + Display + Send + Sync + Sized + 'static {
    /// Bind this key as the next parameter
    fn bind_key<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q>;

    /// Decode the key from `column`
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the stored value has the wrong type or range
    fn decode_key(row: &AnyRow, column: &'static str) -> Result<Self, DatabaseError>;
}

impl StorageKey for String {
    fn bind_key<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q> {
        query.bind(self.clone())
    }

    fn decode_key(row: &AnyRow, column: &'static str) -> Result<Self, DatabaseError> {
        row.try_get(column).map_err(|e| invalid_data(column, e))
    }
}

impl StorageKey for u32 {
    fn bind_key<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q> {
        query.bind(i64::from(*self))
    }

    fn decode_key(row: &AnyRow, column: &'static str) -> Result<Self, DatabaseError> {
        let raw: i64 = row.try_get(column).map_err(|e| invalid_data(column, e))?;
        Self::try_from(raw).map_err(|e| invalid_data(column, e))
    }
}

// ============================================================================
// Row codecs
// ============================================================================

fn invalid_data(column: &'static str, reason: impl Display) -> DatabaseError {
    DatabaseError::InvalidData {
        column,
        reason: reason.to_string(),
    }
}

/// Fixed-width RFC 3339 so text ordering equals chronological ordering
pub(super) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(column: &'static str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| invalid_data(column, e))
}

pub(super) fn decode_uuid(row: &AnyRow, column: &'static str) -> Result<Uuid, DatabaseError> {
    let raw: String = row.try_get(column).map_err(|e| invalid_data(column, e))?;
    Uuid::parse_str(&raw).map_err(|e| invalid_data(column, e))
}

fn decode_timestamp(row: &AnyRow, column: &'static str) -> Result<DateTime<Utc>, DatabaseError> {
    let raw: String = row.try_get(column).map_err(|e| invalid_data(column, e))?;
    parse_timestamp(column, &raw)
}

fn decode_optional_timestamp(
    row: &AnyRow,
    column: &'static str,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    let raw: Option<String> = row.try_get(column).map_err(|e| invalid_data(column, e))?;
    raw.map(|value| parse_timestamp(column, &value)).transpose()
}

/// Translate a driver failure for `operation` on `table`, logging it once
pub(super) fn storage_error(
    table: &'static str,
    operation: &'static str,
) -> impl FnOnce(sqlx::Error) -> DatabaseError {
    move |source| match DatabaseError::from(source) {
        DatabaseError::Conflict { key, .. } => {
            warn!(table, operation, reason = %key, "unique constraint rejected write");
            DatabaseError::Conflict {
                entity_type: table,
                key,
            }
        }
        DatabaseError::NotFound { entity_id, .. } => {
            debug!(table, operation, "no matching row");
            DatabaseError::NotFound {
                entity_type: table,
                entity_id,
            }
        }
        DatabaseError::QueryError { context } => {
            error!(table, operation, error = %context, "storage operation failed");
            DatabaseError::QueryError {
                context: format!("{operation} on {table}: {context}"),
            }
        }
        other => {
            error!(table, operation, error = %other, "storage operation failed");
            other
        }
    }
}

// ============================================================================
// Manager
// ============================================================================

/// Database operations for one metadata kind
pub struct MetadataManager<E> {
    pool: AnyPool,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MetadataManager<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            entity: PhantomData,
        }
    }
}

impl<E> MetadataManager<E>
where
    E: MetadataEntity,
    E::Key: StorageKey,
{
    /// Create a new manager over the shared pool
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            entity: PhantomData,
        }
    }

    const fn table() -> &'static str {
        E::KIND.table()
    }

    fn columns() -> String {
        format!(
            "id, {}, created_at, updated_at, deleted_at",
            E::KIND.key_column()
        )
    }

    fn not_found(entity_id: impl Display) -> DatabaseError {
        DatabaseError::NotFound {
            entity_type: Self::table(),
            entity_id: entity_id.to_string(),
        }
    }

    fn row_to_record(row: &AnyRow) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        Ok(MetadataRecord {
            id: decode_uuid(row, "id")?,
            key: E::Key::decode_key(row, E::KIND.key_column())?,
            created_at: decode_timestamp(row, "created_at")?,
            updated_at: decode_timestamp(row, "updated_at")?,
            deleted_at: decode_optional_timestamp(row, "deleted_at")?,
        })
    }

    /// Live rows in insertion order
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when there are no live rows, `QueryError` on storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn find_all(&self) -> Result<Vec<MetadataRecord<E::Key>>, DatabaseError> {
        let sql = LiveQuery::select(Self::columns(), Self::table())
            .order_by("created_at ASC, id ASC")
            .build();

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error(Self::table(), "find_all"))?;

        if rows.is_empty() {
            return Err(Self::not_found("*"));
        }
        rows.iter().map(Self::row_to_record).collect()
    }

    /// Live row with `id`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no live row has this id, `QueryError` on storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn find_one(&self, id: Uuid) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        let sql = LiveQuery::select(Self::columns(), Self::table())
            .where_eq("id")
            .build();

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error(Self::table(), "find_one"))?;

        row.as_ref()
            .map(Self::row_to_record)
            .transpose()?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Live row carrying the natural key
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no live row has this key, `QueryError` on storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn find_by_key(&self, key: &E::Key) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        let sql = LiveQuery::select(Self::columns(), Self::table())
            .where_eq(E::KIND.key_column())
            .build();

        let row = key
            .bind_key(sqlx::query(&sql))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error(Self::table(), "find_by_key"))?;

        row.as_ref()
            .map(Self::row_to_record)
            .transpose()?
            .ok_or_else(|| Self::not_found(key))
    }

    /// Insert a row with a fresh id and current timestamps
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a live row already has this key, `QueryError` on storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn create(&self, key: E::Key) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        let table = Self::table();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let stamp = timestamp(now);
        let sql = format!(
            "INSERT INTO {table} (id, {}, created_at, updated_at) VALUES ($1, $2, $3, $4)",
            E::KIND.key_column()
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error(table, "create"))?;

        key.bind_key(sqlx::query(&sql).bind(id.to_string()))
            .bind(stamp.clone())
            .bind(stamp)
            .execute(&mut *tx)
            .await
            .map_err(storage_error(table, "create"))?;

        tx.commit().await.map_err(storage_error(table, "create"))?;

        debug!(%id, "metadata row created");
        Ok(MetadataRecord {
            id,
            key,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Replace the natural key of the live row with `id`
    ///
    /// Writing an unchanged key leaves the row, including `updated_at`, untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no live row has this id, `Conflict` if another live row
    /// already has the key, `QueryError` on storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn update(
        &self,
        id: Uuid,
        key: E::Key,
    ) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        let table = Self::table();
        let select = LiveQuery::select(Self::columns(), table).where_eq("id").build();
        let update = format!(
            "UPDATE {table} SET {} = $1, updated_at = $2 WHERE id = $3 AND {LIVE}",
            E::KIND.key_column()
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error(table, "update"))?;

        let current = sqlx::query(&select)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error(table, "update"))?;
        let current = match current {
            Some(row) => Self::row_to_record(&row)?,
            None => return Err(Self::not_found(id)),
        };

        if current.key == key {
            tx.commit().await.map_err(storage_error(table, "update"))?;
            return Ok(current);
        }

        let now = Utc::now();
        key.bind_key(sqlx::query(&update))
            .bind(timestamp(now))
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error(table, "update"))?;

        tx.commit().await.map_err(storage_error(table, "update"))?;

        Ok(MetadataRecord {
            key,
            updated_at: now,
            ..current
        })
    }

    /// Soft-delete the row with `id`; deleting an already deleted row succeeds
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row, live or deleted, has this id, `QueryError` on
    /// storage failure
    #[tracing::instrument(skip(self), fields(table = Self::table()))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let table = Self::table();
        let soft_delete = format!("UPDATE {table} SET deleted_at = $1 WHERE id = $2 AND {LIVE}");
        let exists = format!("SELECT id FROM {table} WHERE id = $1");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error(table, "delete"))?;

        let result = sqlx::query(&soft_delete)
            .bind(timestamp(Utc::now()))
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error(table, "delete"))?;

        if result.rows_affected() == 0 {
            let row = sqlx::query(&exists)
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage_error(table, "delete"))?;
            if row.is_none() {
                return Err(Self::not_found(id));
            }
        }

        tx.commit().await.map_err(storage_error(table, "delete"))?;
        debug!(%id, "metadata row soft-deleted");
        Ok(())
    }
}
