// ABOUTME: Read helpers behind the metadata search and association link/unlink writes
// ABOUTME: Preparation-time range resolution, candidate selection and per-recipe lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::metadata::{decode_uuid, storage_error, timestamp};
use super::query::{LiveQuery, LIVE};
use super::DatabaseError;
use chrono::Utc;
use cookbook_core::models::{MetadataKind, MetadataSearchRequest};
use sqlx::AnyPool;
use tracing::debug;
use uuid::Uuid;

/// Facet filters applied to candidate selection
///
/// Built from a [`MetadataSearchRequest`] once the preparation-time range has been
/// resolved to ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Only this recipe
    pub recipe_id: Option<Uuid>,
    /// Linked to this category
    pub category_id: Option<Uuid>,
    /// Linked to this tag
    pub tag_id: Option<Uuid>,
    /// Linked to this difficulty level
    pub difficulty_level_id: Option<Uuid>,
    /// Linked to this cuisine type
    pub cuisine_type_id: Option<Uuid>,
    /// Linked to one of these preparation times; `None` skips the facet
    pub preparation_time_ids: Option<Vec<Uuid>>,
}

impl CandidateFilter {
    /// Facets of `request` plus the resolved preparation-time ids
    #[must_use]
    pub fn from_request(
        request: &MetadataSearchRequest,
        preparation_time_ids: Option<Vec<Uuid>>,
    ) -> Self {
        Self {
            recipe_id: request.recipe_id,
            category_id: request.category_id,
            tag_id: request.tag_id,
            difficulty_level_id: request.difficulty_level_id,
            cuisine_type_id: request.cuisine_type_id,
            preparation_time_ids,
        }
    }
}

/// Database operations over the association tables
#[derive(Clone)]
pub struct SearchManager {
    pool: AnyPool,
}

impl SearchManager {
    /// Create a new manager over the shared pool
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Ids of live preparation times with `min <= duration <= max`; absent bounds are open
    ///
    /// # Errors
    ///
    /// Returns `QueryError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn preparation_time_ids_in_range(
        &self,
        min: Option<u32>,
        max: Option<u32>,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        let table = MetadataKind::PreparationTime.table();
        let mut query = LiveQuery::select("id", table);
        let mut bounds = Vec::new();
        if let Some(min) = min {
            query = query.where_at_least("duration");
            bounds.push(i64::from(min));
        }
        if let Some(max) = max {
            query = query.where_at_most("duration");
            bounds.push(i64::from(max));
        }
        let sql = query.build();

        let rows = bounds
            .into_iter()
            .fold(sqlx::query(&sql), |query, value| query.bind(value))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error(table, "preparation_time_ids_in_range"))?;

        rows.iter().map(|row| decode_uuid(row, "id")).collect()
    }

    /// Distinct recipes that have a live category link and satisfy every supplied facet
    ///
    /// # Errors
    ///
    /// Returns `QueryError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn candidate_recipe_ids(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        let anchor = MetadataKind::Category;
        let mut query =
            LiveQuery::select_aliased("a0.recipe_id", anchor.association_table(), "a0");
        for (index, kind) in [
            MetadataKind::Tag,
            MetadataKind::DifficultyLevel,
            MetadataKind::CuisineType,
            MetadataKind::PreparationTime,
        ]
        .into_iter()
        .enumerate()
        {
            let alias = format!("a{}", index + 1);
            query = query.left_join_live(
                kind.association_table(),
                &alias,
                &format!("{alias}.recipe_id = a0.recipe_id"),
            );
        }

        let mut binds: Vec<String> = Vec::new();
        let equalities = [
            ("a0.recipe_id", filter.recipe_id),
            ("a0.category_id", filter.category_id),
            ("a1.tag_id", filter.tag_id),
            ("a2.difficulty_level_id", filter.difficulty_level_id),
            ("a3.cuisine_type_id", filter.cuisine_type_id),
        ];
        for (column, value) in equalities {
            if let Some(id) = value {
                query = query.where_eq(column);
                binds.push(id.to_string());
            }
        }
        if let Some(ids) = &filter.preparation_time_ids {
            query = query.where_in("a4.preparation_time_id", ids.len());
            binds.extend(ids.iter().map(Uuid::to_string));
        }

        let sql = query.group_by("a0.recipe_id").build();
        debug!(sql = %sql, params = binds.len(), "candidate selection");

        let rows = binds
            .into_iter()
            .fold(sqlx::query(&sql), |query, value| query.bind(value))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error(anchor.association_table(), "candidate_recipe_ids"))?;

        rows.iter().map(|row| decode_uuid(row, "recipe_id")).collect()
    }

    /// Live linked entity ids of `kind` for a recipe, oldest link first
    ///
    /// # Errors
    ///
    /// Returns `QueryError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn association_lookup(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        let table = kind.association_table();
        let column = kind.association_column();
        let sql = LiveQuery::select(column, table)
            .where_eq("recipe_id")
            .order_by(&format!("created_at ASC, {column} ASC"))
            .build();

        let rows = sqlx::query(&sql)
            .bind(recipe_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error(table, "association_lookup"))?;

        rows.iter().map(|row| decode_uuid(row, column)).collect()
    }

    /// Link a recipe to a live entity of `kind`
    ///
    /// Single-valued kinds replace the recipe's previous link. Re-linking a soft-deleted
    /// pair revives it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity is not live, `QueryError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn link(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let table = kind.association_table();
        let column = kind.association_column();
        let now = timestamp(Utc::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error(table, "link"))?;

        let entity_sql = LiveQuery::select("id", kind.table()).where_eq("id").build();
        let entity = sqlx::query(&entity_sql)
            .bind(entity_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error(kind.table(), "link"))?;
        if entity.is_none() {
            return Err(DatabaseError::NotFound {
                entity_type: kind.table(),
                entity_id: entity_id.to_string(),
            });
        }

        if kind.is_single_valued() {
            let replace = format!(
                "UPDATE {table} SET deleted_at = $1 WHERE recipe_id = $2 AND {column} <> $3 AND {LIVE}"
            );
            sqlx::query(&replace)
                .bind(now.clone())
                .bind(recipe_id.to_string())
                .bind(entity_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_error(table, "link"))?;
        }

        let revive = format!(
            "UPDATE {table} SET deleted_at = NULL, created_at = $1 \
             WHERE recipe_id = $2 AND {column} = $3 AND deleted_at IS NOT NULL"
        );
        sqlx::query(&revive)
            .bind(now.clone())
            .bind(recipe_id.to_string())
            .bind(entity_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error(table, "link"))?;

        let existing = format!("SELECT recipe_id FROM {table} WHERE recipe_id = $1 AND {column} = $2");
        let row = sqlx::query(&existing)
            .bind(recipe_id.to_string())
            .bind(entity_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error(table, "link"))?;
        if row.is_none() {
            let insert = format!(
                "INSERT INTO {table} (recipe_id, {column}, created_at) VALUES ($1, $2, $3)"
            );
            sqlx::query(&insert)
                .bind(recipe_id.to_string())
                .bind(entity_id.to_string())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(storage_error(table, "link"))?;
        }

        tx.commit().await.map_err(storage_error(table, "link"))?;
        debug!(%recipe_id, %entity_id, "association linked");
        Ok(())
    }

    /// Soft-delete the link between a recipe and an entity; idempotent
    ///
    /// # Errors
    ///
    /// Returns `QueryError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn unlink(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let table = kind.association_table();
        let column = kind.association_column();
        let sql = format!(
            "UPDATE {table} SET deleted_at = $1 WHERE recipe_id = $2 AND {column} = $3 AND {LIVE}"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error(table, "unlink"))?;
        sqlx::query(&sql)
            .bind(timestamp(Utc::now()))
            .bind(recipe_id.to_string())
            .bind(entity_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error(table, "unlink"))?;
        tx.commit().await.map_err(storage_error(table, "unlink"))?;
        Ok(())
    }
}
