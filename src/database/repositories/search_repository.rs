// ABOUTME: Search repository implementation over the association tables
// ABOUTME: Delegates range resolution, candidate selection, lookups and link writes to SearchManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::SearchRepository;
use crate::database::search::CandidateFilter;
use crate::database::{Database, DatabaseError, SearchManager};
use async_trait::async_trait;
use cookbook_core::models::MetadataKind;
use uuid::Uuid;

/// SQLite/PostgreSQL implementation of `SearchRepository`
pub struct SearchRepositoryImpl {
    manager: SearchManager,
}

impl SearchRepositoryImpl {
    /// Create a new repository with the given database connection
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            manager: SearchManager::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl SearchRepository for SearchRepositoryImpl {
    async fn preparation_time_ids_in_range(
        &self,
        min: Option<u32>,
        max: Option<u32>,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        self.manager.preparation_time_ids_in_range(min, max).await
    }

    async fn candidate_recipe_ids(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        self.manager.candidate_recipe_ids(filter).await
    }

    async fn association_lookup(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        self.manager.association_lookup(kind, recipe_id).await
    }

    async fn link(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError> {
        self.manager.link(kind, recipe_id, entity_id).await
    }

    async fn unlink(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError> {
        self.manager.unlink(kind, recipe_id, entity_id).await
    }
}
