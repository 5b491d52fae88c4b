// ABOUTME: Repository traits forming the persistence gateway seen by the services
// ABOUTME: One generic metadata repository per kind plus the search and association repository
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! Repository pattern over the database managers
//!
//! Services depend on these traits, never on the pool, so storage can be swapped
//! or faked in tests.

/// SQL implementation of [`MetadataRepository`]
pub mod metadata_repository;
/// SQL implementation of [`SearchRepository`]
pub mod search_repository;

pub use metadata_repository::MetadataRepositoryImpl;
pub use search_repository::SearchRepositoryImpl;

use super::search::CandidateFilter;
use super::DatabaseError;
use async_trait::async_trait;
use cookbook_core::models::{MetadataEntity, MetadataKind, MetadataRecord};
use uuid::Uuid;

/// Typed storage contract for one metadata kind
#[async_trait]
pub trait MetadataRepository<E: MetadataEntity>: Send + Sync {
    /// Live rows in insertion order; `NotFound` when there are none
    async fn find_all(&self) -> Result<Vec<MetadataRecord<E::Key>>, DatabaseError>;

    /// Live row with `id`
    async fn find_one(&self, id: Uuid) -> Result<MetadataRecord<E::Key>, DatabaseError>;

    /// Live row carrying the natural key of `entity`
    async fn find_by_natural_key(&self, entity: &E)
        -> Result<MetadataRecord<E::Key>, DatabaseError>;

    /// Insert `entity` under a newly generated id; the caller's id is ignored
    async fn create(&self, entity: &E) -> Result<MetadataRecord<E::Key>, DatabaseError>;

    /// Replace the natural key of the live row addressed by `entity.id()`
    async fn update(&self, entity: &E) -> Result<MetadataRecord<E::Key>, DatabaseError>;

    /// Soft-delete the row addressed by `entity.id()`
    async fn delete(&self, entity: &E) -> Result<(), DatabaseError>;
}

/// Read helpers for the search engine and association writes for the recipe subsystem
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Live preparation-time ids with `min <= duration <= max`
    async fn preparation_time_ids_in_range(
        &self,
        min: Option<u32>,
        max: Option<u32>,
    ) -> Result<Vec<Uuid>, DatabaseError>;

    /// Distinct recipes matching every facet of `filter`
    async fn candidate_recipe_ids(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Uuid>, DatabaseError>;

    /// Live linked entity ids of `kind` for a recipe
    async fn association_lookup(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, DatabaseError>;

    /// Link a recipe to an entity
    async fn link(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError>;

    /// Remove the link between a recipe and an entity
    async fn unlink(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> Result<(), DatabaseError>;
}
