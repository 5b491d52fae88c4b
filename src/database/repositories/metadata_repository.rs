// ABOUTME: Metadata repository implementation over the generic metadata manager
// ABOUTME: Serves categories, tags, cuisine types, difficulty levels and preparation times
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::MetadataRepository;
use crate::database::{Database, DatabaseError, MetadataManager, StorageKey};
use async_trait::async_trait;
use cookbook_core::models::{MetadataEntity, MetadataRecord};
use uuid::Uuid;

/// SQLite/PostgreSQL implementation of `MetadataRepository`
pub struct MetadataRepositoryImpl<E> {
    manager: MetadataManager<E>,
}

impl<E> MetadataRepositoryImpl<E>
where
    E: MetadataEntity,
    E::Key: StorageKey,
{
    /// Create a new repository with the given database connection
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            manager: MetadataManager::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl<E> MetadataRepository<E> for MetadataRepositoryImpl<E>
where
    E: MetadataEntity,
    E::Key: StorageKey,
{
    async fn find_all(&self) -> Result<Vec<MetadataRecord<E::Key>>, DatabaseError> {
        self.manager.find_all().await
    }

    async fn find_one(&self, id: Uuid) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        self.manager.find_one(id).await
    }

    async fn find_by_natural_key(
        &self,
        entity: &E,
    ) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        self.manager.find_by_key(entity.key()).await
    }

    async fn create(&self, entity: &E) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        self.manager.create(entity.key().clone()).await
    }

    async fn update(&self, entity: &E) -> Result<MetadataRecord<E::Key>, DatabaseError> {
        self.manager
            .update(entity.id(), entity.key().clone())
            .await
    }

    async fn delete(&self, entity: &E) -> Result<(), DatabaseError> {
        self.manager.delete(entity.id()).await
    }
}
