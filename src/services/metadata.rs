// ABOUTME: Generic lifecycle service for categories, tags, cuisine types, levels and durations
// ABOUTME: Validates natural keys, runs existence and uniqueness pre-checks, maps gateway errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::internal_error;
use crate::constants::messages;
use crate::database::repositories::MetadataRepository;
use crate::errors::{AppError, AppResult, DatabaseError};
use cookbook_core::models::MetadataEntity;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Lifecycle rules for one metadata kind
pub struct MetadataService<E: MetadataEntity> {
    repository: Arc<dyn MetadataRepository<E>>,
}

impl<E: MetadataEntity> Clone for MetadataService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<E: MetadataEntity> MetadataService<E> {
    /// Create a service over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn MetadataRepository<E>>) -> Self {
        Self { repository }
    }

    /// Every live entity in insertion order
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when there are none, `InternalError` on storage failure
    pub async fn find_all(&self) -> AppResult<Vec<E>> {
        match self.repository.find_all().await {
            Ok(records) => Ok(records.into_iter().map(E::from_record).collect()),
            Err(e) if e.is_not_found() => Err(AppError::not_found(E::KIND.none_found_message())),
            Err(e) => Err(internal_error(e)),
        }
    }

    /// The live entity with `id`
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when no live row has this id, `InternalError` on storage failure
    pub async fn find_one(&self, id: Uuid) -> AppResult<E> {
        match self.repository.find_one(id).await {
            Ok(record) => Ok(E::from_record(record)),
            Err(e) if e.is_not_found() => Err(AppError::not_found(E::KIND.not_found_message())),
            Err(e) => Err(internal_error(e)),
        }
    }

    /// Create an entity; the id is assigned here and must be absent on input
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a supplied id or an invalid key, `ResourceAlreadyExists` when a
    /// live entity already carries the key, `InternalError` on storage failure
    pub async fn create(&self, entity: &E) -> AppResult<E> {
        if !entity.id().is_nil() {
            debug!(kind = %E::KIND, id = %entity.id(), "create rejected: id supplied");
            return Err(AppError::invalid_input(messages::EXISTING_ID_ON_CREATE));
        }
        Self::validate(entity)?;

        match self.repository.find_by_natural_key(entity).await {
            Ok(existing) => {
                debug!(kind = %E::KIND, id = %existing.id, "create rejected: key taken");
                return Err(AppError::conflict(E::KIND.already_exists_message()));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(internal_error(e)),
        }

        let record = self
            .repository
            .create(entity)
            .await
            .map_err(Self::write_error)?;
        info!(kind = %E::KIND, id = %record.id, key = %record.key, "created");
        Ok(E::from_record(record))
    }

    /// Replace the natural key of the live entity addressed by `entity.id()`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an invalid key, `ResourceNotFound` when the entity does not
    /// exist, `ResourceAlreadyExists` when another live entity carries the key,
    /// `InternalError` on storage failure
    pub async fn update(&self, entity: &E) -> AppResult<E> {
        Self::validate(entity)?;

        match self.repository.find_one(entity.id()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return Err(AppError::not_found(E::KIND.nothing_to_update_message()));
            }
            Err(e) => return Err(internal_error(e)),
        }

        let record = self.repository.update(entity).await.map_err(|e| {
            if e.is_not_found() {
                AppError::not_found(E::KIND.nothing_to_update_message())
            } else {
                Self::write_error(e)
            }
        })?;
        info!(kind = %E::KIND, id = %record.id, key = %record.key, "updated");
        Ok(E::from_record(record))
    }

    /// Soft-delete the live entity with `id`
    ///
    /// Association rows pointing at the entity are left untouched.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when no live entity has this id, `InternalError` on storage failure
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let record = match self.repository.find_one(id).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                return Err(AppError::not_found(E::KIND.nothing_to_delete_message()));
            }
            Err(e) => return Err(internal_error(e)),
        };

        let entity = E::from_record(record);
        self.repository.delete(&entity).await.map_err(|e| {
            if e.is_not_found() {
                AppError::not_found(E::KIND.nothing_to_delete_message())
            } else {
                internal_error(e)
            }
        })?;
        info!(kind = %E::KIND, %id, "deleted");
        Ok(())
    }

    fn validate(entity: &E) -> AppResult<()> {
        E::validate_key(entity.key()).map_err(|message| {
            debug!(kind = %E::KIND, key = %entity.key(), reason = message, "validation rejected");
            AppError::invalid_input(message)
        })
    }

    fn write_error(error: DatabaseError) -> AppError {
        if error.is_conflict() {
            AppError::conflict(E::KIND.already_exists_message()).with_source(error)
        } else {
            internal_error(error)
        }
    }
}
