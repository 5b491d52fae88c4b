// ABOUTME: Recipe-to-metadata association writes exposed to the recipe subsystem
// ABOUTME: Linking checks the entity is live; single-valued kinds replace the previous link
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::internal_error;
use crate::database::repositories::SearchRepository;
use crate::errors::{AppError, AppResult};
use cookbook_core::models::MetadataKind;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Maintains the recipe association tables
#[derive(Clone)]
pub struct AssociationService {
    repository: Arc<dyn SearchRepository>,
}

impl AssociationService {
    /// Create a service over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn SearchRepository>) -> Self {
        Self { repository }
    }

    /// Link `recipe_id` to the live entity `entity_id` of `kind`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for nil ids, `ResourceNotFound` when the entity is not live,
    /// `InternalError` on storage failure
    pub async fn link(&self, kind: MetadataKind, recipe_id: Uuid, entity_id: Uuid) -> AppResult<()> {
        Self::require_ids(kind, recipe_id, entity_id)?;
        self.repository
            .link(kind, recipe_id, entity_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::not_found(kind.not_found_message())
                } else {
                    internal_error(e)
                }
            })?;
        info!(%kind, %recipe_id, %entity_id, "association linked");
        Ok(())
    }

    /// Remove the link between `recipe_id` and `entity_id`; unlinking twice is not an error
    ///
    /// # Errors
    ///
    /// `InvalidInput` for nil ids, `InternalError` on storage failure
    pub async fn unlink(
        &self,
        kind: MetadataKind,
        recipe_id: Uuid,
        entity_id: Uuid,
    ) -> AppResult<()> {
        Self::require_ids(kind, recipe_id, entity_id)?;
        self.repository
            .unlink(kind, recipe_id, entity_id)
            .await
            .map_err(internal_error)?;
        info!(%kind, %recipe_id, %entity_id, "association unlinked");
        Ok(())
    }

    /// Live linked entity ids of `kind` for a recipe
    ///
    /// # Errors
    ///
    /// `InternalError` on storage failure
    pub async fn linked(&self, kind: MetadataKind, recipe_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.repository
            .association_lookup(kind, recipe_id)
            .await
            .map_err(internal_error)
    }

    fn require_ids(kind: MetadataKind, recipe_id: Uuid, entity_id: Uuid) -> AppResult<()> {
        if recipe_id.is_nil() {
            return Err(AppError::invalid_input("invalid recipe ID"));
        }
        if entity_id.is_nil() {
            return Err(AppError::invalid_input(kind.invalid_id_message()));
        }
        Ok(())
    }
}
