// ABOUTME: Multi-facet metadata search composing candidate selection with per-recipe hydration
// ABOUTME: Resolves the preparation-time range first and short-circuits when it is empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::internal_error;
use crate::database::repositories::SearchRepository;
use crate::database::search::CandidateFilter;
use crate::errors::AppResult;
use cookbook_core::models::{MetadataKind, MetadataSearchRequest, MetadataSearchResult};
use futures_util::{StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Recipes hydrated concurrently; each hydration itself runs five lookups at once
const HYDRATION_CONCURRENCY: usize = 8;

/// Metadata search over the association tables
#[derive(Clone)]
pub struct SearchService {
    repository: Arc<dyn SearchRepository>,
}

impl SearchService {
    /// Create a service over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn SearchRepository>) -> Self {
        Self { repository }
    }

    /// Recipes satisfying every supplied facet, each with its full live metadata
    ///
    /// Nil ids count as absent facets. Recipes without a live category link are never
    /// returned. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// `InternalError` on storage failure
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        request: MetadataSearchRequest,
    ) -> AppResult<Vec<MetadataSearchResult>> {
        let request = request.normalized();

        let preparation_time_ids = if request.has_prep_time_bounds() {
            if request.has_empty_prep_time_range() {
                debug!("preparation time range is empty");
                return Ok(Vec::new());
            }
            let ids = self
                .repository
                .preparation_time_ids_in_range(request.min_prep_time, request.max_prep_time)
                .await
                .map_err(internal_error)?;
            if ids.is_empty() {
                debug!("no preparation time inside the requested range");
                return Ok(Vec::new());
            }
            Some(ids)
        } else {
            None
        };

        let filter = CandidateFilter::from_request(&request, preparation_time_ids);
        let candidates = self
            .repository
            .candidate_recipe_ids(&filter)
            .await
            .map_err(internal_error)?;
        debug!(candidates = candidates.len(), "candidate recipes selected");

        futures_util::stream::iter(candidates)
            .map(|recipe_id| self.hydrate(recipe_id))
            .buffered(HYDRATION_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn hydrate(&self, recipe_id: Uuid) -> AppResult<MetadataSearchResult> {
        let (category_ids, tag_ids, difficulty_levels, preparation_times, cuisine_types) = tokio::try_join!(
            self.lookup(MetadataKind::Category, recipe_id),
            self.lookup(MetadataKind::Tag, recipe_id),
            self.lookup(MetadataKind::DifficultyLevel, recipe_id),
            self.lookup(MetadataKind::PreparationTime, recipe_id),
            self.lookup(MetadataKind::CuisineType, recipe_id),
        )?;

        Ok(MetadataSearchResult {
            recipe_id,
            category_ids,
            tag_ids,
            difficulty_level_id: difficulty_levels.first().copied(),
            preparation_time_id: preparation_times.first().copied(),
            cuisine_type_id: cuisine_types.first().copied(),
        })
    }

    async fn lookup(&self, kind: MetadataKind, recipe_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.repository
            .association_lookup(kind, recipe_id)
            .await
            .map_err(internal_error)
    }
}
