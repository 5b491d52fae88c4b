// ABOUTME: Application context built once at startup and shared with every handler
// ABOUTME: Owns the database handle, the metadata services, search and the authenticator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! Dependency wiring
//!
//! `ServerResources` replaces process-wide singletons: `main` builds it, the router
//! borrows the pieces each route group needs.

use std::sync::Arc;

use cookbook_core::models::MetadataEntity;

use crate::auth::OidcAuthenticator;
use crate::config::ServiceConfig;
use crate::database::repositories::{
    MetadataRepositoryImpl, SearchRepository, SearchRepositoryImpl,
};
use crate::database::{Database, StorageKey};
use crate::services::{
    AssociationService, CategoryService, CuisineTypeService, DifficultyLevelService,
    MetadataService, PreparationTimeService, SearchService, TagService,
};

/// Everything a request may need
#[derive(Clone)]
pub struct ServerResources {
    /// Shared connection pool
    pub database: Database,
    /// Category lifecycle
    pub categories: CategoryService,
    /// Tag lifecycle
    pub tags: TagService,
    /// Cuisine type lifecycle
    pub cuisine_types: CuisineTypeService,
    /// Difficulty level lifecycle
    pub difficulty_levels: DifficultyLevelService,
    /// Preparation time lifecycle
    pub preparation_times: PreparationTimeService,
    /// Metadata search
    pub search: SearchService,
    /// Association writes for the recipe subsystem
    pub associations: AssociationService,
    /// Bearer token validation
    pub authenticator: Arc<OidcAuthenticator>,
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,
}

impl ServerResources {
    /// Wire the SQL repositories into the services
    #[must_use]
    pub fn new(
        database: Database,
        authenticator: Arc<OidcAuthenticator>,
        config: ServiceConfig,
    ) -> Self {
        let search_repository: Arc<dyn SearchRepository> =
            Arc::new(SearchRepositoryImpl::new(&database));

        Self {
            categories: metadata_service(&database),
            tags: metadata_service(&database),
            cuisine_types: metadata_service(&database),
            difficulty_levels: metadata_service(&database),
            preparation_times: metadata_service(&database),
            search: SearchService::new(Arc::clone(&search_repository)),
            associations: AssociationService::new(search_repository),
            database,
            authenticator,
            config: Arc::new(config),
        }
    }
}

fn metadata_service<E>(database: &Database) -> MetadataService<E>
where
    E: MetadataEntity,
    E::Key: StorageKey,
{
    MetadataService::new(Arc::new(MetadataRepositoryImpl::<E>::new(database)))
}
