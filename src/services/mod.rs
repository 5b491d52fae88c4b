// ABOUTME: Domain service layer enforcing the metadata lifecycle rules
// ABOUTME: Transport-agnostic; the HTTP routes and the recipe subsystem both call into it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! Domain service layer
//!
//! Services validate input, run the existence and uniqueness pre-checks and translate
//! gateway failures into user-visible [`AppError`](crate::errors::AppError)s. They never
//! see the connection pool, only the repository traits.

/// Association writes used by the recipe subsystem
pub mod associations;
/// Generic CRUD service shared by all five metadata kinds
pub mod metadata;
/// Multi-facet metadata search
pub mod search;

pub use associations::AssociationService;
pub use metadata::MetadataService;
pub use search::SearchService;

use cookbook_core::models::{Category, CuisineType, DifficultyLevel, PreparationTime, Tag};

/// Category lifecycle
pub type CategoryService = MetadataService<Category>;
/// Tag lifecycle
pub type TagService = MetadataService<Tag>;
/// Cuisine type lifecycle
pub type CuisineTypeService = MetadataService<CuisineType>;
/// Difficulty level lifecycle
pub type DifficultyLevelService = MetadataService<DifficultyLevel>;
/// Preparation time lifecycle
pub type PreparationTimeService = MetadataService<PreparationTime>;

use crate::constants::messages;
use crate::errors::{AppError, DatabaseError};

/// Hide a storage failure behind the generic message; the gateway has already logged it
fn internal_error(error: DatabaseError) -> AppError {
    AppError::internal(messages::INTERNAL_SERVER_ERROR).with_source(error)
}
