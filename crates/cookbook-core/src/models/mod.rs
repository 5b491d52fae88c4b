// ABOUTME: Domain models for recipe metadata and the metadata search
// ABOUTME: Re-exports the kind enumeration, entity DTOs and search DTOs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

/// Metadata kinds and their storage layout
pub mod kind;
/// Entity DTOs and the generic entity trait
pub mod metadata;
/// Search request and result DTOs
pub mod search;

pub use kind::MetadataKind;
pub use metadata::{
    Category, CuisineType, DifficultyLevel, MetadataEntity, MetadataRecord, PreparationTime, Tag,
};
pub use search::{MetadataSearchRequest, MetadataSearchResult};
