// ABOUTME: Enumeration of the five recipe metadata kinds and their storage layout
// ABOUTME: Table names, natural key columns, association tables and user-visible labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the metadata kinds attached to recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataKind {
    /// Recipe category such as "desserts"
    Category,
    /// Free-form recipe tag
    Tag,
    /// Cuisine type such as "italian"
    CuisineType,
    /// Difficulty level, a small positive integer
    DifficultyLevel,
    /// Preparation time in minutes
    PreparationTime,
}

impl MetadataKind {
    /// Every kind, in route order
    pub const ALL: [Self; 5] = [
        Self::Category,
        Self::Tag,
        Self::CuisineType,
        Self::DifficultyLevel,
        Self::PreparationTime,
    ];

    /// Singular label used in routes and error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::CuisineType => "cuisineType",
            Self::DifficultyLevel => "difficultyLevel",
            Self::PreparationTime => "preparationTime",
        }
    }

    /// Plural label used by "no ... found" messages
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::CuisineType => "cuisineTypes",
            Self::DifficultyLevel => "difficultyLevels",
            Self::PreparationTime => "preparationTimes",
        }
    }

    /// Entity table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::CuisineType => "cuisine_types",
            Self::DifficultyLevel => "difficulty_levels",
            Self::PreparationTime => "preparation_times",
        }
    }

    /// Natural key column of the entity table
    #[must_use]
    pub const fn key_column(self) -> &'static str {
        match self {
            Self::Category | Self::Tag | Self::CuisineType => "name",
            Self::DifficultyLevel => "level",
            Self::PreparationTime => "duration",
        }
    }

    /// Table linking recipes to entities of this kind
    #[must_use]
    pub const fn association_table(self) -> &'static str {
        match self {
            Self::Category => "recipe_categories",
            Self::Tag => "recipe_tags",
            Self::CuisineType => "recipe_cuisine_types",
            Self::DifficultyLevel => "recipe_difficulty_levels",
            Self::PreparationTime => "recipe_preparation_times",
        }
    }

    /// Entity id column of the association table
    #[must_use]
    pub const fn association_column(self) -> &'static str {
        match self {
            Self::Category => "category_id",
            Self::Tag => "tag_id",
            Self::CuisineType => "cuisine_type_id",
            Self::DifficultyLevel => "difficulty_level_id",
            Self::PreparationTime => "preparation_time_id",
        }
    }

    /// A recipe links to at most one live entity of a single-valued kind
    #[must_use]
    pub const fn is_single_valued(self) -> bool {
        matches!(
            self,
            Self::CuisineType | Self::DifficultyLevel | Self::PreparationTime
        )
    }

    /// `"<kind> not found"`
    #[must_use]
    pub fn not_found_message(self) -> String {
        format!("{} not found", self.label())
    }

    /// `"no <plural> found"`
    #[must_use]
    pub fn none_found_message(self) -> String {
        format!("no {} found", self.plural())
    }

    /// `"invalid <kind> ID"`
    #[must_use]
    pub fn invalid_id_message(self) -> String {
        format!("invalid {} ID", self.label())
    }

    /// `"<kind> already exists"`
    #[must_use]
    pub fn already_exists_message(self) -> String {
        format!("{} already exists", self.label())
    }

    /// `"<kind> does not exist. nothing to update"`
    #[must_use]
    pub fn nothing_to_update_message(self) -> String {
        format!("{} does not exist. nothing to update", self.label())
    }

    /// `"<kind> does not exist. nothing to delete"`
    #[must_use]
    pub fn nothing_to_delete_message(self) -> String {
        format!("{} does not exist. nothing to delete", self.label())
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
