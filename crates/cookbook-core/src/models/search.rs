// ABOUTME: Request and result DTOs for the multi-facet metadata search
// ABOUTME: Every facet is optional; a nil id counts as an absent facet
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Search filter; absent facets do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSearchRequest {
    /// Restrict to a single recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<Uuid>,
    /// Recipe must carry this category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// Recipe must carry this tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<Uuid>,
    /// Recipe must have this difficulty level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level_id: Option<Uuid>,
    /// Recipe must have this cuisine type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type_id: Option<Uuid>,
    /// Lower preparation-time bound in minutes, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_prep_time: Option<u32>,
    /// Upper preparation-time bound in minutes, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prep_time: Option<u32>,
}

impl MetadataSearchRequest {
    /// Drop nil ids so they behave like absent facets
    #[must_use]
    pub fn normalized(self) -> Self {
        let present = |id: Option<Uuid>| id.filter(|id| !id.is_nil());
        Self {
            recipe_id: present(self.recipe_id),
            category_id: present(self.category_id),
            tag_id: present(self.tag_id),
            difficulty_level_id: present(self.difficulty_level_id),
            cuisine_type_id: present(self.cuisine_type_id),
            min_prep_time: self.min_prep_time,
            max_prep_time: self.max_prep_time,
        }
    }

    /// Whether either preparation-time bound was supplied
    #[must_use]
    pub const fn has_prep_time_bounds(&self) -> bool {
        self.min_prep_time.is_some() || self.max_prep_time.is_some()
    }

    /// Whether both bounds are present and cannot be satisfied
    #[must_use]
    pub fn has_empty_prep_time_range(&self) -> bool {
        matches!((self.min_prep_time, self.max_prep_time), (Some(min), Some(max)) if min > max)
    }
}

/// One matching recipe with all of its live metadata links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSearchResult {
    /// Matching recipe
    pub recipe_id: Uuid,
    /// Every linked category
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// Every linked tag
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    /// Linked difficulty level, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level_id: Option<Uuid>,
    /// Linked preparation time, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_time_id: Option<Uuid>,
    /// Linked cuisine type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type_id: Option<Uuid>,
}
