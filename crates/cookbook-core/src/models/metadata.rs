// ABOUTME: Metadata entity DTOs and the trait that makes them generic over kind
// ABOUTME: Category, Tag, CuisineType, DifficultyLevel, PreparationTime and their stored record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use super::MetadataKind;
use crate::constants::{limits, messages};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::{Debug, Display};
use uuid::Uuid;

/// A stored metadata row, live or soft-deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord<K> {
    /// Identifier assigned on creation
    pub id: Uuid,
    /// Natural key: name, level or duration
    pub key: K,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp; `None` for live rows
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<K> MetadataRecord<K> {
    /// Whether the row is visible to reads
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A metadata DTO that can be stored, validated and served generically
///
/// Each kind carries a UUID `id` (nil when absent on the wire) and one natural key.
pub trait MetadataEntity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Which kind this DTO represents
    const KIND: MetadataKind;

    /// Natural key type (`String` for names, `u32` for levels and durations)
    type Key: Clone + Debug + Display + PartialEq + Send + Sync + 'static;

    /// Build a DTO from its parts
    fn from_parts(id: Uuid, key: Self::Key) -> Self;

    /// Identifier, nil when the caller supplied none
    fn id(&self) -> Uuid;

    /// Replace the identifier
    fn set_id(&mut self, id: Uuid);

    /// Natural key
    fn key(&self) -> &Self::Key;

    /// Check the natural key, returning the user-visible rejection message
    ///
    /// An empty name or a zero level/duration always yields [`messages::NAME_EMPTY`].
    ///
    /// # Errors
    ///
    /// Returns the message describing the first violated rule.
    fn validate_key(key: &Self::Key) -> Result<(), &'static str>;

    /// Convert a stored row into its DTO
    #[must_use]
    fn from_record(record: MetadataRecord<Self::Key>) -> Self {
        Self::from_parts(record.id, record.key)
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err(messages::NAME_EMPTY);
    }
    if name.chars().count() > limits::MAX_NAME_LENGTH {
        return Err(messages::NAME_TOO_LONG);
    }
    Ok(())
}

macro_rules! named_entity {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            /// Identifier
            #[serde(default)]
            pub id: Uuid,
            /// Unique display name
            #[serde(default)]
            pub name: String,
        }

        impl MetadataEntity for $name {
            const KIND: MetadataKind = $kind;
            type Key = String;

            fn from_parts(id: Uuid, name: String) -> Self {
                Self { id, name }
            }

            fn id(&self) -> Uuid {
                self.id
            }

            fn set_id(&mut self, id: Uuid) {
                self.id = id;
            }

            fn key(&self) -> &String {
                &self.name
            }

            fn validate_key(name: &String) -> Result<(), &'static str> {
                validate_name(name)
            }
        }
    };
}

named_entity!(
    /// Recipe category
    Category,
    MetadataKind::Category
);
named_entity!(
    /// Recipe tag
    Tag,
    MetadataKind::Tag
);
named_entity!(
    /// Cuisine type
    CuisineType,
    MetadataKind::CuisineType
);

/// Difficulty level, `1..=5`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    /// Identifier
    #[serde(default)]
    pub id: Uuid,
    /// Difficulty, 1 being easiest
    #[serde(default)]
    pub level: u32,
}

impl MetadataEntity for DifficultyLevel {
    const KIND: MetadataKind = MetadataKind::DifficultyLevel;
    type Key = u32;

    fn from_parts(id: Uuid, level: u32) -> Self {
        Self { id, level }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn key(&self) -> &u32 {
        &self.level
    }

    fn validate_key(level: &u32) -> Result<(), &'static str> {
        match *level {
            0 => Err(messages::NAME_EMPTY),
            level if level > limits::MAX_DIFFICULTY_LEVEL => Err(messages::LEVEL_OUT_OF_RANGE),
            _ => Ok(()),
        }
    }
}

/// Preparation time in whole minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationTime {
    /// Identifier
    #[serde(default)]
    pub id: Uuid,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
}

impl MetadataEntity for PreparationTime {
    const KIND: MetadataKind = MetadataKind::PreparationTime;
    type Key = u32;

    fn from_parts(id: Uuid, duration: u32) -> Self {
        Self { id, duration }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn key(&self) -> &u32 {
        &self.duration
    }

    fn validate_key(duration: &u32) -> Result<(), &'static str> {
        if *duration == 0 {
            return Err(messages::NAME_EMPTY);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero_values() {
        let tag: Tag = serde_json::from_str("{}").unwrap();
        assert!(tag.id.is_nil());
        assert!(tag.name.is_empty());

        let level: DifficultyLevel = serde_json::from_str(r#"{"level":3}"#).unwrap();
        assert!(level.id.is_nil());
        assert_eq!(level.level, 3);
    }

    #[test]
    fn test_negative_duration_is_a_decode_error() {
        assert!(serde_json::from_str::<PreparationTime>(r#"{"duration":-5}"#).is_err());
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(Category::validate_key(&String::new()), Err(messages::NAME_EMPTY));
        assert_eq!(Category::validate_key(&"   ".to_owned()), Err(messages::NAME_EMPTY));
        assert_eq!(
            CuisineType::validate_key(&"x".repeat(101)),
            Err(messages::NAME_TOO_LONG)
        );
        assert_eq!(CuisineType::validate_key(&"x".repeat(100)), Ok(()));
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(DifficultyLevel::validate_key(&0), Err(messages::NAME_EMPTY));
        assert_eq!(DifficultyLevel::validate_key(&5), Ok(()));
        assert_eq!(
            DifficultyLevel::validate_key(&6),
            Err(messages::LEVEL_OUT_OF_RANGE)
        );
        assert_eq!(PreparationTime::validate_key(&0), Err(messages::NAME_EMPTY));
        assert_eq!(PreparationTime::validate_key(&240), Ok(()));
    }

    #[test]
    fn test_dto_json_is_stable_for_every_kind() {
        let id = Uuid::new_v4();
        let category = Category::from_parts(id, "desserts".to_owned());
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["name"], "desserts");
        assert_eq!(serde_json::from_value::<Category>(json).unwrap(), category);

        let tag = Tag::from_parts(id, "vegan".to_owned());
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json, serde_json::json!({"id": id, "name": "vegan"}));
        assert_eq!(serde_json::from_value::<Tag>(json).unwrap(), tag);

        let cuisine = CuisineType::from_parts(id, "thai".to_owned());
        let json = serde_json::to_value(&cuisine).unwrap();
        assert_eq!(json, serde_json::json!({"id": id, "name": "thai"}));
        assert_eq!(serde_json::from_value::<CuisineType>(json).unwrap(), cuisine);

        let level = DifficultyLevel::from_parts(id, 3);
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json, serde_json::json!({"id": id, "level": 3}));
        assert_eq!(serde_json::from_value::<DifficultyLevel>(json).unwrap(), level);

        let time = PreparationTime::from_parts(id, 45);
        let encoded = serde_json::to_string(&time).unwrap();
        let decoded: PreparationTime = serde_json::from_str(&encoded).unwrap();
        assert_eq!(serde_json::to_string(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_from_record_drops_timestamps() {
        let now = Utc::now();
        let record = MetadataRecord {
            id: Uuid::new_v4(),
            key: 2_u32,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        assert!(record.is_live());
        let dto = DifficultyLevel::from_record(record.clone());
        assert_eq!(dto.id, record.id);
        assert_eq!(dto.level, 2);
    }
}
