// ABOUTME: Main library entry point for the cookbook metadata service
// ABOUTME: Metadata CRUD, association writes and multi-facet search behind OIDC bearer auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

#![deny(unsafe_code)]

//! # Cookbook Metadata Service
//!
//! Owns the recipe metadata of the cookbook: categories, tags, cuisine types, difficulty
//! levels and preparation times, the association tables linking them to recipes, and the
//! metadata search that finds recipes by any combination of those facets.
//!
//! ## Architecture
//!
//! - **Database**: persistence gateway over an `sqlx` pool; soft-delete filtering and
//!   driver error translation live here and nowhere else
//! - **Services**: validation, lifecycle pre-checks and search composition
//! - **Routes**: thin axum handlers mapping the error taxonomy to status codes
//! - **Middleware**: bearer authentication, role gate, CORS and request tracing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cookbook_metadata::database::Database;
//! use cookbook_metadata::database::repositories::MetadataRepositoryImpl;
//! use cookbook_metadata::services::CategoryService;
//! use cookbook_core::models::Category;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let database = Database::in_memory().await?;
//! let categories = CategoryService::new(Arc::new(MetadataRepositoryImpl::<Category>::new(&database)));
//! let created = categories.create(&Category { id: uuid::Uuid::nil(), name: "desserts".into() }).await?;
//! println!("created {}", created.id);
//! # Ok(())
//! # }
//! ```

/// OIDC bearer token validation
pub mod auth;

/// Configuration loading and validation
pub mod config;

/// Messages, limits, defaults and route constants
pub mod constants;

/// Application context shared by the handlers
pub mod context;

/// Persistence gateway
pub mod database;

/// Error taxonomy
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Domain services
pub mod services;
