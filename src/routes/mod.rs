// ABOUTME: Route module organization and router assembly for the metadata service
// ABOUTME: Mounts the per-kind CRUD groups and search behind the role gate, health outside it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! HTTP routes
//!
//! Each module contains only route definitions and thin handlers that delegate to the
//! service layer. [`build_router`] adds the middleware stack.

/// Health check route
pub mod health;
/// Generic CRUD routes for the metadata kinds
pub mod metadata;
/// Metadata search route
pub mod search;

pub use health::HealthRoutes;
pub use metadata::MetadataRoutes;
pub use search::SearchRoutes;

use std::sync::Arc;

use axum::{http::StatusCode, middleware, Router};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::constants::routes::REQUIRED_ROLE;
use crate::context::ServerResources;
use crate::middleware::{require_role, setup_cors, with_request_tracing, RoleGate};

/// Routes that require an administrator token
pub fn api_routes(resources: &ServerResources) -> Router {
    let gate = RoleGate::new(Arc::clone(&resources.authenticator), REQUIRED_ROLE);

    Router::new()
        .merge(MetadataRoutes::routes(resources.categories.clone()))
        .merge(MetadataRoutes::routes(resources.tags.clone()))
        .merge(MetadataRoutes::routes(resources.cuisine_types.clone()))
        .merge(MetadataRoutes::routes(resources.difficulty_levels.clone()))
        .merge(MetadataRoutes::routes(resources.preparation_times.clone()))
        .merge(SearchRoutes::routes(resources.search.clone()))
        .layer(middleware::from_fn_with_state(gate, require_role))
}

/// Full application router with the middleware stack
///
/// Outer to inner: request id, trace span, CORS, request body read timeout, processing
/// timeout, authentication and role gate.
pub fn build_router(resources: &ServerResources) -> Router {
    let server = &resources.config.server;

    let router = Router::new()
        .merge(api_routes(resources))
        .merge(HealthRoutes::routes(resources.database.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server.write_timeout(),
        ))
        .layer(RequestBodyTimeoutLayer::new(server.read_timeout()))
        .layer(setup_cors(&resources.config.cors));

    with_request_tracing(router)
}
