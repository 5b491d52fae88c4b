// ABOUTME: Unauthenticated health endpoint for load balancers and orchestrators
// ABOUTME: Answers only after a trivial database round-trip succeeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::constants::{messages, service_names};
use crate::database::Database;
use crate::errors::AppError;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(database: Database) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .with_state(database)
    }

    async fn health_handler(State(database): State<Database>) -> Result<Json<Value>, AppError> {
        database
            .ping()
            .await
            .map_err(|e| {
                error!(error = %e, "health check failed");
                AppError::internal(messages::INTERNAL_SERVER_ERROR).with_source(e)
            })?;

        Ok(Json(json!({
            "status": "ok",
            "service": service_names::METADATA_SERVICE,
        })))
    }
}
