// ABOUTME: REST handler for the multi-facet metadata search
// ABOUTME: Decodes the filter, runs the search and returns the hydrated recipe list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use cookbook_core::models::MetadataSearchRequest;
use tracing::debug;

use crate::auth::ValidatedClaims;
use crate::constants::routes::API_ROOT;
use crate::errors::AppError;
use crate::services::SearchService;

/// Search routes handler
pub struct SearchRoutes;

impl SearchRoutes {
    /// Create the search route
    pub fn routes(service: SearchService) -> Router {
        Router::new()
            .route(&format!("{API_ROOT}/search"), post(Self::handle_search))
            .with_state(service)
    }

    /// Handle POST /search
    async fn handle_search(
        State(service): State<SearchService>,
        claims: ValidatedClaims,
        payload: Result<Json<MetadataSearchRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(|rejection| {
            debug!(reason = %rejection.body_text(), "search filter rejected");
            AppError::invalid_input(rejection.body_text())
        })?;

        let results = service.search(request).await?;
        debug!(subject = %claims.subject, results = results.len(), "search handled");
        Ok((StatusCode::OK, Json(results)).into_response())
    }
}
