// ABOUTME: REST handlers for the five metadata kinds, generic over the entity type
// ABOUTME: Parses path ids and JSON bodies, dispatches to the service, emits status codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! Metadata CRUD routes
//!
//! Each kind is mounted at `/api/v2/metadata/<kind>` with the same five endpoints.
//! Handlers do no storage work of their own.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cookbook_core::models::MetadataEntity;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::constants::{messages, routes::API_ROOT};
use crate::errors::AppError;
use crate::services::MetadataService;

/// Metadata routes handler
pub struct MetadataRoutes;

impl MetadataRoutes {
    /// Create the collection and item routes for one kind
    pub fn routes<E: MetadataEntity>(service: MetadataService<E>) -> Router {
        let collection = format!("{API_ROOT}/{}", E::KIND.label());
        let item = format!("{collection}/:id");

        Router::new()
            .route(
                &collection,
                get(Self::handle_list::<E>).post(Self::handle_create::<E>),
            )
            .route(
                &item,
                get(Self::handle_get::<E>)
                    .put(Self::handle_update::<E>)
                    .delete(Self::handle_delete::<E>),
            )
            .with_state(service)
    }

    fn parse_id<E: MetadataEntity>(raw: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(raw).map_err(|e| {
            debug!(kind = %E::KIND, id = raw, error = %e, "path id rejected");
            AppError::invalid_input(E::KIND.invalid_id_message())
        })
    }

    /// Create bodies are rejected with a fixed message
    fn parse_create_body<E: MetadataEntity>(
        payload: Result<Json<E>, JsonRejection>,
    ) -> Result<E, AppError> {
        payload.map(|Json(entity)| entity).map_err(|rejection| {
            debug!(kind = %E::KIND, reason = %rejection.body_text(), "create body rejected");
            AppError::invalid_input(messages::UNEXPECTED_JSON)
        })
    }

    /// Update bodies surface the decoder message, like search
    fn parse_update_body<E: MetadataEntity>(
        payload: Result<Json<E>, JsonRejection>,
    ) -> Result<E, AppError> {
        payload.map(|Json(entity)| entity).map_err(|rejection| {
            let reason = rejection.body_text();
            debug!(kind = %E::KIND, %reason, "update body rejected");
            AppError::invalid_input(reason)
        })
    }

    /// Handle GET /<kind>
    async fn handle_list<E: MetadataEntity>(
        State(service): State<MetadataService<E>>,
    ) -> Result<Response, AppError> {
        let entities = service.find_all().await?;
        Ok((StatusCode::OK, Json(entities)).into_response())
    }

    /// Handle GET /<kind>/:id
    async fn handle_get<E: MetadataEntity>(
        State(service): State<MetadataService<E>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = Self::parse_id::<E>(&id)?;
        let entity = service.find_one(id).await?;
        Ok((StatusCode::OK, Json(entity)).into_response())
    }

    /// Handle POST /<kind>
    async fn handle_create<E: MetadataEntity>(
        State(service): State<MetadataService<E>>,
        user: AuthenticatedUser,
        payload: Result<Json<E>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let entity = Self::parse_create_body(payload)?;
        let created = service.create(&entity).await?;
        debug!(kind = %E::KIND, id = %created.id(), user = %user, "create handled");
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    /// Handle PUT /<kind>/:id; the path id replaces any id in the body
    async fn handle_update<E: MetadataEntity>(
        State(service): State<MetadataService<E>>,
        user: AuthenticatedUser,
        Path(id): Path<String>,
        payload: Result<Json<E>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let id = Self::parse_id::<E>(&id)?;
        let mut entity = Self::parse_update_body(payload)?;
        entity.set_id(id);

        let updated = service.update(&entity).await?;
        debug!(kind = %E::KIND, %id, user = %user, "update handled");
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /<kind>/:id
    async fn handle_delete<E: MetadataEntity>(
        State(service): State<MetadataService<E>>,
        user: AuthenticatedUser,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = Self::parse_id::<E>(&id)?;
        service.delete(id).await?;
        debug!(kind = %E::KIND, %id, user = %user, "delete handled");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
