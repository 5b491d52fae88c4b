// ABOUTME: Bearer authentication and role gate in front of every metadata route
// ABOUTME: Injects validated claims and the authenticated user into request extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::auth::{AuthenticatedUser, OidcAuthenticator, ValidatedClaims};
use crate::errors::{AppError, AppResult};

/// State for [`require_role`]: who validates tokens and which role admits a request
#[derive(Clone)]
pub struct RoleGate {
    authenticator: Arc<OidcAuthenticator>,
    required_role: &'static str,
}

impl RoleGate {
    /// Gate admitting tokens that carry `required_role`
    #[must_use]
    pub const fn new(authenticator: Arc<OidcAuthenticator>, required_role: &'static str) -> Self {
        Self {
            authenticator,
            required_role,
        }
    }
}

/// Extract the bearer token from the `Authorization` header
///
/// # Errors
///
/// `AuthRequired` when the header is missing, `AuthInvalid` when it is not a bearer token
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("invalid authorization header"))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::auth_invalid("invalid authorization header")),
    }
}

/// Authenticate the request and admit it only if the token carries the gate's role
///
/// # Errors
///
/// Any authentication or authorization failure, rendered as `401`
pub async fn require_role(
    State(gate): State<RoleGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .inspect_err(|e| debug!(path = %req.uri().path(), reason = %e.message, "rejected"))?
        .to_owned();

    let claims = gate.authenticator.validate_token(&token).await?;
    if !claims.has_role(gate.required_role) {
        warn!(
            subject = %claims.subject,
            required_role = gate.required_role,
            "user failed authorization check"
        );
        return Err(AppError::permission_denied("insufficient permissions"));
    }

    let user = AuthenticatedUser::from_subject(&claims.subject)?;
    debug!(user = %user, "request authorized");
    req.extensions_mut().insert(user);
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(AppError::auth_required)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ValidatedClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(AppError::auth_required)
    }
}
