// ABOUTME: HTTP middleware for authentication, CORS and request tracing
// ABOUTME: Layers are assembled around the router in `routes::build_router`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

/// Bearer authentication and role gate
pub mod auth;
/// CORS from configuration
pub mod cors;
/// Request ids and tracing spans
pub mod tracing;

pub use auth::{bearer_token, require_role, RoleGate};
pub use cors::setup_cors;
pub use tracing::{create_request_span, with_request_tracing, REQUEST_ID_HEADER};
