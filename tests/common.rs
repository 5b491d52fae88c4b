// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, static-key token issuer and a fully wired router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `cookbook_metadata`
//!
//! Tokens are signed with an HS256 secret published to the authenticator as a static
//! `oct` key, so no test reaches the network.

use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use cookbook_metadata::{
    auth::OidcAuthenticator,
    config::{DatabaseConfig, OAuthConfig, ServiceConfig},
    context::ServerResources,
    database::Database,
    routes,
};
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

static INIT_LOGGER: Once = Once::new();

/// Secret behind the test signing key
pub const TEST_SECRET: &[u8] = b"metadata-service-integration-test-secret";
/// `kid` of the test signing key
pub const TEST_KID: &str = "test-key";
/// Issuer domain the authenticator trusts
pub const TEST_DOMAIN: &str = "login.example.com";
/// Expected `aud` claim
pub const TEST_AUDIENCE: &str = "metadata-api";
/// Client whose `resource_access` roles count
pub const TEST_CLIENT_ID: &str = "cookbook-admin";
/// Subject used by [`admin_token`]
pub const ADMIN_SUBJECT: &str = "auth0|admin-1";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh, migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::in_memory().await?)
}

/// OAuth settings matching the tokens minted by [`sign_token`]
pub fn test_oauth_config() -> OAuthConfig {
    OAuthConfig {
        domain: TEST_DOMAIN.to_owned(),
        client_id: TEST_CLIENT_ID.to_owned(),
        audience: TEST_AUDIENCE.to_owned(),
        algorithms: vec!["HS256".to_owned()],
        ..OAuthConfig::default()
    }
}

/// Complete configuration for an in-memory service
pub fn test_service_config() -> ServiceConfig {
    ServiceConfig {
        oauth: test_oauth_config(),
        database: DatabaseConfig {
            url: Some("sqlite::memory:".to_owned()),
            ..DatabaseConfig::default()
        },
        ..ServiceConfig::default()
    }
}

/// Key set holding the HS256 test key
pub fn test_key_set() -> JwkSet {
    serde_json::from_value(json!({
        "keys": [{
            "kty": "oct",
            "kid": TEST_KID,
            "alg": "HS256",
            "k": URL_SAFE_NO_PAD.encode(TEST_SECRET),
        }]
    }))
    .expect("test key set")
}

/// Authenticator that trusts only the test key
pub fn create_test_authenticator() -> Arc<OidcAuthenticator> {
    Arc::new(
        OidcAuthenticator::with_static_keys(&test_oauth_config(), test_key_set())
            .expect("test authenticator"),
    )
}

/// Standard claims for `subject`; callers may override any field
pub fn standard_claims(subject: &str) -> Value {
    json!({
        "sub": subject,
        "iss": format!("https://{TEST_DOMAIN}/"),
        "aud": TEST_AUDIENCE,
        "iat": Utc::now().timestamp(),
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    })
}

/// Sign arbitrary claims with the test key
pub fn sign_claims(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KID.to_owned());
    encode(&header, claims, &EncodingKey::from_secret(TEST_SECRET)).expect("sign token")
}

/// Token for `subject` carrying `roles` in the `roles` claim
pub fn sign_token(subject: &str, roles: &[&str]) -> String {
    let mut claims = standard_claims(subject);
    claims["roles"] = json!(roles);
    sign_claims(&claims)
}

/// Token admitted by the administrator gate
pub fn admin_token() -> String {
    sign_token(ADMIN_SUBJECT, &["administrator"])
}

/// Services wired over a fresh in-memory database
pub async fn create_test_resources() -> Result<ServerResources> {
    let database = create_test_database().await?;
    Ok(ServerResources::new(
        database,
        create_test_authenticator(),
        test_service_config(),
    ))
}

/// The full router, middleware included, over a fresh in-memory database
pub async fn create_test_router() -> Result<(Router, ServerResources)> {
    let resources = create_test_resources().await?;
    Ok((routes::build_router(&resources), resources))
}
