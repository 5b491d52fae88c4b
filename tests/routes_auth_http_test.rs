// ABOUTME: HTTP tests for bearer authentication, the administrator gate and ambient middleware
// ABOUTME: Token failures map to 401; health stays public; request ids and CORS headers are set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::Router;
use chrono::{Duration, Utc};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

const CATEGORIES: &str = "/api/v2/metadata/category";

async fn app() -> Router {
    common::create_test_router().await.unwrap().0
}

async fn rejected_with(app: Router, token: &str) -> String {
    let response = AxumTestRequest::get(CATEGORIES)
        .bearer(token)
        .send(app)
        .await;
    assert_eq!(response.status(), 401);
    response.error_message()
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let response = AxumTestRequest::get(CATEGORIES).send(app().await).await;
    assert_eq!(response.status(), 401);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "missing authorization header"})
    );
}

#[tokio::test]
async fn test_non_bearer_authorization_header() {
    let response = AxumTestRequest::post("/api/v2/metadata/search")
        .header("authorization", "Basic YWRtaW46YWRtaW4=")
        .json(&json!({}))
        .send(app().await)
        .await;
    assert_eq!(response.status(), 401);
    assert_eq!(response.error_message(), "invalid authorization header");
}

#[tokio::test]
async fn test_garbage_token() {
    assert_eq!(
        rejected_with(app().await, "not-a-jwt").await,
        "invalid token format"
    );
}

#[tokio::test]
async fn test_token_without_administrator_role() {
    let token = common::sign_token("auth0|viewer", &["viewer"]);
    assert_eq!(
        rejected_with(app().await, &token).await,
        "insufficient permissions"
    );
}

#[tokio::test]
async fn test_expired_token() {
    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["roles"] = json!(["administrator"]);
    claims["exp"] = json!((Utc::now() - Duration::hours(2)).timestamp());
    let token = common::sign_claims(&claims);
    assert_eq!(rejected_with(app().await, &token).await, "token expired");
}

#[tokio::test]
async fn test_foreign_audience_and_issuer() {
    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["roles"] = json!(["administrator"]);
    claims["aud"] = json!("another-api");
    let token = common::sign_claims(&claims);
    assert_eq!(
        rejected_with(app().await, &token).await,
        "invalid token audience"
    );

    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["roles"] = json!(["administrator"]);
    claims["iss"] = json!("https://evil.example.com/");
    let token = common::sign_claims(&claims);
    assert_eq!(
        rejected_with(app().await, &token).await,
        "invalid token issuer"
    );
}

#[tokio::test]
async fn test_token_signed_with_another_key() {
    let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
    header.kid = Some(common::TEST_KID.to_owned());
    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["roles"] = json!(["administrator"]);
    let token = jsonwebtoken::encode(
        &header,
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"some other secret"),
    )
    .unwrap();
    assert_eq!(rejected_with(app().await, &token).await, "invalid token");
}

#[tokio::test]
async fn test_unknown_key_id() {
    let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
    header.kid = Some("rotated-away".to_owned());
    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["roles"] = json!(["administrator"]);
    let token = jsonwebtoken::encode(
        &header,
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(common::TEST_SECRET),
    )
    .unwrap();
    assert_eq!(
        rejected_with(app().await, &token).await,
        "unknown token signing key"
    );
}

#[tokio::test]
async fn test_subject_without_provider_is_rejected() {
    let token = common::sign_token("admin-without-provider", &["administrator"]);
    assert_eq!(
        rejected_with(app().await, &token).await,
        "invalid token subject"
    );
}

#[tokio::test]
async fn test_roles_from_realm_and_client_claims() {
    let app = app().await;

    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["realm_access"] = json!({"roles": ["offline_access", "administrator"]});
    let response = AxumTestRequest::get(CATEGORIES)
        .bearer(&common::sign_claims(&claims))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);

    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["resource_access"] = json!({"cookbook-admin": {"roles": "administrator"}});
    let response = AxumTestRequest::get(CATEGORIES)
        .bearer(&common::sign_claims(&claims))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);

    let mut claims = common::standard_claims(common::ADMIN_SUBJECT);
    claims["resource_access"] = json!({"some-other-client": {"roles": ["administrator"]}});
    let response = AxumTestRequest::get(CATEGORIES)
        .bearer(&common::sign_claims(&claims))
        .send(app)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_health_is_public() {
    let response = AxumTestRequest::get("/health").send(app().await).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "ok", "service": "metadata-service"})
    );
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = app().await;

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "trace-me-123")
        .send(app.clone())
        .await;
    assert_eq!(response.header("x-request-id").as_deref(), Some("trace-me-123"));

    let response = AxumTestRequest::get(CATEGORIES).send(app).await;
    assert_eq!(response.status(), 401);
    let generated = response.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());
}

#[tokio::test]
async fn test_cors_preflight_is_answered_without_a_token() {
    let response = AxumTestRequest::options(CATEGORIES)
        .header("origin", "https://cookbook.example.com")
        .header("access-control-request-method", "POST")
        .send(app().await)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = AxumTestRequest::get("/api/v2/metadata/ingredient")
        .bearer(&common::admin_token())
        .send(app().await)
        .await;
    assert_eq!(response.status(), 404);
}
