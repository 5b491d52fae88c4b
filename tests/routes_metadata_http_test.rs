// ABOUTME: HTTP tests for the metadata CRUD routes through the full middleware stack
// ABOUTME: Status codes, error envelopes and DTO bodies for every metadata kind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::Router;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

const ROOT: &str = "/api/v2/metadata";

async fn app() -> (Router, String) {
    let (router, _resources) = common::create_test_router().await.unwrap();
    (router, common::admin_token())
}

fn url(kind: &str) -> String {
    format!("{ROOT}/{kind}")
}

fn item_url(kind: &str, id: &str) -> String {
    format!("{ROOT}/{kind}/{id}")
}

async fn create(app: &Router, token: &str, kind: &str, body: Value) -> Value {
    let response = AxumTestRequest::post(&url(kind))
        .bearer(token)
        .json(&body)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    response.json()
}

#[tokio::test]
async fn test_category_lifecycle() {
    let (app, token) = app().await;

    let created = create(&app, &token, "category", json!({"name": "desserts"})).await;
    let id = created["id"].as_str().unwrap().to_owned();
    assert!(!Uuid::parse_str(&id).unwrap().is_nil());
    assert_eq!(created, json!({"id": id, "name": "desserts"}));

    let response = AxumTestRequest::get(&item_url("category", &id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>(), json!({"id": id, "name": "desserts"}));

    let response = AxumTestRequest::put(&item_url("category", &id))
        .bearer(&token)
        .json(&json!({"name": "sweets"}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>(), json!({"id": id, "name": "sweets"}));

    let response = AxumTestRequest::delete(&item_url("category", &id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);
    assert!(response.text().is_empty());

    let response = AxumTestRequest::get(&item_url("category", &id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.error_message(), "category not found");
}

#[tokio::test]
async fn test_invalid_path_id_is_bad_request() {
    let (app, token) = app().await;

    let response = AxumTestRequest::get(&item_url("tag", "not-a-uuid"))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.json::<Value>(), json!({"error": "invalid tag ID"}));

    let response = AxumTestRequest::delete(&item_url("cuisineType", "42"))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "invalid cuisineType ID");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, token) = app().await;

    let response = AxumTestRequest::post(&url("cuisineType"))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "unexpected JSON input"})
    );

    let response = AxumTestRequest::post(&url("preparationTime"))
        .bearer(&token)
        .raw_json(r#"{"duration": -5}"#)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "unexpected JSON input");

    let response = AxumTestRequest::post(&url("tag"))
        .bearer(&token)
        .raw_json("{\"name\": ")
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "unexpected JSON input");
}

#[tokio::test]
async fn test_malformed_update_body_reports_decoder_error() {
    let (app, token) = app().await;
    let created = create(&app, &token, "category", json!({"name": "soups"})).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&item_url("category", id))
        .bearer(&token)
        .raw_json("{\"name\": ")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    let message = response.error_message();
    assert_ne!(message, "unexpected JSON input");
    assert!(message.starts_with("Failed to parse the request body as JSON"));

    let response = AxumTestRequest::put(&item_url("preparationTime", id))
        .bearer(&token)
        .raw_json(r#"{"duration": "long"}"#)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert!(response.error_message().contains("duration"));

    let response = AxumTestRequest::put(&item_url("category", id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert!(response.error_message().contains("Content-Type"));

    let response = AxumTestRequest::get(&item_url("category", id))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.json::<Value>(), json!({"id": id, "name": "soups"}));
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, token) = app().await;

    let response = AxumTestRequest::post(&url("tag"))
        .bearer(&token)
        .json(&json!({"id": Uuid::new_v4(), "name": "vegan"}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        response.error_message(),
        "existing id on new element is not allowed"
    );

    let response = AxumTestRequest::post(&url("category"))
        .bearer(&token)
        .json(&json!({"name": ""}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "name is empty");

    let response = AxumTestRequest::post(&url("difficultyLevel"))
        .bearer(&token)
        .json(&json!({"level": 0}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "name is empty");

    let response = AxumTestRequest::post(&url("difficultyLevel"))
        .bearer(&token)
        .json(&json!({"level": 6}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "level must be between 1 and 5");

    let response = AxumTestRequest::post(&url("cuisineType"))
        .bearer(&token)
        .json(&json!({"name": "x".repeat(101)}))
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), "name exceeds 100 characters");
}

#[tokio::test]
async fn test_duplicate_name_is_reported_as_server_error() {
    let (app, token) = app().await;
    create(&app, &token, "tag", json!({"name": "vegan"})).await;

    let response = AxumTestRequest::post(&url("tag"))
        .bearer(&token)
        .json(&json!({"name": "vegan"}))
        .send(app)
        .await;
    assert_eq!(response.status(), 500);
    assert_eq!(response.error_message(), "tag already exists");
}

#[tokio::test]
async fn test_list_uses_plural_not_found_and_hides_deleted() {
    let (app, token) = app().await;

    let response = AxumTestRequest::get(&url("tag"))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.error_message(), "no tags found");

    let kept = create(&app, &token, "tag", json!({"name": "vegan"})).await;
    let removed = create(&app, &token, "tag", json!({"name": "spicy"})).await;
    let response = AxumTestRequest::delete(&item_url("tag", removed["id"].as_str().unwrap()))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);

    let response = AxumTestRequest::get(&url("tag"))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>(), json!([kept]));
}

#[tokio::test]
async fn test_update_uses_path_id() {
    let (app, token) = app().await;
    let created = create(&app, &token, "cuisineType", json!({"name": "thai"})).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&item_url("cuisineType", id))
        .bearer(&token)
        .json(&json!({"id": Uuid::new_v4(), "name": "vietnamese"}))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({"id": id, "name": "vietnamese"})
    );
}

#[tokio::test]
async fn test_update_and_delete_of_missing_rows() {
    let (app, token) = app().await;
    let missing = Uuid::new_v4().to_string();

    let response = AxumTestRequest::put(&item_url("category", &missing))
        .bearer(&token)
        .json(&json!({"name": "sweets"}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(
        response.error_message(),
        "category does not exist. nothing to update"
    );

    let response = AxumTestRequest::delete(&item_url("category", &missing))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(
        response.error_message(),
        "category does not exist. nothing to delete"
    );

    let response = AxumTestRequest::get(&item_url("difficultyLevel", &missing))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.error_message(), "difficultyLevel not found");
}

#[tokio::test]
async fn test_numeric_kinds_round_trip_over_http() {
    let (app, token) = app().await;

    let level = create(&app, &token, "difficultyLevel", json!({"level": 3})).await;
    assert_eq!(level["level"], 3);
    let time = create(&app, &token, "preparationTime", json!({"duration": 45})).await;
    assert_eq!(time["duration"], 45);

    let response = AxumTestRequest::get(&item_url(
        "preparationTime",
        time["id"].as_str().unwrap(),
    ))
    .bearer(&token)
    .send(app.clone())
    .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>(), time);

    let response = AxumTestRequest::get(&url("difficultyLevel"))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.json::<Value>(), json!([level]));
}

#[tokio::test]
async fn test_search_route() {
    let (app, token) = app().await;

    let response = AxumTestRequest::post(&url("search"))
        .bearer(&token)
        .json(&json!({}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>(), json!([]));

    let response = AxumTestRequest::post(&url("search"))
        .bearer(&token)
        .raw_json(r#"{"min_prep_time": "soon"}"#)
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
    assert!(!response.error_message().is_empty());
}

#[tokio::test]
async fn test_search_route_returns_hydrated_results() {
    let (app, resources) = common::create_test_router().await.unwrap();
    let token = common::admin_token();

    let category = create(&app, &token, "category", json!({"name": "desserts"})).await;
    let category_id = Uuid::parse_str(category["id"].as_str().unwrap()).unwrap();
    let recipe = Uuid::new_v4();
    resources
        .associations
        .link(
            cookbook_core::models::MetadataKind::Category,
            recipe,
            category_id,
        )
        .await
        .unwrap();

    let response = AxumTestRequest::post(&url("search"))
        .bearer(&token)
        .json(&json!({"category_id": category_id}))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!([{
            "recipe_id": recipe,
            "category_ids": [category_id],
            "tag_ids": [],
        }])
    );
}
