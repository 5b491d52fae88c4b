// ABOUTME: CORS layer built from the `cors` configuration section
// ABOUTME: Empty lists fall back to the verbs and headers the metadata API serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use std::time::Duration;

use http::{header, header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Preflight responses may be cached this long
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Configure CORS for the metadata API
///
/// An empty origin list or one containing `*` allows any origin. Credentials are only
/// advertised for explicit origin lists, since browsers refuse them with a wildcard.
/// Unparseable entries are skipped with a warning.
#[must_use]
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let wildcard = config.allowed_origins.is_empty()
        || config.allowed_origins.iter().any(|origin| origin.trim() == "*");

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_all(&config.allowed_origins, |s| {
            HeaderValue::from_str(s).ok()
        }))
    };

    let allow_methods = if config.allowed_methods.is_empty() {
        AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
    } else {
        AllowMethods::list(parse_all(&config.allowed_methods, |s| {
            Method::from_bytes(s.to_uppercase().as_bytes()).ok()
        }))
    };

    let allow_headers = if config.allowed_headers.is_empty() {
        AllowHeaders::list([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    } else {
        AllowHeaders::list(parse_all(&config.allowed_headers, |s| {
            HeaderName::from_bytes(s.to_lowercase().as_bytes()).ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(allow_methods)
        .allow_headers(allow_headers)
        .allow_credentials(config.allow_credentials && !wildcard)
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(PREFLIGHT_MAX_AGE)
}

fn parse_all<T>(values: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .filter_map(|value| {
            let parsed = parse(value);
            if parsed.is_none() {
                warn!(value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
