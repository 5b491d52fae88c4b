// ABOUTME: Configuration management module for the metadata service
// ABOUTME: Re-exports the YAML service configuration and database settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! Configuration module
//!
//! - **environment**: `ServiceConfig` loaded from `config.yaml` with environment overrides
//! - **database**: connection settings and the resolved `DatabaseUrl`

/// Database connection settings
pub mod database;
/// Service configuration file and environment overrides
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{
    CorsConfig, GlobalConfig, LogLevel, OAuthConfig, ServerConfig, ServiceConfig,
};
