// ABOUTME: Application-wide constants for the metadata service
// ABOUTME: User-visible messages, limits, configuration defaults and route roots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

/// User-visible error messages shared by every metadata kind
pub mod messages {
    /// Create was called with a caller-supplied identifier
    pub const EXISTING_ID_ON_CREATE: &str = "existing id on new element is not allowed";
    /// Natural key is empty (also used for a zero level or duration)
    pub const NAME_EMPTY: &str = "name is empty";
    /// Name longer than [`super::limits::MAX_NAME_LENGTH`]
    pub const NAME_TOO_LONG: &str = "name exceeds 100 characters";
    /// Difficulty level outside `1..=MAX_DIFFICULTY_LEVEL`
    pub const LEVEL_OUT_OF_RANGE: &str = "level must be between 1 and 5";
    /// JSON body on create could not be decoded
    pub const UNEXPECTED_JSON: &str = "unexpected JSON input";
    /// Generic failure surfaced to callers instead of storage details
    pub const INTERNAL_SERVER_ERROR: &str = "internal server error";
}

/// Validation limits
pub mod limits {
    /// Maximum length of a category, tag or cuisine type name (characters)
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Highest accepted difficulty level
    pub const MAX_DIFFICULTY_LEVEL: u32 = 5;
}

/// Configuration defaults
pub mod defaults {
    /// Listener address
    pub const BIND_ADDRESS: &str = "0.0.0.0:8080";
    /// Upper bound for reading a request body
    pub const READ_TIMEOUT_SECS: u64 = 15;
    /// Upper bound for producing a response
    pub const WRITE_TIMEOUT_SECS: u64 = 300;
    /// Lifetime of a fetched JWKS before it is refetched
    pub const JWKS_CACHE_TTL_SECS: u64 = 3600;
    /// Minimum spacing between JWKS fetches triggered by an unknown `kid`
    pub const JWKS_MIN_REFRESH_SECS: u64 = 30;
    /// Accepted token signing algorithm
    pub const TOKEN_ALGORITHM: &str = "RS256";
    /// Log level when none or an invalid one is configured
    pub const LOG_LEVEL: &str = "INFO";
    /// Config file locations tried after the CLI flag and environment variable
    pub const CONFIG_PATHS: [&str; 2] = ["./config.yaml", "/config/config.yaml"];
}

/// Environment variable names
pub mod env_config {
    /// Explicit config file path
    pub const CONFIG_PATH: &str = "METADATA_CONFIG";
    /// Database URL override
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Log level override
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Listener address override
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    /// OIDC domain override
    pub const OAUTH_DOMAIN: &str = "OAUTH_DOMAIN";
    /// OIDC audience override
    pub const OAUTH_AUDIENCE: &str = "OAUTH_AUDIENCE";
    /// OIDC client id override
    pub const OAUTH_CLIENT_ID: &str = "OAUTH_CLIENT_ID";
    /// Log output format (`json`, `pretty`, `compact`)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Service identity used in logs and health output
pub mod service_names {
    /// Binary and log service name
    pub const METADATA_SERVICE: &str = "metadata-service";
}

/// HTTP route roots
pub mod routes {
    /// Root under which every metadata route is mounted
    pub const API_ROOT: &str = "/api/v2/metadata";
    /// Role every metadata route requires
    pub const REQUIRED_ROLE: &str = "administrator";
}
