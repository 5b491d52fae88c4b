// ABOUTME: Service configuration loaded from YAML with environment overrides
// ABOUTME: Global log level, CORS, OIDC, database and listener settings plus validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! YAML-backed configuration for the metadata service

use super::database::DatabaseConfig;
use crate::constants::{defaults, env_config};
use crate::errors::{AppError, AppResult};
use anyhow::{Context, Result};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Collapses onto `error`
    Panic,
    /// Collapses onto `error`
    Fatal,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Accepted level names, in severity order
    pub const VALID_NAMES: &'static str = "PANIC FATAL ERROR WARN INFO DEBUG TRACE";

    /// Parse a level name case-insensitively
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PANIC" => Some(Self::Panic),
            "FATAL" => Some(Self::Fatal),
            "ERROR" => Some(Self::Error),
            "WARN" => Some(Self::Warn),
            "INFO" => Some(Self::Info),
            "DEBUG" => Some(Self::Debug),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Panic | Self::Fatal | Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// `EnvFilter` directive for this level
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Panic | Self::Fatal | Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

/// `global` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Raw level name; resolved by the logging setup so invalid values can be reported
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_owned(),
        }
    }
}

/// `cors` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; empty or `*` allows any
    pub allowed_origins: Vec<String>,
    /// Allowed methods; empty allows the verbs the service serves
    pub allowed_methods: Vec<String>,
    /// Allowed request headers; empty allows `Authorization` and `Content-Type`
    pub allowed_headers: Vec<String>,
    /// Whether browsers may send credentials
    pub allow_credentials: bool,
}

/// `oauth` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Issuer domain, e.g. `tenant.eu.auth0.com`
    pub domain: String,
    /// Client id whose `resource_access` roles are honoured
    pub client_id: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Accepted signing algorithms
    pub algorithms: Vec<String>,
    /// Extra claim holding roles, e.g. `https://cookbook/roles`
    pub role_claim: Option<String>,
    /// JWKS cache lifetime
    pub jwks_cache_ttl_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: String::new(),
            audience: String::new(),
            algorithms: vec![defaults::TOKEN_ALGORITHM.to_owned()],
            role_claim: None,
            jwks_cache_ttl_secs: defaults::JWKS_CACHE_TTL_SECS,
        }
    }
}

impl OAuthConfig {
    fn base_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_owned()
        } else {
            format!("https://{domain}")
        }
    }

    /// Expected `iss` claim
    #[must_use]
    pub fn issuer(&self) -> String {
        format!("{}/", self.base_url())
    }

    /// Location of the issuer's key set
    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.base_url())
    }

    /// Parsed signing algorithms
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an unknown algorithm name
    pub fn parsed_algorithms(&self) -> AppResult<Vec<Algorithm>> {
        self.algorithms
            .iter()
            .map(|name| {
                Algorithm::from_str(name.trim()).map_err(|e| {
                    AppError::config_invalid(format!("unknown oauth algorithm {name}: {e}"))
                })
            })
            .collect()
    }

    /// JWKS cache lifetime
    #[must_use]
    pub const fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }
}

/// `server` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener address
    pub bind_address: String,
    /// Upper bound for reading a request body
    pub read_timeout_secs: u64,
    /// Upper bound for producing a response
    pub write_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_owned(),
            read_timeout_secs: defaults::READ_TIMEOUT_SECS,
            write_timeout_secs: defaults::WRITE_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Request body read timeout
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Request processing timeout
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Global settings
    pub global: GlobalConfig,
    /// CORS policy
    pub cors: CorsConfig,
    /// Token validation
    pub oauth: OAuthConfig,
    /// Database connection
    pub database: DatabaseConfig,
    /// HTTP listener
    pub server: ServerConfig,
}

impl ServiceConfig {
    /// Locate, parse, override and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no config file is found, it cannot be parsed, or it is invalid
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::locate(explicit_path)?;
        info!(path = %path.display(), "loading config");

        let mut config = Self::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        config.apply_env_overrides();
        config.validate().context("invalid configuration")?;

        info!("config file loaded");
        Ok(config)
    }

    /// Resolve the config file: CLI flag, then `METADATA_CONFIG`, then the default paths
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no candidate exists
    pub fn locate(explicit_path: Option<&Path>) -> AppResult<PathBuf> {
        if let Some(path) = explicit_path {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = env::var(env_config::CONFIG_PATH) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        defaults::CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                AppError::config(format!(
                    "config file not found in {}",
                    defaults::CONFIG_PATHS.join(", ")
                ))
            })
    }

    /// Read and parse a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("error reading config: {e}")).with_source(e))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not a valid configuration document
    pub fn from_yaml_str(contents: &str) -> AppResult<Self> {
        serde_yaml::from_str(contents).map_err(|e| {
            AppError::config(format!("error unmarshaling config: {e}")).with_source(e)
        })
    }

    /// Apply environment variable overrides on top of the file contents
    pub fn apply_env_overrides(&mut self) {
        let read = |key: &str| env::var(key).ok().filter(|value| !value.trim().is_empty());

        if let Some(url) = read(env_config::DATABASE_URL) {
            self.database.url = Some(url);
        }
        if let Some(level) = read(env_config::LOG_LEVEL) {
            self.global.log_level = level;
        }
        if let Some(address) = read(env_config::BIND_ADDRESS) {
            self.server.bind_address = address;
        }
        if let Some(domain) = read(env_config::OAUTH_DOMAIN) {
            self.oauth.domain = domain;
        }
        if let Some(audience) = read(env_config::OAUTH_AUDIENCE) {
            self.oauth.audience = audience;
        }
        if let Some(client_id) = read(env_config::OAUTH_CLIENT_ID) {
            self.oauth.client_id = client_id;
        }
    }

    /// Reject settings the service cannot start with
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first offending setting
    pub fn validate(&self) -> AppResult<()> {
        if self.oauth.domain.trim().is_empty() {
            return Err(AppError::config_invalid("oauth.domain must be set"));
        }
        if self.oauth.audience.trim().is_empty() {
            return Err(AppError::config_invalid("oauth.audience must be set"));
        }
        if self.oauth.parsed_algorithms()?.is_empty() {
            return Err(AppError::config_invalid(
                "oauth.algorithms must name at least one algorithm",
            ));
        }
        if self.server.read_timeout_secs == 0 || self.server.write_timeout_secs == 0 {
            return Err(AppError::config_invalid(
                "server timeouts must be greater than zero",
            ));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config_invalid(
                "database.max_connections must be greater than zero",
            ));
        }
        self.database.database_url()?;
        Ok(())
    }

    /// Resolved log level, `None` when the configured name is not recognised
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        LogLevel::parse(&self.global.log_level)
    }
}
