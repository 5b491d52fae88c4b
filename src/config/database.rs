// ABOUTME: Database configuration types for SQLite and PostgreSQL connections
// ABOUTME: Composes a connection URL from discrete settings or takes an explicit one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// `PostgreSQL` connection
    PostgreSQL {
        /// `PostgreSQL` connection string
        connection_string: String,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the URL names an unsupported scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Ok(Self::PostgreSQL {
                connection_string: s.to_owned(),
            })
        } else {
            Err(AppError::config_invalid(format!(
                "unsupported database url scheme: {}",
                s.split(':').next().unwrap_or_default()
            )))
        }
    }

    /// Convert to connection string; `SQLite` files are created when missing
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}?mode=rwc", path.display()),
            Self::PostgreSQL { connection_string } => connection_string.clone(),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::SQLite { path } => write!(f, "sqlite:{}", path.display()),
            // Never print credentials
            Self::PostgreSQL { .. } => write!(f, "postgresql://***"),
            Self::Memory => write!(f, "sqlite::memory:"),
        }
    }
}

/// `database` section of the service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the discrete fields when set
    pub url: Option<String>,
    /// `PostgreSQL` host
    pub host: String,
    /// `PostgreSQL` port
    pub port: u16,
    /// Login role
    pub username: String,
    /// Login password
    pub password: String,
    /// Database name
    pub database: String,
    /// libpq `sslmode`
    pub sslmode: String,
    /// Session time zone
    pub timezone: String,
    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_owned(),
            port: 5432,
            username: "postgres".to_owned(),
            password: String::new(),
            database: "metadata".to_owned(),
            sslmode: "disable".to_owned(),
            timezone: "UTC".to_owned(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the configured database location
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `url` has an unsupported scheme
    pub fn database_url(&self) -> AppResult<DatabaseUrl> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => DatabaseUrl::parse_url(url.trim()),
            _ => Ok(DatabaseUrl::PostgreSQL {
                connection_string: self.compose_postgres_url(),
            }),
        }
    }

    fn compose_postgres_url(&self) -> String {
        let timezone_option = format!("-c TimeZone={}", self.timezone);
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}&options={}",
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.database),
            urlencoding::encode(&self.sslmode),
            urlencoding::encode(&timezone_option),
        )
    }
}
