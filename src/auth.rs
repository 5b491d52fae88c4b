// ABOUTME: OIDC bearer token validation against the issuer's cached JSON Web Key Set
// ABOUTME: Produces validated claims with a flattened role set and the provider|user subject
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

//! # Token Validation
//!
//! Bearer tokens are checked for signature, issuer, audience, expiry and algorithm.
//! Signing keys come from `https://<domain>/.well-known/jwks.json` and are cached for the
//! configured TTL. An unknown `kid` forces a refresh, at most once per
//! `JWKS_MIN_REFRESH_SECS`. A static key set can replace the remote endpoint for tests and
//! offline deployments.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::OAuthConfig;
use crate::constants::defaults::JWKS_MIN_REFRESH_SECS;
use crate::errors::{AppError, AppResult};

/// Where signing keys come from
enum KeySource {
    /// Issuer endpoint, cached for `ttl`
    Remote { url: String, ttl: Duration },
    /// Fixed key set
    Static(JwkSet),
}

/// Cached issuer keys
struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

/// Claims of a token that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClaims {
    /// `sub` claim
    pub subject: String,
    /// Roles collected from every recognised claim
    pub roles: BTreeSet<String>,
}

impl ValidatedClaims {
    /// Whether the token grants `role`
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Identity parsed from a `<provider>|<user_id>` subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identity provider, e.g. `auth0` or `google-oauth2`
    pub provider: String,
    /// User id at that provider
    pub user_id: String,
}

impl AuthenticatedUser {
    /// Split a subject claim into provider and user id
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the separator is missing or either part is empty
    pub fn from_subject(subject: &str) -> AppResult<Self> {
        match subject.split_once('|') {
            Some((provider, user_id)) if !provider.is_empty() && !user_id.is_empty() => {
                Ok(Self {
                    provider: provider.to_owned(),
                    user_id: user_id.to_owned(),
                })
            }
            _ => {
                debug!(subject, "subject is not of the form provider|user_id");
                Err(AppError::auth_invalid("invalid token subject"))
            }
        }
    }
}

impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.provider, self.user_id)
    }
}

#[derive(Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Validates bearer tokens issued by the configured OIDC domain
pub struct OidcAuthenticator {
    issuer: String,
    audience: String,
    client_id: String,
    algorithms: Vec<Algorithm>,
    role_claim: Option<String>,
    source: KeySource,
    http_client: Client,
    cached_keys: Arc<RwLock<Option<CachedKeys>>>,
}

impl OidcAuthenticator {
    /// Authenticator fetching keys from the issuer's JWKS endpoint
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an unknown signing algorithm
    pub fn from_config(config: &OAuthConfig) -> AppResult<Self> {
        let source = KeySource::Remote {
            url: config.jwks_url(),
            ttl: config.jwks_cache_ttl(),
        };
        Self::build(config, source)
    }

    /// Authenticator verifying against a fixed key set
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an unknown signing algorithm
    pub fn with_static_keys(config: &OAuthConfig, keys: JwkSet) -> AppResult<Self> {
        Self::build(config, KeySource::Static(keys))
    }

    fn build(config: &OAuthConfig, source: KeySource) -> AppResult<Self> {
        Ok(Self {
            issuer: config.issuer(),
            audience: config.audience.clone(),
            client_id: config.client_id.clone(),
            algorithms: config.parsed_algorithms()?,
            role_claim: config.role_claim.clone(),
            source,
            http_client: Client::new(),
            cached_keys: Arc::new(RwLock::new(None)),
        })
    }

    /// Expected `iss` claim
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Validate a bearer token and collect its roles
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for a malformed, unsigned, expired or foreign token, and
    /// `InternalError` when the key set cannot be fetched
    pub async fn validate_token(&self, token: &str) -> AppResult<ValidatedClaims> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "failed to decode token header");
            AppError::auth_invalid("invalid token format")
        })?;

        if !self.algorithms.contains(&header.alg) {
            warn!(algorithm = ?header.alg, "token signed with a disallowed algorithm");
            return Err(AppError::auth_invalid("unsupported token algorithm"));
        }

        let jwk = self.signing_key(header.kid.as_deref()).await?;
        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            warn!(error = %e, kid = ?header.kid, "unusable signing key");
            AppError::auth_invalid("unusable token signing key")
        })?;

        let mut validation = Validation::new(header.alg);
        validation.algorithms = vec![header.alg];
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<RawClaims>(token, &decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "token validation failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_invalid("token expired"),
                ErrorKind::InvalidAudience => AppError::auth_invalid("invalid token audience"),
                ErrorKind::InvalidIssuer => AppError::auth_invalid("invalid token issuer"),
                _ => AppError::auth_invalid("invalid token"),
            }
        })?;

        let claims = token_data.claims;
        let roles = self.collect_roles(&claims.extra);
        debug!(subject = %claims.sub, roles = ?roles, "token validated");
        Ok(ValidatedClaims {
            subject: claims.sub,
            roles,
        })
    }

    fn collect_roles(&self, claims: &Map<String, Value>) -> BTreeSet<String> {
        let mut sources = vec![
            claims.get("roles"),
            claims.get("groups"),
            claims.get("realm_access").and_then(|v| v.get("roles")),
            claims
                .get("resource_access")
                .and_then(|v| v.get(&self.client_id))
                .and_then(|v| v.get("roles")),
        ];
        if let Some(claim) = &self.role_claim {
            sources.push(claims.get(claim));
        }

        sources.into_iter().flatten().flat_map(role_names).collect()
    }

    /// Key for `kid`; a token without `kid` is accepted only when exactly one key exists
    async fn signing_key(&self, kid: Option<&str>) -> AppResult<Jwk> {
        match &self.source {
            KeySource::Static(keys) => select_key(keys, kid),
            KeySource::Remote { url, ttl } => {
                if let Some(key) = self.try_get_cached_key(kid).await {
                    return Ok(key);
                }
                if let Some(keys) = self.recently_fetched_keys().await {
                    debug!(kid, "key set is too fresh to refetch for an unknown kid");
                    return select_key(&keys, kid);
                }
                self.refresh_keys(url, *ttl).await?;
                let cache = self.cached_keys.read().await;
                cache.as_ref().map_or_else(
                    || Err(AppError::internal("failed to fetch token signing keys")),
                    |cached| select_key(&cached.keys, kid),
                )
            }
        }
    }

    async fn try_get_cached_key(&self, kid: Option<&str>) -> Option<Jwk> {
        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .filter(|cached| cached.expires_at > Instant::now())
            .and_then(|cached| select_key(&cached.keys, kid).ok())
    }

    /// Cached keys fetched within the minimum refresh interval
    async fn recently_fetched_keys(&self) -> Option<JwkSet> {
        let min_interval = Duration::from_secs(JWKS_MIN_REFRESH_SECS);
        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .filter(|cached| {
                cached.expires_at > Instant::now() && cached.fetched_at.elapsed() < min_interval
            })
            .map(|cached| cached.keys.clone())
    }

    async fn refresh_keys(&self, url: &str, ttl: Duration) -> AppResult<()> {
        info!(url, "fetching token signing keys");
        let keys: JwkSet = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(error = %e, url, "failed to fetch token signing keys");
                AppError::internal("failed to fetch token signing keys")
            })?
            .json()
            .await
            .map_err(|e| {
                warn!(error = %e, url, "failed to parse token signing keys");
                AppError::internal("failed to parse token signing keys")
            })?;
        self.update_cache(keys, ttl).await;
        Ok(())
    }

    async fn update_cache(&self, keys: JwkSet, ttl: Duration) {
        info!(
            num_keys = keys.keys.len(),
            cache_ttl_secs = ttl.as_secs(),
            "token signing keys cached"
        );
        let now = Instant::now();
        let mut cache = self.cached_keys.write().await;
        *cache = Some(CachedKeys {
            keys,
            fetched_at: now,
            expires_at: now + ttl,
        });
    }
}

fn select_key(keys: &JwkSet, kid: Option<&str>) -> AppResult<Jwk> {
    let key = match kid {
        Some(kid) => keys.find(kid),
        None if keys.keys.len() == 1 => keys.keys.first(),
        None => None,
    };
    key.cloned().ok_or_else(|| {
        debug!(kid, "no signing key matches the token");
        AppError::auth_invalid("unknown token signing key")
    })
}

/// Role names held by a claim: a string or an array of strings
fn role_names(value: &Value) -> Vec<String> {
    match value {
        Value::String(role) => vec![role.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
