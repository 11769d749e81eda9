// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Firebase ID token verification.
//!
//! Verifies RS256 ID tokens minted by Firebase Auth against Google's hosted
//! JWK set for the `securetoken` service account. Keys are cached in-process
//! with the TTL advertised by the JWKS response.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, RwLock};

const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const CLOCK_SKEW_SECS: u64 = 60;

/// Verified caller identity extracted from a valid ID token.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    /// Identity subject (Firebase uid)
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Token verification error categories.
#[derive(Debug, Clone)]
pub enum VerifyError {
    /// The token is missing/invalid or claims do not match expectations.
    Invalid(String),
    /// A transient infrastructure failure occurred (key fetch, etc).
    Transient(String),
}

impl From<VerifyError> for crate::error::AppError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Invalid(msg) => {
                tracing::warn!(error = %msg, "Token verification failed");
                crate::error::AppError::InvalidToken
            }
            VerifyError::Transient(msg) => crate::error::AppError::IdentityUnavailable(msg),
        }
    }
}

/// Seam for bearer-token verification so tests can substitute a stub.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, VerifyError>;
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, Arc<DecodingKey>>,
    expires_at: Instant,
}

/// Production verifier for Firebase-issued ID tokens.
pub struct FirebaseTokenVerifier {
    http_client: reqwest::Client,
    expected_issuer: String,
    expected_audience: String,
    jwks_cache: RwLock<Option<JwksCacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl FirebaseTokenVerifier {
    /// Create a verifier for one Firebase project.
    pub fn new(project_id: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("failed building auth HTTP client: {e}"))?;

        let expected_issuer = format!("https://securetoken.google.com/{project_id}");

        tracing::info!(
            issuer = %expected_issuer,
            audience = %project_id,
            "Initialized Firebase token verifier"
        );

        Ok(Self {
            http_client,
            expected_issuer,
            expected_audience: project_id.to_string(),
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, VerifyError> {
        if let Some(key) = self.lookup_cached_key(kid).await {
            return Ok(key);
        }

        // A second pass with force_refresh catches key rotation between the
        // cached set and the token's kid.
        for force_refresh in [false, true] {
            self.refresh_jwks(force_refresh).await?;
            if let Some(key) = self.lookup_cached_key(kid).await {
                return Ok(key);
            }
        }

        Err(VerifyError::Invalid(format!(
            "JWT kid not found in JWKS after refresh: {kid}"
        )))
    }

    async fn lookup_cached_key(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        let cache = self.jwks_cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    async fn refresh_jwks(&self, force_refresh: bool) -> Result<(), VerifyError> {
        let _guard = self.refresh_lock.lock().await;

        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(());
            }
        }

        tracing::debug!(url = SECURETOKEN_JWKS_URL, "Refreshing Firebase JWKS cache");

        let response = self
            .http_client
            .get(SECURETOKEN_JWKS_URL)
            .send()
            .await
            .map_err(|e| VerifyError::Transient(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VerifyError::Transient(format!(
                "JWKS request returned status {}",
                response.status()
            )));
        }

        let ttl = cache_ttl_from_headers(response.headers(), DEFAULT_CACHE_TTL);

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| VerifyError::Transient(format!("invalid JWKS JSON: {e}")))?;

        let mut keys_by_kid: HashMap<String, Arc<DecodingKey>> = HashMap::new();

        for jwk in jwks.keys {
            if jwk.kty != "RSA" {
                continue;
            }

            if jwk.kid.trim().is_empty() {
                continue;
            }

            if let Some(alg) = &jwk.alg {
                if alg != "RS256" {
                    continue;
                }
            }

            if let Some(use_) = &jwk.use_ {
                if use_ != "sig" {
                    continue;
                }
            }

            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys_by_kid.insert(jwk.kid, Arc::new(key));
                }
                Err(e) => {
                    tracing::warn!(error = %e, kid = %jwk.kid, "Skipping invalid RSA JWKS key");
                }
            }
        }

        if keys_by_kid.is_empty() {
            return Err(VerifyError::Transient(
                "JWKS response did not include any usable RSA keys".to_string(),
            ));
        }

        let entry = JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + ttl,
        };

        *self.jwks_cache.write().await = Some(entry);

        tracing::debug!(ttl_secs = ttl.as_secs(), "Firebase JWKS cache refreshed");
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, VerifyError> {
        let header = decode_header(token)
            .map_err(|e| VerifyError::Invalid(format!("invalid JWT header: {e}")))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Invalid(format!(
                "unexpected JWT alg: {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Invalid("missing JWT kid".to_string()))?;

        let decoding_key = self.decoding_key_for_kid(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[self.expected_issuer.as_str()]);
        validation.set_audience(&[self.expected_audience.as_str()]);
        validation.leeway = CLOCK_SKEW_SECS;

        let token_data = decode::<IdTokenClaims>(token, decoding_key.as_ref(), &validation)
            .map_err(|e| VerifyError::Invalid(format!("JWT validation failed: {e}")))?;

        let claims = token_data.claims;

        validate_iat(claims.iat)?;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::Invalid("empty sub claim".to_string()));
        }

        tracing::debug!(
            uid = %claims.sub,
            email = claims.email.as_deref().unwrap_or("<missing>"),
            exp = claims.exp,
            "Verified Firebase ID token"
        );

        Ok(VerifiedUser {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    n: String,
    e: String,
    #[serde(rename = "use")]
    use_: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    exp: usize,
    iat: Option<usize>,
    email: Option<String>,
    name: Option<String>,
}

fn validate_iat(iat: Option<usize>) -> Result<(), VerifyError> {
    let now = now_unix_secs();

    let Some(iat) = iat else {
        return Err(VerifyError::Invalid("missing iat claim".to_string()));
    };

    if iat as u64 > now + CLOCK_SKEW_SECS {
        return Err(VerifyError::Invalid("iat claim is in the future".to_string()));
    }

    Ok(())
}

fn cache_ttl_from_headers(headers: &reqwest::header::HeaderMap, fallback: Duration) -> Duration {
    let Some(max_age) = headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_cache_control_max_age)
    else {
        return fallback;
    };

    Duration::from_secs(max_age)
}

fn parse_cache_control_max_age(value: &str) -> Option<u64> {
    for directive in value.split(',') {
        let directive = directive.trim();

        if let Some(raw) = directive.strip_prefix("max-age=") {
            let raw = raw.trim_matches('"');
            if let Ok(seconds) = raw.parse::<u64>() {
                return Some(seconds);
            }
        }
    }

    None
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
