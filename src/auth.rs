//! Bearer-token verification at the relay boundary.
//!
//! InternHub's platform issues HS256 JWTs to signed-in users; the relay
//! shares the signing secret and only ever *verifies* tokens, trusting
//! the `sub` claim as the connection's [`UserId`]. REST requests carry
//! the token in the `Authorization: Bearer` header; WebSocket upgrades
//! carry it in the `token` query parameter (browsers cannot set headers
//! on a WS handshake).

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::RelayError;

/// JWT claims shared with the platform's auth service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Verifies (and, for tests and tooling, issues) HS256 bearer tokens.
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier from the shared HMAC secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Verifies a token and returns the user it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] if the token is malformed,
    /// has a bad signature, or is expired.
    pub fn verify(&self, token: &str) -> Result<UserId, RelayError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| RelayError::Unauthorized(e.to_string()))?;
        Ok(UserId::from(data.claims.sub))
    }

    /// Issues a token for `user` valid for `ttl_secs` seconds.
    ///
    /// The platform's auth service is the production issuer; this exists
    /// for integration tests and operational tooling.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if signing fails.
    pub fn issue(&self, user: &UserId, ttl_secs: i64) -> Result<String, RelayError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.as_str().to_owned(),
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| RelayError::Internal(e.to_string()))
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

/// Extractor for the authenticated user on REST routes.
///
/// Rejects with `401` (code 4001) when the `Authorization` header is
/// missing or the bearer token does not verify.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = RelayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| RelayError::Unauthorized("missing bearer token".to_string()))?;
        let user = state.verifier.verify(token)?;
        Ok(Self(user))
    }
}
