//
//  cf-client
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Access Token Claims
//!
//! UAA access tokens are JWTs. Only the payload's `exp` claim matters here:
//! it decides whether the auth wrapper refreshes before sending a request.
//! Signatures are not verified; the Cloud Controller does that.
//!
//! ## Example
//!
//! ```rust
//! use cf_client::auth::AccessTokenClaims;
//! use chrono::Duration;
//!
//! let claims = AccessTokenClaims::decode("bearer not-a-jwt");
//! assert!(claims.is_none());
//!
//! // Undecodable tokens are always treated as expiring.
//! assert!(AccessTokenClaims::needs_refresh("garbage", Duration::seconds(60)));
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;

/// The claims read from an access token's payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl AccessTokenClaims {
    /// Decodes the payload of `token`, ignoring a leading `bearer ` prefix.
    ///
    /// Returns `None` when the token is not a three-part JWT or its payload
    /// is not valid base64url JSON with an `exp` claim.
    pub fn decode(token: &str) -> Option<Self> {
        let token = strip_bearer(token);
        let mut parts = token.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// The expiry instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Time left before expiry; negative once expired.
    pub fn expires_in(&self) -> Duration {
        match self.expires_at() {
            Some(at) => at - Utc::now(),
            None => Duration::zero(),
        }
    }

    /// Whether the token expires within `margin` from now.
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.expires_in() < margin
    }

    /// Whether `token` must be refreshed before use.
    ///
    /// True when the token cannot be decoded or expires within `margin`.
    pub fn needs_refresh(token: &str, margin: Duration) -> bool {
        match Self::decode(token) {
            Some(claims) => claims.expires_within(margin),
            None => true,
        }
    }
}

/// Removes a case-insensitive `bearer ` prefix.
pub fn strip_bearer(token: &str) -> &str {
    let trimmed = token.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}

/// Builds an unsigned token expiring at `exp`. Test helper.
#[cfg(test)]
pub(crate) fn unsigned_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"user_name":"admin"}}"#, exp));
    format!("{}.{}.sig", header, payload)
}
