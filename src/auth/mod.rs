//
//  cf-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module holds the session's token cache and the seams the auth
//! wrapper uses to keep the access token fresh.
//!
//! ## Module Structure
//!
//! - [`TokenStore`]: Read/write access to the access/refresh token pair
//! - [`SessionTokens`]: In-memory store shared by every client of a session
//! - [`TokenRefresher`]: Exchanges a refresh token for a new pair (implemented
//!   by [`UaaClient`](crate::api::uaa::UaaClient))
//! - [`AccessTokenClaims`]: Expiry decoding for JWT access tokens
//!
//! ## Example
//!
//! ```rust
//! use cf_client::auth::{SessionTokens, TokenStore};
//!
//! let tokens = SessionTokens::new("access", "refresh");
//! assert!(tokens.has_tokens());
//!
//! tokens.set_tokens("new-access".to_string(), "new-refresh".to_string());
//! assert_eq!(tokens.access_token(), "new-access");
//! ```
//!
//! ## Notes
//!
//! - The store is written only during a refresh; every other access is a read
//! - Persisting tokens beyond the process is left to the caller

mod token;

pub use token::*;

use std::sync::RwLock;

use async_trait::async_trait;

use crate::api::common::Result;

/// Storage for the session's token pair.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> String;
    fn refresh_token(&self) -> String;
    fn set_tokens(&self, access_token: String, refresh_token: String);

    /// Whether either token is present.
    fn has_tokens(&self) -> bool {
        !self.access_token().is_empty() || !self.refresh_token().is_empty()
    }
}

/// A token pair returned by a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl RefreshedTokens {
    /// The value for an `Authorization` header, e.g. `bearer eyJ...`.
    pub fn authorization_header(&self) -> String {
        let token_type = if self.token_type.is_empty() {
            "bearer"
        } else {
            &self.token_type
        };
        format!("{} {}", token_type, self.access_token)
    }
}

/// Exchanges a refresh token for a new token pair.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<RefreshedTokens>;
}

/// In-memory [`TokenStore`].
#[derive(Debug, Default)]
pub struct SessionTokens {
    inner: RwLock<TokenPair>,
}

#[derive(Debug, Default, Clone)]
struct TokenPair {
    access: String,
    refresh: String,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(TokenPair {
                access: access_token.into(),
                refresh: refresh_token.into(),
            }),
        }
    }

    fn read(&self) -> TokenPair {
        match self.inner.read() {
            Ok(pair) => pair.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TokenStore for SessionTokens {
    fn access_token(&self) -> String {
        self.read().access
    }

    fn refresh_token(&self) -> String {
        self.read().refresh
    }

    fn set_tokens(&self, access_token: String, refresh_token: String) {
        let mut pair = match self.inner.write() {
            Ok(pair) => pair,
            Err(poisoned) => poisoned.into_inner(),
        };
        pair.access = access_token;
        pair.refresh = refresh_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_has_no_tokens() {
        assert!(!SessionTokens::default().has_tokens());
        assert!(SessionTokens::new("", "refresh").has_tokens());
    }

    #[test]
    fn test_authorization_header_defaults_to_bearer() {
        let tokens = RefreshedTokens {
            access_token: "abc".into(),
            refresh_token: "def".into(),
            token_type: String::new(),
        };
        assert_eq!(tokens.authorization_header(), "bearer abc");
    }
}
