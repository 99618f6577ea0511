//
//  cf-client
//  api/wrapper/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Access token injection and refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::api::common::{CcError, Result};
use crate::api::{Connection, ConnectionWrapper, Request, Response};
use crate::auth::{strip_bearer, AccessTokenClaims, TokenRefresher, TokenStore};

/// Default window before expiry in which the token is refreshed.
pub const ACCESS_TOKEN_EXPIRATION_MARGIN_SECS: i64 = 60;

/// Attaches `Authorization: bearer <token>` to outgoing requests.
///
/// Requests that already carry an `Authorization` header, and sessions with
/// no cached tokens, pass through untouched. Otherwise the access token's
/// expiry is checked first. A token that expires within the margin, or that
/// cannot be decoded, is refreshed and the new pair is stored before the
/// header is attached. A failed refresh aborts the request.
///
/// If the server still rejects the token as invalid and the body can be
/// replayed, the wrapper refreshes once more and re-sends the request.
pub struct AuthWrapper {
    refresher: Arc<dyn TokenRefresher>,
    store: Arc<dyn TokenStore>,
    margin: Duration,
}

impl AuthWrapper {
    pub fn new(refresher: Arc<dyn TokenRefresher>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            refresher,
            store,
            margin: Duration::seconds(ACCESS_TOKEN_EXPIRATION_MARGIN_SECS),
        }
    }

    /// Overrides the refresh margin.
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    async fn refresh(&self) -> Result<()> {
        debug!("Refreshing access token");
        let tokens = self
            .refresher
            .refresh_access_token(&self.store.refresh_token())
            .await?;
        self.store
            .set_tokens(tokens.access_token, tokens.refresh_token);
        Ok(())
    }

    fn authorize(&self, request: &mut Request) -> Result<()> {
        let header = format!("bearer {}", strip_bearer(&self.store.access_token()));
        let value = HeaderValue::from_str(&header)
            .map_err(|e| CcError::InvalidAuthToken(e.to_string()))?;
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[async_trait]
impl ConnectionWrapper for AuthWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        if request.headers.contains_key(AUTHORIZATION) || !self.store.has_tokens() {
            return inner.make(request, response).await;
        }

        if AccessTokenClaims::needs_refresh(&self.store.access_token(), self.margin) {
            self.refresh().await?;
        }
        self.authorize(request)?;

        let result = inner.make(request, response).await;
        match result {
            Err(err) if err.is_invalid_auth_token() && request.body.is_replayable() => {
                debug!("Access token rejected, refreshing and retrying once");
                self.refresh().await?;
                self.authorize(request)?;
                *response = Response::new();
                inner.make(request, response).await
            }
            other => other,
        }
    }
}
