//
//  cf-client
//  api/uaa.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # UAA Client
//!
//! Exchanges a refresh token for a new access token. The client is the
//! [`TokenRefresher`] behind [`AuthWrapper`](crate::api::wrapper::AuthWrapper),
//! so its own chain must never contain an auth wrapper.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::api::uaa::UaaClient;
//! use cf_client::auth::TokenRefresher;
//! use cf_client::config::Config;
//!
//! # async fn run() -> cf_client::api::common::Result<()> {
//! let uaa = UaaClient::new(&Config::default(), "https://uaa.example.com", Vec::new())?;
//! let tokens = uaa.refresh_access_token("my-refresh-token").await?;
//! println!("{}", tokens.authorization_header());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::api::common::{CcError, Result};
use crate::api::wrapper::ErrorWrapper;
use crate::api::{
    build_chain, CloudControllerConnection, Connection, ConnectionWrapper, Query, Response, Route,
    Router,
};
use crate::auth::{RefreshedTokens, TokenRefresher};
use crate::config::Config;

pub const POST_OAUTH_TOKEN: &str = "PostOAuthToken";

/// The UAA route table.
pub fn routes() -> Vec<Route> {
    vec![Route::new(POST_OAUTH_TOKEN, Method::POST, "/oauth/token")]
}

#[derive(Deserialize)]
struct TokenResponseRaw {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    token_type: String,
}

impl From<TokenResponseRaw> for RefreshedTokens {
    fn from(raw: TokenResponseRaw) -> Self {
        Self {
            access_token: raw.access_token,
            refresh_token: raw.refresh_token,
            token_type: raw.token_type,
        }
    }
}

/// Client for the UAA token endpoint.
pub struct UaaClient {
    connection: Box<dyn Connection>,
    router: Router,
    client_id: String,
    client_secret: String,
}

impl UaaClient {
    /// Builds a client whose chain is the transport, the UAA error
    /// classifier, then `wrappers` in order.
    ///
    /// Client credentials come from `config.uaa_client_id` and
    /// `config.uaa_client_secret`.
    pub fn new(
        config: &Config,
        uaa_url: &str,
        wrappers: Vec<Box<dyn ConnectionWrapper>>,
    ) -> Result<Self> {
        let base = Url::parse(uaa_url).map_err(|e| CcError::InvalidUrl(format!("{}: {}", uaa_url, e)))?;
        let transport = CloudControllerConnection::new(&config.connection_config())?;

        let mut chain: Vec<Box<dyn ConnectionWrapper>> = vec![Box::new(ErrorWrapper::uaa())];
        chain.extend(wrappers);

        Ok(Self::with_connection(
            build_chain(Box::new(transport), chain),
            Router::new(base, routes()),
            &config.uaa_client_id,
            &config.uaa_client_secret,
        ))
    }

    pub fn with_connection(
        connection: Box<dyn Connection>,
        router: Router,
        client_id: &str,
        client_secret: &str,
    ) -> Self {
        Self {
            connection,
            router,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    fn basic_auth(&self) -> Result<HeaderValue> {
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        HeaderValue::from_str(&format!("Basic {}", credentials))
            .map_err(|e| CcError::BadRequest(e.to_string()))
    }
}

#[async_trait]
impl TokenRefresher for UaaClient {
    /// Posts a `refresh_token` grant to `/oauth/token`.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<RefreshedTokens> {
        let form = Query::new()
            .add("grant_type", "refresh_token")
            .add("refresh_token", refresh_token);

        let mut request = self
            .router
            .request(POST_OAUTH_TOKEN, &[])?
            .with_form_body(&form)
            .with_header(AUTHORIZATION, self.basic_auth()?);

        debug!("Refreshing access token at {}", request.url);
        let mut response = Response::new();
        self.connection.make(&mut request, &mut response).await?;

        let raw: TokenResponseRaw = response.decode()?;
        Ok(raw.into())
    }
}
