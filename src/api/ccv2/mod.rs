//
//  cf-client
//  api/ccv2/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Cloud Controller v2 Client
//!
//! A thin client over a v2 connection chain. Every call returns a
//! [`Warned`] value: the decoded resource (or error) together with the
//! warnings the server attached to the responses.
//!
//! ## Module Structure
//!
//! - [`service_broker`]: Service brokers
//! - [`service`]: Services offered by brokers
//! - [`service_plan`]: Plans of a service
//! - [`service_plan_visibility`]: Per-organization plan visibility
//! - [`buildpack`]: Buildpacks and bit uploads
//! - [`job`]: Asynchronous jobs and polling
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::api::ccv2::Client;
//! use cf_client::api::Query;
//! use cf_client::config::Config;
//!
//! # async fn run() -> cf_client::api::common::Result<()> {
//! let client = Client::new(&Config::default(), "https://api.example.com", Vec::new())?;
//! let brokers = client
//!     .get_service_brokers(&Query::new().add("q", "name:my-broker"))
//!     .await;
//! for broker in brokers.result? {
//!     println!("{} {}", broker.guid, broker.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod buildpack;
pub mod job;
pub mod service;
pub mod service_broker;
pub mod service_plan;
pub mod service_plan_visibility;

pub use buildpack::*;
pub use job::*;
pub use service::*;
pub use service_broker::*;
pub use service_plan::*;
pub use service_plan_visibility::*;

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::common::{list_all, CcError, Result, V2PaginatedEnvelope, Warned, Warnings};
use crate::api::wrapper::ErrorWrapper;
use crate::api::{
    build_chain, CloudControllerConnection, Connection, ConnectionWrapper, Query, Request,
    Response, Route, Router,
};
use crate::config::Config;

pub const GET_SERVICE_BROKERS: &str = "GetServiceBrokers";
pub const GET_SERVICES: &str = "GetServices";
pub const GET_SERVICE_PLANS: &str = "GetServicePlans";
pub const GET_SERVICE_PLAN_VISIBILITIES: &str = "GetServicePlanVisibilities";
pub const GET_BUILDPACKS: &str = "GetBuildpacks";
pub const PUT_BUILDPACK_BITS: &str = "PutBuildpackBits";
pub const GET_JOB: &str = "GetJob";

/// The default v2 route table.
pub fn routes() -> Vec<Route> {
    vec![
        Route::new(GET_SERVICE_BROKERS, Method::GET, "/v2/service_brokers"),
        Route::new(GET_SERVICES, Method::GET, "/v2/services"),
        Route::new(GET_SERVICE_PLANS, Method::GET, "/v2/service_plans"),
        Route::new(
            GET_SERVICE_PLAN_VISIBILITIES,
            Method::GET,
            "/v2/service_plan_visibilities",
        ),
        Route::new(GET_BUILDPACKS, Method::GET, "/v2/buildpacks"),
        Route::new(
            PUT_BUILDPACK_BITS,
            Method::PUT,
            "/v2/buildpacks/:buildpack_guid/bits",
        ),
        Route::new(GET_JOB, Method::GET, "/v2/jobs/:job_guid"),
    ]
}

/// Cloud Controller v2 client.
pub struct Client {
    connection: Box<dyn Connection>,
    router: Router,
    polling_interval: Duration,
    polling_timeout: Duration,
}

impl Client {
    /// Builds a client whose chain is the transport, the v2 error
    /// classifier, then `wrappers` in order.
    ///
    /// # Parameters
    ///
    /// * `config` - Transport and polling settings
    /// * `api_url` - The API root, e.g. `https://api.example.com`
    /// * `wrappers` - Outer wrappers, innermost first
    ///
    /// # Errors
    ///
    /// Returns [`CcError::InvalidUrl`] for a malformed `api_url`, or
    /// [`CcError::Request`] if the HTTP client cannot be built.
    pub fn new(
        config: &Config,
        api_url: &str,
        wrappers: Vec<Box<dyn ConnectionWrapper>>,
    ) -> Result<Self> {
        let base = Url::parse(api_url).map_err(|e| CcError::InvalidUrl(format!("{}: {}", api_url, e)))?;
        let transport = CloudControllerConnection::new(&config.connection_config())?;

        let mut chain: Vec<Box<dyn ConnectionWrapper>> = vec![Box::new(ErrorWrapper::new())];
        chain.extend(wrappers);

        Ok(Self::with_connection(
            build_chain(Box::new(transport), chain),
            Router::new(base, routes()),
            config.polling_interval(),
            config.polling_timeout(),
        ))
    }

    /// Builds a client around an already assembled chain.
    pub fn with_connection(
        connection: Box<dyn Connection>,
        router: Router,
        polling_interval: Duration,
        polling_timeout: Duration,
    ) -> Self {
        Self {
            connection,
            router,
            polling_interval,
            polling_timeout,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Performs one request and decodes its body.
    async fn make<T>(&self, mut request: Request) -> Warned<T>
    where
        T: DeserializeOwned + Default,
    {
        let mut response = Response::new();
        let result = self.connection.make(&mut request, &mut response).await;
        let warnings = Warnings::from(std::mem::take(&mut response.warnings));
        Warned::new(result.and_then(|()| response.decode_or_default()), warnings)
    }

    /// Fetches every page of a list route.
    async fn list<T>(&self, route: &str, query: &Query) -> Warned<Vec<T>>
    where
        T: DeserializeOwned,
    {
        match self.router.request(route, &[]) {
            Ok(request) => {
                debug!("Listing {} with {:?}", route, query);
                list_all::<V2PaginatedEnvelope, T>(self.connection.as_ref(), request.with_query(query)).await
            }
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}
