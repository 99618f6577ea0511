//
//  cf-client
//  api/ccv3/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Cloud Controller v3 Client
//!
//! Same shape as the [v2 client](crate::api::ccv2): a route table, a chain
//! ending in the v3 error classifier, and [`Warned`] results. v3 lists use
//! the `pagination.next.href` envelope and asynchronous operations answer
//! with a job URL in the `Location` header.
//!
//! ## Module Structure
//!
//! - [`info`]: The API root document
//! - [`service_instance`]: Service instances and updates
//! - [`service_plan`]: Service plans
//! - [`job`]: Job URLs and polling

pub mod info;
pub mod job;
pub mod service_instance;
pub mod service_plan;

pub use info::*;
pub use job::*;
pub use service_instance::*;
pub use service_plan::*;

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::common::{list_all, CcError, Result, V3PaginatedEnvelope, Warned, Warnings};
use crate::api::wrapper::ErrorWrapper;
use crate::api::{
    build_chain, CloudControllerConnection, Connection, ConnectionWrapper, Query, Request,
    Response, Route, Router,
};
use crate::config::Config;

pub const GET_ROOT: &str = "GetRoot";
pub const GET_SERVICE_INSTANCES: &str = "GetServiceInstances";
pub const PATCH_SERVICE_INSTANCE: &str = "PatchServiceInstance";
pub const GET_SERVICE_PLAN: &str = "GetServicePlan";

/// The default v3 route table.
pub fn routes() -> Vec<Route> {
    vec![
        Route::new(GET_ROOT, Method::GET, "/"),
        Route::new(GET_SERVICE_INSTANCES, Method::GET, "/v3/service_instances"),
        Route::new(
            PATCH_SERVICE_INSTANCE,
            Method::PATCH,
            "/v3/service_instances/:service_instance_guid",
        ),
        Route::new(
            GET_SERVICE_PLAN,
            Method::GET,
            "/v3/service_plans/:service_plan_guid",
        ),
    ]
}

/// Cloud Controller v3 client.
pub struct Client {
    connection: Box<dyn Connection>,
    router: Router,
    polling_interval: Duration,
    polling_timeout: Duration,
}

impl Client {
    /// Builds a client whose chain is the transport, the v3 error
    /// classifier, then `wrappers` in order.
    ///
    /// # Errors
    ///
    /// Returns [`CcError::InvalidUrl`] for a malformed `api_url`.
    pub fn new(
        config: &Config,
        api_url: &str,
        wrappers: Vec<Box<dyn ConnectionWrapper>>,
    ) -> Result<Self> {
        let base = Url::parse(api_url).map_err(|e| CcError::InvalidUrl(format!("{}: {}", api_url, e)))?;
        let transport = CloudControllerConnection::new(&config.connection_config())?;

        let mut chain: Vec<Box<dyn ConnectionWrapper>> = vec![Box::new(ErrorWrapper::v3())];
        chain.extend(wrappers);

        Ok(Self::with_connection(
            build_chain(Box::new(transport), chain),
            Router::new(base, routes()),
            config.polling_interval(),
            config.polling_timeout(),
        ))
    }

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

    /// Performs one request, returning the response for inspection.
    async fn send(&self, mut request: Request) -> (Result<()>, Response) {
        let mut response = Response::new();
        let result = self.connection.make(&mut request, &mut response).await;
        (result, response)
    }

    async fn make<T>(&self, request: Request) -> Warned<T>
    where
        T: DeserializeOwned + Default,
    {
        let (result, mut response) = self.send(request).await;
        let warnings = Warnings::from(std::mem::take(&mut response.warnings));
        Warned::new(result.and_then(|()| response.decode_or_default()), warnings)
    }

    async fn list<T>(&self, route: &str, query: &Query) -> Warned<Vec<T>>
    where
        T: DeserializeOwned,
    {
        match self.router.request(route, &[]) {
            Ok(request) => {
                debug!("Listing {} with {:?}", route, query);
                list_all::<V3PaginatedEnvelope, T>(self.connection.as_ref(), request.with_query(query)).await
            }
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::FakeServer;
    use std::sync::Arc;

    pub(crate) fn client(server: &Arc<FakeServer>) -> Client {
        Client::with_connection(
            server.v3_chain(),
            Router::new(Url::parse("https://api.example.com").unwrap(), routes()),
            Duration::ZERO,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_patch_is_not_retry_eligible() {
        let router = Router::new(Url::parse("https://api.example.com").unwrap(), routes());
        let request = router
            .request(PATCH_SERVICE_INSTANCE, &[("service_instance_guid", "si-1")])
            .unwrap();
        assert_eq!(request.url.path(), "/v3/service_instances/si-1");
        assert!(!request.retry_eligible());
    }
}
