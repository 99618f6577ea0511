//
//  cf-client
//  api/wrapper/custom.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::api::common::Result;
use crate::api::{Connection, ConnectionWrapper, Request, Response};

type MakeFn = dyn for<'a> Fn(
        &'a dyn Connection,
        &'a mut Request,
        &'a mut Response,
    ) -> BoxFuture<'a, Result<()>>
    + Send
    + Sync;

/// A wrapper whose behavior is a closure.
///
/// Useful for injecting faults or inspecting traffic at a chosen position in
/// a chain.
///
/// # Example
///
/// ```rust
/// use cf_client::api::wrapper::CustomWrapper;
///
/// let passthrough = CustomWrapper::new(|inner, request, response| {
///     Box::pin(async move { inner.make(request, response).await })
/// });
/// ```
pub struct CustomWrapper {
    make: Box<MakeFn>,
}

impl CustomWrapper {
    pub fn new<F>(make: F) -> Self
    where
        F: for<'a> Fn(
                &'a dyn Connection,
                &'a mut Request,
                &'a mut Response,
            ) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            make: Box::new(make),
        }
    }
}

#[async_trait]
impl ConnectionWrapper for CustomWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        (self.make)(inner, request, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::CcError;
    use reqwest::Method;
    use url::Url;

    struct Ok200;

    #[async_trait]
    impl Connection for Ok200 {
        async fn make(&self, _request: &mut Request, response: &mut Response) -> Result<()> {
            response.status = 200;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_closure_can_short_circuit() {
        let wrapper = CustomWrapper::new(|_inner, _request, response| {
            Box::pin(async move {
                response.status = 503;
                Err(CcError::ServiceUnavailable("injected".into()))
            })
        });
        let mut request = Request::new(Method::GET, Url::parse("https://api.example.com").unwrap());
        let mut response = Response::new();

        let err = wrapper.make(&Ok200, &mut request, &mut response).await.unwrap_err();

        assert!(matches!(err, CcError::ServiceUnavailable(_)));
        assert_eq!(response.status, 503);
    }
}
