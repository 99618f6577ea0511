//
//  cf-client
//  api/connection.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Connection Chain
//!
//! Every link in the request pipeline implements the same contract,
//! [`Connection::make`]: take a request, fill a response, return an error or
//! `Ok(())`. The transport is the innermost link. Each
//! [`ConnectionWrapper`] holds the link it wraps and decides whether, and
//! how, to delegate to it.
//!
//! ## Chain order
//!
//! Clients build their chain once per session, innermost first:
//!
//! ```text
//! caller -> Logging -> Tracing -> Auth -> Retry -> ErrorClassifier -> Transport
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::api::{build_chain, CloudControllerConnection, ConnectionConfig};
//! use cf_client::api::wrapper::{ErrorWrapper, RetryWrapper, TracingWrapper};
//!
//! let transport = CloudControllerConnection::new(&ConnectionConfig::default())?;
//! let connection = build_chain(
//!     Box::new(transport),
//!     vec![
//!         Box::new(ErrorWrapper::new()),
//!         Box::new(RetryWrapper::new(2)),
//!         Box::new(TracingWrapper::new()),
//!     ],
//! );
//! # Ok::<(), cf_client::api::common::CcError>(())
//! ```
//!
//! The response is an out-parameter rather than a return value so that
//! warnings and the raw body are still visible to outer links when an inner
//! link returns an error.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::common::Result;
use crate::api::{Request, Response};

/// A link in the request pipeline.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Performs the request, filling `response` with whatever was received.
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()>;
}

/// A decorator around an inner [`Connection`].
///
/// Implementations run their own behavior and then, unless they short-circuit,
/// delegate to `inner`.
#[async_trait]
pub trait ConnectionWrapper: Send + Sync {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()>;

    /// Binds this wrapper around `inner`, returning the combined link.
    fn wrap(self, inner: Box<dyn Connection>) -> Box<dyn Connection>
    where
        Self: Sized + 'static,
    {
        Box::new(Wrapped {
            wrapper: Box::new(self),
            inner,
        })
    }
}

/// A wrapper bound to the link it wraps.
pub struct Wrapped {
    wrapper: Box<dyn ConnectionWrapper>,
    inner: Box<dyn Connection>,
}

#[async_trait]
impl Connection for Wrapped {
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
        self.wrapper
            .make(self.inner.as_ref(), request, response)
            .await
    }
}

#[async_trait]
impl<C: Connection + ?Sized> Connection for Box<C> {
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
        (**self).make(request, response).await
    }
}

#[async_trait]
impl<C: Connection + ?Sized> Connection for Arc<C> {
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
        (**self).make(request, response).await
    }
}

/// Folds `wrappers` around `transport`, innermost first.
///
/// The first wrapper in the list sits directly on the transport; the last one
/// is the link callers talk to.
pub fn build_chain(
    transport: Box<dyn Connection>,
    wrappers: Vec<Box<dyn ConnectionWrapper>>,
) -> Box<dyn Connection> {
    wrappers
        .into_iter()
        .fold(transport, |inner, wrapper| Box::new(Wrapped { wrapper, inner }))
}
