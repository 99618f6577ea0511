//
//  cf-client
//  api/wrapper/trace.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! B3 trace propagation.

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{HeaderName, HeaderValue};

use crate::api::common::Result;
use crate::api::{Connection, ConnectionWrapper, Request, Response};

pub const B3_TRACE_ID_HEADER: &str = "x-b3-traceid";
pub const B3_SPAN_ID_HEADER: &str = "x-b3-spanid";

/// Stamps every request with `X-B3-TraceId` and `X-B3-SpanId`.
///
/// The trace id is fixed for the wrapper's lifetime, so every request of a
/// session shares it. A fresh span id is generated per request.
#[derive(Debug, Clone)]
pub struct TracingWrapper {
    trace_id: String,
}

impl TracingWrapper {
    /// Creates a wrapper with a random 128-bit trace id.
    pub fn new() -> Self {
        Self::with_trace_id(random_hex(16))
    }

    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }
}

impl Default for TracingWrapper {
    fn default() -> Self {
        Self::new()
    }
}

/// `bytes` random bytes as lowercase hex.
fn random_hex(bytes: usize) -> String {
    let mut rng = rand::rng();
    (0..bytes)
        .map(|_| format!("{:02x}", rng.random::<u8>()))
        .collect()
}

#[async_trait]
impl ConnectionWrapper for TracingWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        if let Ok(value) = HeaderValue::from_str(&self.trace_id) {
            request
                .headers
                .insert(HeaderName::from_static(B3_TRACE_ID_HEADER), value);
        }
        if let Ok(value) = HeaderValue::from_str(&random_hex(8)) {
            request
                .headers
                .insert(HeaderName::from_static(B3_SPAN_ID_HEADER), value);
        }
        inner.make(request, response).await
    }
}
