//
//  cf-client
//  api/wrapper/retry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Retry on server errors.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::common::{CcError, Result};
use crate::api::{Connection, ConnectionWrapper, Request, Response};

/// Re-issues a request that failed with a 5xx status.
///
/// The request is attempted at most `max_retries + 1` times. Retrying stops
/// at the first attempt that succeeds or fails with a status below 500.
/// Transport failures, where no status was received, are not retried.
/// Requests that are not [retry eligible](Request::retry_eligible) are
/// attempted once.
///
/// Before each re-attempt the body is rewound. A streaming body that has
/// already been sent fails with [`CcError::PipeSeek`] instead of being
/// silently resent.
///
/// # Example
///
/// ```rust
/// use cf_client::api::wrapper::RetryWrapper;
/// use std::time::Duration;
///
/// let retry = RetryWrapper::new(2).with_delay(Duration::from_millis(250));
/// assert_eq!(retry.max_retries(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RetryWrapper {
    max_retries: usize,
    delay: Duration,
}

impl RetryWrapper {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            delay: Duration::ZERO,
        }
    }

    /// Waits `delay` between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

#[async_trait]
impl ConnectionWrapper for RetryWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        let attempts = if request.retry_eligible() {
            self.max_retries + 1
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            *response = Response::new();
            let result = inner.make(request, response).await;
            let err = match result {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            if attempt >= attempts || response.status < 500 {
                return Err(err);
            }

            if let Err(CcError::PipeSeek(_)) = request.reset_body() {
                return Err(CcError::PipeSeek(err.to_string()));
            }

            debug!(
                "Retrying {} {} after status {} (attempt {} of {})",
                request.method, request.url, response.status, attempt + 1, attempts
            );
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            attempt += 1;
        }
    }
}
