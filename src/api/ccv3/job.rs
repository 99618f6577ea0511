//
//  cf-client
//  api/ccv3/job.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! v3 jobs are addressed by the URL the server returned in `Location`.

use std::fmt;
use std::time::Instant;

use reqwest::Method;
use tracing::debug;

use super::Client;
use crate::api::common::{CcError, Warned, Warnings};

pub const JOB_STATE_COMPLETE: &str = "COMPLETE";
pub const JOB_STATE_FAILED: &str = "FAILED";
pub const JOB_STATE_PROCESSING: &str = "PROCESSING";

/// Location of an asynchronous job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobUrl(String);

impl JobUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when there is no job to wait for.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

crate::jsonry! {
    /// One error of a failed job.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct JobError {
        #[jsonry = "code"]
        pub code: i64,
        #[jsonry = "title"]
        pub title: String,
        #[jsonry = "detail"]
        pub detail: String,
    }

    /// A v3 job.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Job {
        #[jsonry = "guid"]
        pub guid: String,
        #[jsonry = "operation"]
        pub operation: String,
        /// `PROCESSING`, `COMPLETE` or `FAILED`.
        #[jsonry = "state"]
        pub state: String,
        #[jsonry = "errors"]
        pub errors: Vec<JobError>,
    }
}

impl Job {
    pub fn is_complete(&self) -> bool {
        self.state == JOB_STATE_COMPLETE
    }

    pub fn has_failed(&self) -> bool {
        self.state == JOB_STATE_FAILED
    }
}

impl Client {
    /// Fetches the job at `url`.
    pub async fn get_job(&self, url: &JobUrl) -> Warned<Job> {
        match self.router.request_for_url(Method::GET, url.as_str()) {
            Ok(request) => self.make(request).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }

    /// Polls the job at `url` until it completes, fails, or the polling
    /// timeout runs out. An empty URL returns at once.
    ///
    /// # Errors
    ///
    /// - [`CcError::JobFailed`] carrying the first error's detail
    /// - [`CcError::JobTimeout`] once the polling timeout has elapsed
    pub async fn poll_job(&self, url: &JobUrl) -> Warned<()> {
        let mut warnings = Warnings::new();
        if url.is_empty() {
            return Warned::ok((), warnings);
        }

        let started = Instant::now();
        let mut job_guid = String::new();
        while started.elapsed() < self.polling_timeout {
            let job = match warnings.absorb(self.get_job(url).await) {
                Ok(job) => job,
                Err(err) => return Warned::err(err, warnings),
            };
            debug!("Job {} is {}", url, job.state);
            job_guid = job.guid.clone();

            if job.has_failed() {
                let message = job
                    .errors
                    .first()
                    .map(|e| e.detail.clone())
                    .unwrap_or_default();
                return Warned::err(CcError::JobFailed { job_guid, message }, warnings);
            }
            if job.is_complete() {
                return Warned::ok((), warnings);
            }

            tokio::time::sleep(self.polling_interval).await;
        }

        if job_guid.is_empty() {
            job_guid = url.to_string();
        }
        Warned::err(
            CcError::JobTimeout {
                job_guid,
                timeout: self.polling_timeout,
            },
            warnings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use super::*;
    use crate::api::fake::{Canned, FakeServer};
    use serde_json::json;

    fn job_url() -> JobUrl {
        JobUrl::new("https://api.example.com/v3/jobs/job-1")
    }

    #[tokio::test]
    async fn test_poll_until_complete() {
        let server = FakeServer::new();
        server.on(Method::GET, "/v3/jobs/job-1", Canned::new(200, json!({"guid": "job-1", "state": "PROCESSING"})).warn("warning-1"));
        server.on(Method::GET, "/v3/jobs/job-1", Canned::new(200, json!({"guid": "job-1", "state": "COMPLETE"})).warn("warning-2"));

        let outcome = client(&server).poll_job(&job_url()).await;

        assert!(outcome.result.is_ok());
        assert_eq!(outcome.warnings.as_slice(), &["warning-1", "warning-2"]);
    }

    #[tokio::test]
    async fn test_failed_job_carries_first_error_detail() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v3/jobs/job-1",
            Canned::new(200, json!({
                "guid": "job-1",
                "state": "FAILED",
                "errors": [{"code": 160001, "title": "CF-AppBitsUploadInvalid", "detail": "blah blah"}]
            })),
        );

        let outcome = client(&server).poll_job(&job_url()).await;

        match outcome.result {
            Err(CcError::JobFailed { job_guid, message }) => {
                assert_eq!(job_guid, "job-1");
                assert_eq!(message, "blah blah");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_job_url_is_done() {
        let server = FakeServer::new();
        let outcome = client(&server).poll_job(&JobUrl::default()).await;
        assert!(outcome.result.is_ok());
        assert!(server.requests().is_empty());
    }
}
