//
//  cf-client
//  api/ccv2/job.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Asynchronous v2 jobs.

use std::time::Instant;

use tracing::debug;

use super::{Client, GET_JOB};
use crate::api::common::{CcError, Warned, Warnings};

pub const JOB_STATUS_FAILED: &str = "failed";
pub const JOB_STATUS_FINISHED: &str = "finished";
pub const JOB_STATUS_QUEUED: &str = "queued";
pub const JOB_STATUS_RUNNING: &str = "running";

crate::jsonry! {
    /// A background job on the Cloud Controller.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Job {
        #[jsonry = "entity.guid"]
        pub guid: String,
        #[jsonry = "entity.status"]
        pub status: String,
        /// Empty unless the job failed.
        #[jsonry = "entity.error"]
        pub error: String,
        #[jsonry = "entity.error_details.description"]
        pub error_description: String,
    }
}

impl Job {
    pub fn failed(&self) -> bool {
        self.status == JOB_STATUS_FAILED
    }

    pub fn finished(&self) -> bool {
        self.status == JOB_STATUS_FINISHED
    }
}

impl Client {
    /// Fetches job `guid`.
    pub async fn get_job(&self, guid: &str) -> Warned<Job> {
        match self.router.request(GET_JOB, &[("job_guid", guid)]) {
            Ok(request) => self.make(request).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }

    /// Polls `job` until it finishes, fails, or the polling timeout runs out.
    ///
    /// Warnings from every poll are returned in order.
    ///
    /// # Errors
    ///
    /// - [`CcError::JobFailed`] with the job's error description
    /// - [`CcError::JobTimeout`] once the polling timeout has elapsed
    /// - Any error from fetching the job
    pub async fn poll_job(&self, job: &Job) -> Warned<()> {
        let started = Instant::now();
        let mut warnings = Warnings::new();

        while started.elapsed() < self.polling_timeout {
            let current = match warnings.absorb(self.get_job(&job.guid).await) {
                Ok(current) => current,
                Err(err) => return Warned::err(err, warnings),
            };
            debug!("Job {} is {}", job.guid, current.status);

            if current.failed() {
                return Warned::err(
                    CcError::JobFailed {
                        job_guid: job.guid.clone(),
                        message: current.error_description,
                    },
                    warnings,
                );
            }
            if current.finished() {
                return Warned::ok((), warnings);
            }

            tokio::time::sleep(self.polling_interval).await;
        }

        Warned::err(
            CcError::JobTimeout {
                job_guid: job.guid.clone(),
                timeout: self.polling_timeout,
            },
            warnings,
        )
    }
}
