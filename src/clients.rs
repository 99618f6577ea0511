//
//  cf-client
//  clients.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Session Clients
//!
//! Assembles the v2, v3 and UAA clients of one session from a [`Config`]
//! and the API root document. All three share one trace id and one request
//! log output.
//!
//! Cloud Controller chains are, innermost first: error classification,
//! retry, auth, tracing, request logging. The UAA chain has no auth
//! wrapper since it is the auth wrapper's refresher.

use std::sync::Arc;

use tracing::debug;

use crate::api::ccv3::ApiInfo;
use crate::api::common::{CcError, Result};
use crate::api::uaa::UaaClient;
use crate::api::wrapper::{AuthWrapper, RequestLoggerWrapper, RetryWrapper, TracingWrapper};
use crate::api::{ccv2, ccv3, ConnectionWrapper};
use crate::auth::TokenStore;
use crate::config::{Config, TraceTarget};
use crate::output::{FileRequestLogger, RequestLoggerOutput, TerminalRequestLogger};

/// Returns the request log output selected by `config.trace`, if any.
pub fn request_logger_output(config: &Config) -> Option<Arc<dyn RequestLoggerOutput>> {
    match config.trace_target() {
        TraceTarget::Off => None,
        TraceTarget::Terminal => Some(Arc::new(TerminalRequestLogger::new())),
        TraceTarget::Files(paths) => Some(Arc::new(FileRequestLogger::new(paths))),
    }
}

/// Builds the unauthenticated wrappers of a session chain.
///
/// Used for the first request against a new target, before a UAA endpoint
/// is known.
pub fn anonymous_wrappers(
    config: &Config,
    trace: &TracingWrapper,
    output: Option<&Arc<dyn RequestLoggerOutput>>,
) -> Vec<Box<dyn ConnectionWrapper>> {
    let mut wrappers: Vec<Box<dyn ConnectionWrapper>> = vec![
        Box::new(RetryWrapper::new(config.max_retries)),
        Box::new(trace.clone()),
    ];
    if let Some(output) = output {
        wrappers.push(Box::new(RequestLoggerWrapper::new(output.clone())));
    }
    wrappers
}

/// The clients of one authenticated session.
pub struct Clients {
    pub v2: ccv2::Client,
    pub v3: ccv3::Client,
    pub uaa: Arc<UaaClient>,
}

impl Clients {
    /// Builds every client against `config.target`, refreshing tokens held
    /// in `store` through the UAA advertised in `info`.
    ///
    /// # Errors
    ///
    /// Returns [`CcError::InvalidUrl`] when the target or the UAA URL is
    /// missing or malformed.
    pub fn new(config: &Config, info: &ApiInfo, store: Arc<dyn TokenStore>) -> Result<Self> {
        if info.uaa_url.is_empty() {
            return Err(CcError::InvalidUrl(format!(
                "{} does not advertise a UAA endpoint",
                config.target
            )));
        }

        let trace = TracingWrapper::new();
        let output = request_logger_output(config);
        debug!("Building clients for {} (trace id {})", config.target, trace.trace_id());

        let mut uaa_wrappers: Vec<Box<dyn ConnectionWrapper>> = vec![Box::new(trace.clone())];
        if let Some(output) = &output {
            uaa_wrappers.push(Box::new(RequestLoggerWrapper::new(output.clone())));
        }
        let uaa = Arc::new(UaaClient::new(config, &info.uaa_url, uaa_wrappers)?);

        let session = |uaa: &Arc<UaaClient>| -> Vec<Box<dyn ConnectionWrapper>> {
            let mut wrappers: Vec<Box<dyn ConnectionWrapper>> = vec![
                Box::new(RetryWrapper::new(config.max_retries)),
                Box::new(AuthWrapper::new(uaa.clone(), store.clone())),
                Box::new(trace.clone()),
            ];
            if let Some(output) = &output {
                wrappers.push(Box::new(RequestLoggerWrapper::new(output.clone())));
            }
            wrappers
        };

        Ok(Self {
            v2: ccv2::Client::new(config, &config.target, session(&uaa))?,
            v3: ccv3::Client::new(config, &config.target, session(&uaa))?,
            uaa,
        })
    }

    /// Bundles already built clients.
    pub fn from_parts(v2: ccv2::Client, v3: ccv3::Client, uaa: Arc<UaaClient>) -> Self {
        Self { v2, v3, uaa }
    }
}
