//
//  cf-client
//  api/wrapper/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Connection Wrappers
//!
//! Each wrapper adds one behavior around an inner [`Connection`](crate::api::Connection).
//! A session chain is assembled innermost first:
//!
//! | Position | Wrapper | Behavior |
//! |----------|---------|----------|
//! | 1 | [`ErrorWrapper`] | Turns error statuses into typed errors |
//! | 2 | [`RetryWrapper`] | Re-issues eligible requests on 5xx |
//! | 3 | [`AuthWrapper`] | Attaches and refreshes the access token |
//! | 4 | [`TracingWrapper`] | Adds B3 trace headers |
//! | 5 | [`RequestLoggerWrapper`] | Logs requests and responses |
//!
//! Because the error classifier sits inside the retry wrapper, retries act
//! on classified errors with the status still visible on the response.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::api::{build_chain, CloudControllerConnection, ConnectionConfig};
//! use cf_client::api::wrapper::{ErrorWrapper, RetryWrapper, TracingWrapper};
//!
//! # fn run() -> cf_client::api::common::Result<()> {
//! let transport = CloudControllerConnection::new(&ConnectionConfig::default())?;
//! let connection = build_chain(
//!     Box::new(transport),
//!     vec![
//!         Box::new(ErrorWrapper::new()),
//!         Box::new(RetryWrapper::new(2)),
//!         Box::new(TracingWrapper::new()),
//!     ],
//! );
//! # Ok(())
//! # }
//! ```

mod auth;
mod custom;
mod error;
mod request_logger;
mod retry;
mod trace;

pub use auth::*;
pub use custom::*;
pub use error::*;
pub use request_logger::*;
pub use retry::*;
pub use trace::*;
