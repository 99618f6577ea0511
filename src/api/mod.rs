//
//  cf-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the request pipeline shared by every Cloud Foundry
//! API family, and thin clients built on top of it.
//!
//! ## Supported APIs
//!
//! - **Cloud Controller v2**: [`ccv2`]
//! - **Cloud Controller v3**: [`ccv3`]
//! - **UAA**: [`uaa`] (token refresh)
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`request`] / [`response`]: The values passed through a chain
//! - [`router`]: Named route tables and URL resolution
//! - [`connection`]: The chain contract and [`build_chain`]
//! - [`transport`]: The innermost link, one HTTP round trip per call
//! - [`wrapper`]: Error classification, retry, auth, tracing, logging
//! - [`common`]: Errors, warnings and pagination
//! - [`upload`]: Streaming multipart bodies
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cf_client::api::ccv3;
//! use cf_client::api::wrapper::RetryWrapper;
//! use cf_client::config::Config;
//!
//! # async fn run() -> cf_client::api::common::Result<()> {
//! let config = Config::default();
//! let client = ccv3::Client::new(&config, "https://api.example.com", vec![
//!     Box::new(RetryWrapper::new(config.max_retries)),
//! ])?;
//!
//! let info = client.get_info().await;
//! for warning in &info.warnings {
//!     eprintln!("{}", warning);
//! }
//! let info = info.result?;
//! println!("UAA at {}", info.uaa_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`common::CcError`] variants, which map to the server's
//! own error codes where one is known:
//!
//! - `ResourceNotFound`: 404
//! - `InvalidAuthToken` / `Unauthorized`: 401
//! - `Forbidden`: 403
//! - `UnprocessableEntity`: 422
//! - `V2UnexpectedResponse` / `V3UnexpectedResponse`: anything unmapped

pub mod ccv2;
pub mod ccv3;
pub mod common;
pub mod connection;
#[cfg(test)]
pub(crate) mod fake;
pub mod request;
pub mod response;
pub mod router;
pub mod transport;
pub mod uaa;
pub mod upload;
pub mod wrapper;

pub use connection::{build_chain, Connection, ConnectionWrapper, Wrapped};
pub use request::{PipeBody, Query, Request, RequestBody};
pub use response::{parse_warnings, Response};
pub use router::{resolve_url, Route, Router};
pub use transport::{CloudControllerConnection, ConnectionConfig};
