//
//  cf-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Cloud Foundry API Client
//!
//! The request pipeline a Cloud Foundry client needs to talk to the Cloud
//! Controller (v2 and v3) and UAA: a layered connection chain, typed errors,
//! server warnings carried next to every result, pagination, path-based
//! JSON mapping and streaming multipart uploads.
//!
//! ## Overview
//!
//! Every request passes through a chain of wrappers around one HTTP
//! transport. Each wrapper adds one behavior:
//!
//! - **Error classification**: non-2xx responses become [`api::common::CcError`] kinds
//! - **Retry**: idempotent requests are re-issued on 5xx
//! - **Auth**: access tokens are attached and refreshed through UAA
//! - **Tracing**: B3 trace headers
//! - **Request logging**: redacted request/response dumps to the terminal or files
//!
//! ## Module Structure
//!
//! - [`api`]: Connection chain, wrappers, pagination and API clients
//! - [`jsonry`]: Path-based JSON mapping for resources
//! - [`auth`]: Token storage and JWT expiry
//! - [`output`]: Request log destinations
//! - [`config`]: Session configuration
//! - [`clients`]: Assembles the clients of a session
//! - [`actor`]: Operations composed from several calls
//! - [`logging`]: Diagnostic logging setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cf_client::actor::Actor;
//! use cf_client::auth::SessionTokens;
//! use cf_client::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! cf_client::init_logging();
//!
//! let mut config = Config::load()?;
//! config.apply_env();
//!
//! let mut actor = Actor::new(config, Arc::new(SessionTokens::new("access", "refresh")));
//! let info = actor.target_api("https://api.example.com", false).await;
//! for warning in &info.warnings {
//!     eprintln!("{}", warning);
//! }
//! info.result?;
//!
//! let summaries = actor.get_service_broker_summaries("").await.result?;
//! for summary in summaries {
//!     println!("{}: {} services", summary.broker.name, summary.services.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod jsonry;
pub mod logging;
pub mod output;

pub use config::Config;
pub use logging::init_logging;

/// Name used for the configuration directory.
pub const APP_NAME: &str = "cf";

/// The crate version, used in the default `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
