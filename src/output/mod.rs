//
//  cf-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! This module provides the sinks the request logging wrapper writes to when
//! tracing is enabled (`CF_TRACE=true` or `CF_TRACE=/path/to/file`).
//!
//! ## Architecture
//!
//! The module is organized into three submodules:
//! - [`terminal`]: Styled output to the terminal using `console`
//! - [`file`]: Plain output appended to one or more log files
//! - [`redact`]: Secret redaction applied before anything is written
//!
//! ## Core Components
//!
//! - [`RequestLoggerOutput`]: The trait both sinks implement
//! - [`TerminalRequestLogger`]: Writes to stdout (or any writer)
//! - [`FileRequestLogger`]: Appends to files, creating parent directories
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::output::{FileRequestLogger, RequestLoggerOutput};
//!
//! let output = FileRequestLogger::new(vec!["/tmp/cf-trace.log".into()]);
//! output.start()?;
//! output.display_host("api.example.com")?;
//! output.stop()?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Notes
//!
//! Every display method returns an [`io::Result`]. The logging wrapper hands
//! failures to [`RequestLoggerOutput::handle_internal_error`]; they never
//! change the outcome of the request being logged.

mod file;
mod redact;
mod terminal;

pub use file::*;
pub use redact::*;
pub use terminal::*;

use std::error::Error as StdError;
use std::io;

use chrono::{DateTime, Local, SecondsFormat};

/// A destination for request logs.
///
/// One request or response is logged between a [`start`](Self::start) and a
/// [`stop`](Self::stop) call.
pub trait RequestLoggerOutput: Send + Sync {
    /// Prepares the output for one block of log lines.
    fn start(&self) -> io::Result<()>;

    /// Finishes the block, separating it from the next one.
    fn stop(&self) -> io::Result<()>;

    /// Writes the block title, e.g. `REQUEST: [2026-01-12T10:00:00+02:00]`.
    fn display_type(&self, name: &str, time: DateTime<Local>) -> io::Result<()>;

    /// Writes the request line, e.g. `GET /v2/info HTTP/1.1`.
    fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()>;

    /// Writes the status line, e.g. `HTTP/1.1 200 OK`.
    fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()>;

    fn display_host(&self, host: &str) -> io::Result<()>;

    fn display_header(&self, name: &str, value: &str) -> io::Result<()>;

    /// Writes a JSON body, pretty-printed and redacted. Empty bodies write
    /// nothing.
    fn display_json_body(&self, body: &[u8]) -> io::Result<()>;

    fn display_message(&self, message: &str) -> io::Result<()>;

    /// Writes a raw HTTP dump with credentials redacted.
    fn display_dump(&self, dump: &str) -> io::Result<()>;

    /// Reports a failure of the output itself.
    fn handle_internal_error(&self, error: &(dyn StdError + 'static));
}

/// Formats `time` as RFC 3339 with second precision, as shown in log titles.
pub fn format_log_time(time: DateTime<Local>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, false)
}
