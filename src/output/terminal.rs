//
//  cf-client
//  output/terminal.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request log output for the terminal.

use std::error::Error as StdError;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use console::style;

use super::{format_json_body, format_log_time, redact_dump, RequestLoggerOutput};

/// Writes request logs to stdout, styled when the terminal supports color.
///
/// # Example
///
/// ```rust
/// use cf_client::output::{RequestLoggerOutput, TerminalRequestLogger};
///
/// let output = TerminalRequestLogger::with_writer(Vec::new());
/// output.display_host("api.example.com").unwrap();
/// ```
pub struct TerminalRequestLogger {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl TerminalRequestLogger {
    /// Creates a logger writing to stdout.
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            color: console::colors_enabled(),
        }
    }

    /// Creates an uncolored logger writing to `writer`.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color: false,
        }
    }

    fn writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer();
        writeln!(writer, "{}", line)
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TerminalRequestLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLoggerOutput for TerminalRequestLogger {
    fn start(&self) -> io::Result<()> {
        Ok(())
    }

    fn stop(&self) -> io::Result<()> {
        let mut writer = self.writer();
        writeln!(writer)?;
        writer.flush()
    }

    fn display_type(&self, name: &str, time: DateTime<Local>) -> io::Result<()> {
        let title = format!("{}: [{}]", name, format_log_time(time));
        let title = if self.color {
            style(title).cyan().bold().to_string()
        } else {
            title
        };
        self.write_line(&title)
    }

    fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()> {
        self.write_line(&format!("{} {} {}", self.bold(method), uri, protocol))
    }

    fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()> {
        self.write_line(&format!("{} {}", protocol, self.bold(status)))
    }

    fn display_host(&self, host: &str) -> io::Result<()> {
        self.write_line(&format!("{}: {}", self.bold("Host"), host))
    }

    fn display_header(&self, name: &str, value: &str) -> io::Result<()> {
        self.write_line(&format!("{}: {}", self.bold(name), value))
    }

    fn display_json_body(&self, body: &[u8]) -> io::Result<()> {
        match format_json_body(body) {
            Some(formatted) => self.write_line(&formatted),
            None => Ok(()),
        }
    }

    fn display_message(&self, message: &str) -> io::Result<()> {
        self.write_line(message)
    }

    fn display_dump(&self, dump: &str) -> io::Result<()> {
        self.write_line(&redact_dump(dump))
    }

    fn handle_internal_error(&self, error: &(dyn StdError + 'static)) {
        tracing::warn!("Request logger failed: {}", error);
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), error);
        } else {
            eprintln!("error: {}", error);
        }
    }
}
