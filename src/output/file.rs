//
//  cf-client
//  output/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request log output appended to files.

use std::error::Error as StdError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};

use super::{format_json_body, format_log_time, redact_dump, RequestLoggerOutput};

/// Appends request logs to every configured file.
///
/// Files are opened by [`start`](RequestLoggerOutput::start), which creates
/// missing parent directories, and closed again by
/// [`stop`](RequestLoggerOutput::stop). Output is never styled.
///
/// # Example
///
/// ```rust,no_run
/// use cf_client::output::{FileRequestLogger, RequestLoggerOutput};
///
/// let output = FileRequestLogger::new(vec!["/tmp/logs/cf.log".into()]);
/// output.start()?;
/// output.display_message("hello")?;
/// output.stop()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FileRequestLogger {
    paths: Vec<PathBuf>,
    files: Mutex<Vec<File>>,
}

impl FileRequestLogger {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            files: Mutex::new(Vec::new()),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn files(&self) -> MutexGuard<'_, Vec<File>> {
        match self.files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        for file in self.files().iter_mut() {
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

impl RequestLoggerOutput for FileRequestLogger {
    fn start(&self) -> io::Result<()> {
        let mut files = self.files();
        files.clear();
        for path in &self.paths {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            files.push(file);
        }
        Ok(())
    }

    fn stop(&self) -> io::Result<()> {
        let mut files = self.files();
        let mut result = Ok(());
        for file in files.iter_mut() {
            if let Err(err) = writeln!(file).and_then(|_| file.flush()) {
                result = Err(err);
            }
        }
        files.clear();
        result
    }

    fn display_type(&self, name: &str, time: DateTime<Local>) -> io::Result<()> {
        self.write_line(&format!("{}: [{}]", name, format_log_time(time)))
    }

    fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()> {
        self.write_line(&format!("{} {} {}", method, uri, protocol))
    }

    fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()> {
        self.write_line(&format!("{} {}", protocol, status))
    }

    fn display_host(&self, host: &str) -> io::Result<()> {
        self.write_line(&format!("Host: {}", host))
    }

    fn display_header(&self, name: &str, value: &str) -> io::Result<()> {
        self.write_line(&format!("{}: {}", name, value))
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
        tracing::warn!("Request log file failed: {}", error);
        eprintln!("error: {}", error);
    }
}
