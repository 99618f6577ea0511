//
//  cf-client
//  api/upload.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Streaming Multipart Uploads
//!
//! Large files (buildpacks, droplets) are sent as a single-file
//! `multipart/form-data` body without buffering them in memory. A background
//! task writes the multipart framing and the file into one end of an
//! in-memory pipe while the transport reads from the other end.
//!
//! The writer reports exactly once on a completion channel. The caller
//! awaits both the HTTP request and that report, and the first error
//! observed wins.
//!
//! The body is a [`RequestBody::Pipe`] and can only be sent once: a retry
//! fails fast with [`CcError::PipeSeek`](crate::api::common::CcError::PipeSeek).
//!
//! ## Example
//!
//! ```rust,no_run
//! use cf_client::api::upload::{calculate_content_length, create_multipart_body, upload_with_progress};
//! use cf_client::api::{Connection, Request, Response};
//! use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
//! use reqwest::Method;
//! use url::Url;
//!
//! # async fn run(connection: &dyn Connection) -> cf_client::api::common::Result<()> {
//! let file = tokio::fs::File::open("buildpack.zip").await.unwrap();
//! let size = file.metadata().await.unwrap().len();
//!
//! let body = create_multipart_body("buildpack", "buildpack.zip", file);
//! let mut request = Request::new(Method::PUT, Url::parse("https://api.example.com/v2/buildpacks/guid/bits").unwrap())
//!     .with_header(CONTENT_TYPE, HeaderValue::from_str(&body.content_type).unwrap())
//!     .with_header(CONTENT_LENGTH, HeaderValue::from(calculate_content_length("buildpack", "buildpack.zip", size)))
//!     .with_body(body.body);
//! let mut response = Response::new();
//!
//! upload_with_progress(connection, &mut request, &mut response, body.completion).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use rand::Rng;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tracing::debug;

use crate::api::common::{CcError, Result};
use crate::api::{Connection, PipeBody, Request, RequestBody, Response};

/// Capacity of the in-memory pipe between the writer task and the transport.
pub const PIPE_CAPACITY: usize = 64 * 1024;

const COPY_CHUNK: usize = 32 * 1024;

/// Reports the number of file bytes written so far.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// A streaming multipart body ready to be attached to a request.
#[derive(Debug)]
pub struct MultipartBody {
    /// `multipart/form-data; boundary=...`
    pub content_type: String,
    pub body: RequestBody,
    /// Receives the writer's result once it finishes.
    pub completion: oneshot::Receiver<Result<()>>,
}

/// Framing for a form holding a single file field.
#[derive(Clone)]
pub struct MultipartForm {
    boundary: String,
    field: String,
    file_name: String,
    progress: Option<ProgressFn>,
}

impl MultipartForm {
    /// Creates a form with a random boundary.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>) -> Self {
        let mut rng = rand::rng();
        let boundary = (0..30)
            .map(|_| format!("{:02x}", rng.random::<u8>()))
            .collect();
        Self {
            boundary,
            field: field.into(),
            file_name: file_name.into(),
            progress: None,
        }
    }

    /// Replaces the boundary.
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = boundary.into();
        self
    }

    /// Calls `progress` with the running total of file bytes written.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn preamble(&self) -> String {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            self.boundary,
            escape_quotes(&self.field),
            escape_quotes(&self.file_name)
        )
    }

    fn epilogue(&self) -> String {
        format!("\r\n--{}--\r\n", self.boundary)
    }

    /// Total body size for a file of `data_len` bytes.
    ///
    /// Dry-runs the framing around an empty file and adds the file size.
    pub fn content_length(&self, data_len: u64) -> u64 {
        let mut framing = Vec::new();
        framing.extend_from_slice(self.preamble().as_bytes());
        framing.extend_from_slice(self.epilogue().as_bytes());
        framing.len() as u64 + data_len
    }

    /// Starts the writer task and returns the pipe's read half as a body.
    pub fn stream<R>(self, reader: R) -> MultipartBody
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (pipe_reader, mut pipe_writer) = tokio::io::duplex(PIPE_CAPACITY);
        let (done, completion) = oneshot::channel();
        let content_type = self.content_type();

        tokio::spawn(async move {
            let result = self.write(reader, &mut pipe_writer).await;
            let _ = pipe_writer.shutdown().await;
            drop(pipe_writer);
            if let Err(err) = &result {
                debug!("Multipart writer failed: {}", err);
            }
            let _ = done.send(result);
        });

        MultipartBody {
            content_type,
            body: RequestBody::Pipe(PipeBody::new(pipe_reader)),
            completion,
        }
    }

    async fn write<R, W>(&self, mut reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        writer
            .write_all(self.preamble().as_bytes())
            .await
            .map_err(upload_error)?;

        let mut buf = vec![0u8; COPY_CHUNK];
        let mut written = 0u64;
        loop {
            let n = reader.read(&mut buf).await.map_err(upload_error)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.map_err(upload_error)?;
            written += n as u64;
            if let Some(progress) = &self.progress {
                progress(written);
            }
        }

        writer
            .write_all(self.epilogue().as_bytes())
            .await
            .map_err(upload_error)?;
        writer.flush().await.map_err(upload_error)
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn upload_error(err: std::io::Error) -> CcError {
    CcError::Upload(err.to_string())
}

/// Size of a single-file multipart body, framing included.
pub fn calculate_content_length(field: &str, file_name: &str, data_len: u64) -> u64 {
    MultipartForm::new(field, file_name).content_length(data_len)
}

/// Streams `reader` as the single file of a multipart form.
pub fn create_multipart_body<R>(field: &str, file_name: &str, reader: R) -> MultipartBody
where
    R: AsyncRead + Send + Unpin + 'static,
{
    MultipartForm::new(field, file_name).stream(reader)
}

/// Sends a request whose body is being produced by a multipart writer.
///
/// Waits for both the request and the writer. The first error observed,
/// from either side, is returned. A pipe the chain never handed to the
/// transport is closed once the request finishes, so the writer cannot
/// block forever.
pub async fn upload_with_progress(
    connection: &dyn Connection,
    request: &mut Request,
    response: &mut Response,
    completion: oneshot::Receiver<Result<()>>,
) -> Result<()> {
    let mut completion = completion;
    let mut first_error = None;
    let mut writer_done = false;

    {
        let http = connection.make(request, response);
        tokio::pin!(http);
        loop {
            tokio::select! {
                result = &mut http => {
                    if let Err(err) = result {
                        first_error.get_or_insert(err);
                    }
                    break;
                }
                result = &mut completion, if !writer_done => {
                    writer_done = true;
                    if let Ok(Err(err)) = result {
                        first_error.get_or_insert(err);
                    }
                }
            }
        }
    }

    if let RequestBody::Pipe(pipe) = &mut request.body {
        drop(pipe.take_reader());
    }
    if !writer_done {
        if let Ok(Err(err)) = completion.await {
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::Method;
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;
    use url::Url;

    /// Reads the whole pipe body and records it.
    #[derive(Default)]
    struct Sink {
        received: tokio::sync::Mutex<Vec<u8>>,
        fail: bool,
    }

    #[async_trait]
    impl Connection for Sink {
        async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
            if self.fail {
                return Err(CcError::Request {
                    url: request.url.to_string(),
                    message: "connection reset".into(),
                });
            }
            if let RequestBody::Pipe(pipe) = &mut request.body {
                let mut reader = pipe.take_reader().unwrap();
                let mut received = self.received.lock().await;
                reader.read_to_end(&mut received).await.unwrap();
            }
            response.status = 201;
            Ok(())
        }
    }

    /// Yields some bytes, then fails.
    struct Broken {
        sent: bool,
    }

    impl AsyncRead for Broken {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "disk went away")));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    fn request(body: RequestBody) -> Request {
        Request::new(
            Method::PUT,
            Url::parse("https://api.example.com/v2/buildpacks/guid/bits").unwrap(),
        )
        .with_body(body)
    }

    #[tokio::test]
    async fn test_body_is_framed_and_length_matches() {
        let data = b"PK\x03\x04 zip bytes".to_vec();
        let form = MultipartForm::new("buildpack", "buildpack.zip").with_boundary("XYZ");
        let expected_len = form.content_length(data.len() as u64);

        let body = form.stream(io::Cursor::new(data.clone()));
        assert_eq!(body.content_type, "multipart/form-data; boundary=XYZ");

        let sink = Sink::default();
        let mut req = request(body.body);
        upload_with_progress(&sink, &mut req, &mut Response::new(), body.completion)
            .await
            .unwrap();

        let received = sink.received.lock().await.clone();
        let mut expected = b"--XYZ\r\nContent-Disposition: form-data; name=\"buildpack\"; filename=\"buildpack.zip\"\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
        expected.extend_from_slice(&data);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");
        assert_eq!(received, expected);
        assert_eq!(received.len() as u64, expected_len);
    }

    #[tokio::test]
    async fn test_reader_error_is_reported() {
        let body = create_multipart_body("droplet", "droplet.tgz", Broken { sent: false });
        let sink = Sink::default();
        let mut req = request(body.body);

        let err = upload_with_progress(&sink, &mut req, &mut Response::new(), body.completion)
            .await
            .unwrap_err();

        assert!(matches!(err, CcError::Upload(ref m) if m.contains("disk went away")));
    }

    #[tokio::test]
    async fn test_http_error_is_reported_and_writer_finishes() {
        let body = create_multipart_body("droplet", "droplet.tgz", io::Cursor::new(vec![0u8; 256 * 1024]));
        let sink = Sink {
            fail: true,
            ..Default::default()
        };
        let mut req = request(body.body);

        let err = upload_with_progress(&sink, &mut req, &mut Response::new(), body.completion)
            .await
            .unwrap_err();

        assert!(matches!(err, CcError::Request { .. }));
    }

    #[tokio::test]
    async fn test_progress_reports_running_total() {
        let total = Arc::new(AtomicU64::new(0));
        let seen = total.clone();
        let form = MultipartForm::new("f", "f.bin")
            .with_progress(Arc::new(move |n| seen.store(n, Ordering::SeqCst)));

        let body = form.stream(io::Cursor::new(vec![7u8; 100_000]));
        let sink = Sink::default();
        let mut req = request(body.body);
        upload_with_progress(&sink, &mut req, &mut Response::new(), body.completion)
            .await
            .unwrap();

        assert_eq!(total.load(Ordering::SeqCst), 100_000);
    }

    #[test]
    fn test_content_length_is_framing_plus_data() {
        let form = MultipartForm::new("droplet", "droplet.tgz");
        let framing = form.content_length(0);
        assert_eq!(form.content_length(1024), framing + 1024);
        assert_eq!(calculate_content_length("droplet", "droplet.tgz", 0), framing);
    }
}
