//
//  cf-client
//  api/common/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud Controller Error Taxonomy
//!
//! Every failure produced by the connection chain, the pagination engine and
//! the API clients is one variant of [`CcError`]. Variants fall into a few
//! families:
//!
//! | Family | Variants |
//! |--------|----------|
//! | Transport | `Request`, `UnverifiedServer`, `SslValidationHostname` |
//! | Classified HTTP | `BadRequest`, `Unauthorized`, `InvalidAuthToken`, `Forbidden`, `ResourceNotFound`, `UnprocessableEntity`, ... |
//! | Unclassified HTTP | `UnknownHttpSource`, `V2UnexpectedResponse`, `V3UnexpectedResponse`, `MultiError`, `RawHttpStatus` |
//! | Decode | `Decode`, `Jsonry`, `UnexpectedObjectInList` |
//! | Jobs | `JobFailed`, `JobTimeout` |
//! | Streaming | `PipeSeek`, `Upload` |
//! | Routing | `UnknownRoute`, `MissingRouteParam`, `InvalidUrl` |
//!
//! Errors are created once, at the point the condition is observed, and are
//! never mutated afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jsonry::JsonryError;

/// Result alias used throughout the API layer.
pub type Result<T> = std::result::Result<T, CcError>;

/// The structured error document returned by the v2 Cloud Controller.
///
/// ```json
/// {"code": 100004, "description": "The app could not be found: some-app-guid", "error_code": "CF-AppNotFound"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct V2ErrorResponse {
    /// Numeric Cloud Controller error code
    #[serde(default)]
    pub code: i64,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Symbolic error code, e.g. `CF-AppNotFound`
    #[serde(default)]
    pub error_code: String,
}

/// A single entry of a v3 `{"errors": [...]}` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3Error {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub title: String,
}

/// The v3 error document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3ErrorResponse {
    #[serde(default)]
    pub errors: Vec<V3Error>,
}

/// Unified error type for all Cloud Controller and UAA operations.
///
/// Classified HTTP variants carry the human-readable message from the error
/// body. Unclassified variants keep the raw status and body so that callers
/// can still report what the server said.
///
/// # Example
///
/// ```rust
/// use cf_client::api::common::CcError;
///
/// fn describe(err: &CcError) -> &'static str {
///     match err {
///         CcError::ResourceNotFound(_) => "missing",
///         CcError::InvalidAuthToken(_) => "log in again",
///         CcError::UnknownHttpSource { .. } => "is this a Cloud Foundry API?",
///         _ => "failed",
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum CcError {
    // Transport
    #[error("Request error: {message} ({url})")]
    Request { url: String, message: String },

    #[error("x509: certificate signed by unknown authority for {url}")]
    UnverifiedServer { url: String },

    #[error("Hostname does not match SSL certificate: {message}")]
    SslValidationHostname { message: String },

    // Classified HTTP
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    ApplicationStoppedStats(String),

    #[error("{0}")]
    InvalidRelation(String),

    #[error("{0}")]
    NotStaged(String),

    #[error("{0}")]
    Instances(String),

    #[error("{0}")]
    ServiceBindingTaken(String),

    #[error("{0}")]
    BuildpackNameTaken(String),

    #[error("{0}")]
    BuildpackAlreadyExistsWithoutStack(String),

    #[error("{0}")]
    BuildpackAlreadyExistsForStack(String),

    #[error("{0}")]
    OrganizationNameTaken(String),

    #[error("{0}")]
    SpaceNameTaken(String),

    #[error("{0}")]
    ServiceInstanceNameTaken(String),

    #[error("Service broker catalog is invalid: {0}")]
    ServiceBrokerCatalogInvalid(String),

    #[error("Service broker rejected the request: {0}")]
    ServiceBrokerRequestRejected(String),

    #[error("Service broker returned a bad response: {0}")]
    ServiceBrokerBadResponse(String),

    #[error("Invalid auth token: {0}")]
    InvalidAuthToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Credentials were rejected, please try again: {0}")]
    BadCredentials(String),

    #[error("Insufficient scope: {0}")]
    InsufficientScope(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    // Unclassified HTTP
    #[error("Error unmarshalling the following into a cloud controller error: {}", String::from_utf8_lossy(.raw_response))]
    UnknownHttpSource { status: u16, raw_response: Vec<u8> },

    #[error("Unexpected Response\nResponse code: {status}\nCC code:       {}\nCC error code: {}\nRequest ID:    {}\nDescription:   {}", .error.code, .error.error_code, .request_ids.join(", "), .error.description)]
    V2UnexpectedResponse {
        status: u16,
        error: V2ErrorResponse,
        request_ids: Vec<String>,
    },

    #[error("Unexpected Response\nResponse code: {status}\nRequest ID:    {}\nErrors: {}", .request_ids.join(", "), format_v3_errors(.errors))]
    V3UnexpectedResponse {
        status: u16,
        errors: Vec<V3Error>,
        request_ids: Vec<String>,
    },

    #[error("Multiple errors occurred: {}", format_v3_errors(.errors))]
    MultiError { status: u16, errors: Vec<V3Error> },

    #[error("HTTP {status}: {}", String::from_utf8_lossy(.raw_response))]
    RawHttpStatus { status: u16, raw_response: Vec<u8> },

    // Decode
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Jsonry(#[from] JsonryError),

    #[error("Unexpected object in list at index {index}: {message}")]
    UnexpectedObjectInList { index: usize, message: String },

    // Jobs
    #[error("Job ({job_guid}) failed: {message}")]
    JobFailed { job_guid: String, message: String },

    #[error("Job ({job_guid}) polling timed out after {}s", .timeout.as_secs())]
    JobTimeout { job_guid: String, timeout: Duration },

    // Streaming
    #[error("Cannot rewind a streaming request body: {0}")]
    PipeSeek(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    // Routing
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Route {route} is missing parameter :{param}")]
    MissingRouteParam { route: String, param: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl CcError {
    /// Returns the HTTP status code behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnknownHttpSource { status, .. }
            | Self::V2UnexpectedResponse { status, .. }
            | Self::V3UnexpectedResponse { status, .. }
            | Self::MultiError { status, .. }
            | Self::RawHttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the server rejected the access token itself.
    pub fn is_invalid_auth_token(&self) -> bool {
        matches!(self, Self::InvalidAuthToken(_))
    }
}

fn format_v3_errors(errors: &[V3Error]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({}): {}", e.title, e.code, e.detail))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_error_response_tolerates_missing_fields() {
        let parsed: V2ErrorResponse = serde_json::from_str(r#"{"description":"boom"}"#).unwrap();
        assert_eq!(parsed.description, "boom");
        assert_eq!(parsed.code, 0);
        assert!(parsed.error_code.is_empty());
    }

    #[test]
    fn test_status_only_for_unclassified_kinds() {
        let err = CcError::UnknownHttpSource {
            status: 404,
            raw_response: b"not json".to_vec(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(CcError::Forbidden("no".into()).status(), None);
    }

    #[test]
    fn test_unexpected_response_message_includes_request_ids() {
        let err = CcError::V2UnexpectedResponse {
            status: 500,
            error: V2ErrorResponse {
                code: 10001,
                description: "Something bad".into(),
                error_code: "CF-Boom".into(),
            },
            request_ids: vec!["abc".into(), "def".into()],
        };
        let message = err.to_string();
        assert!(message.contains("Response code: 500"));
        assert!(message.contains("abc, def"));
        assert!(message.contains("CF-Boom"));
    }
}
