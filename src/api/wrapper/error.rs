//
//  cf-client
//  api/wrapper/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error classification.
//!
//! Each API family has its own error document and its own table mapping
//! `(status, code)` to an error kind. Adding a kind is a table entry, not a
//! new branch.
//!
//! | API | Body | Key |
//! |-----|------|-----|
//! | Cloud Controller v2 | `{"code", "description", "error_code"}` | `error_code` |
//! | Cloud Controller v3 | `{"errors": [{"code", "detail", "title"}]}` | `title` |
//! | UAA | `{"error", "error_description"}` | `error` |
//!
//! A body that does not parse as the family's error document becomes
//! [`CcError::UnknownHttpSource`]: the server may not be a Cloud Foundry
//! component at all.

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::common::{CcError, Result, V2ErrorResponse, V3ErrorResponse};
use crate::api::{Connection, ConnectionWrapper, Request, Response};

/// Builds an error kind from the body's message.
pub type Classify = fn(String) -> CcError;

/// One row of a classification table. `None` matches any code.
pub type ErrorRule = (u16, Option<&'static str>, Classify);

/// Cloud Controller v2 classification table.
pub const V2_ERROR_RULES: &[ErrorRule] = &[
    (400, Some("CF-AppStoppedStatsError"), CcError::ApplicationStoppedStats),
    (400, Some("CF-InstancesError"), CcError::Instances),
    (400, Some("CF-InvalidRelation"), CcError::InvalidRelation),
    (400, Some("CF-NotStaged"), CcError::NotStaged),
    (400, Some("CF-ServiceBindingAppServiceTaken"), CcError::ServiceBindingTaken),
    (400, Some("CF-BuildpackNameTaken"), CcError::BuildpackNameTaken),
    (400, Some("CF-BuildpackInvalid"), CcError::BuildpackAlreadyExistsWithoutStack),
    (400, Some("CF-OrganizationNameTaken"), CcError::OrganizationNameTaken),
    (400, Some("CF-SpaceNameTaken"), CcError::SpaceNameTaken),
    (400, Some("CF-ServiceInstanceNameTaken"), CcError::ServiceInstanceNameTaken),
    (400, None, CcError::BadRequest),
    (401, Some("CF-InvalidAuthToken"), CcError::InvalidAuthToken),
    (401, None, CcError::Unauthorized),
    (403, None, CcError::Forbidden),
    (404, None, CcError::ResourceNotFound),
    (422, Some("CF-BuildpackNameStackTaken"), CcError::BuildpackAlreadyExistsForStack),
    (422, None, CcError::UnprocessableEntity),
    (502, Some("CF-ServiceBrokerCatalogInvalid"), CcError::ServiceBrokerCatalogInvalid),
    (502, Some("CF-ServiceBrokerRequestRejected"), CcError::ServiceBrokerRequestRejected),
    (502, Some("CF-ServiceBrokerBadResponse"), CcError::ServiceBrokerBadResponse),
];

/// Cloud Controller v3 classification table, keyed on the error title.
pub const V3_ERROR_RULES: &[ErrorRule] = &[
    (400, None, CcError::BadRequest),
    (401, Some("CF-InvalidAuthToken"), CcError::InvalidAuthToken),
    (401, None, CcError::Unauthorized),
    (403, None, CcError::Forbidden),
    (404, None, CcError::ResourceNotFound),
    (422, Some("CF-ServiceInstanceNameTaken"), CcError::ServiceInstanceNameTaken),
    (422, None, CcError::UnprocessableEntity),
    (503, Some("CF-ServiceUnavailable"), CcError::ServiceUnavailable),
];

/// UAA classification table, keyed on the `error` field.
pub const UAA_ERROR_RULES: &[ErrorRule] = &[
    (401, Some("invalid_token"), CcError::InvalidAuthToken),
    (401, Some("unauthorized"), CcError::BadCredentials),
    (403, Some("insufficient_scope"), CcError::InsufficientScope),
];

/// Finds the rule for `(status, code)`, preferring an exact code match.
pub fn lookup(rules: &[ErrorRule], status: u16, code: &str) -> Option<Classify> {
    rules
        .iter()
        .find(|(s, c, _)| *s == status && *c == Some(code))
        .or_else(|| rules.iter().find(|(s, c, _)| *s == status && c.is_none()))
        .map(|(_, _, classify)| *classify)
}

/// Classifies a v2 error response.
pub fn classify_v2(response: &Response) -> CcError {
    let body: V2ErrorResponse = match serde_json::from_slice(&response.raw_body) {
        Ok(body) => body,
        Err(_) => return unknown_source(response),
    };

    match lookup(V2_ERROR_RULES, response.status, &body.error_code) {
        Some(classify) => classify(body.description),
        None => CcError::V2UnexpectedResponse {
            status: response.status,
            error: body,
            request_ids: response.request_ids(),
        },
    }
}

/// Classifies a v3 error response.
pub fn classify_v3(response: &Response) -> CcError {
    let body: V3ErrorResponse = match serde_json::from_slice(&response.raw_body) {
        Ok(body) => body,
        Err(_) => return unknown_source(response),
    };

    if body.errors.len() > 1 {
        return CcError::MultiError {
            status: response.status,
            errors: body.errors,
        };
    }

    if let Some(single) = body.errors.first() {
        if let Some(classify) = lookup(V3_ERROR_RULES, response.status, &single.title) {
            return classify(single.detail.clone());
        }
    }

    CcError::V3UnexpectedResponse {
        status: response.status,
        errors: body.errors,
        request_ids: response.request_ids(),
    }
}

#[derive(Debug, Deserialize)]
struct UaaErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Classifies a UAA error response.
pub fn classify_uaa(response: &Response) -> CcError {
    let body: UaaErrorResponse = match serde_json::from_slice(&response.raw_body) {
        Ok(body) => body,
        Err(_) => return unknown_source(response),
    };

    match lookup(UAA_ERROR_RULES, response.status, &body.error) {
        Some(classify) => classify(body.error_description),
        None => CcError::RawHttpStatus {
            status: response.status,
            raw_response: response.raw_body.clone(),
        },
    }
}

fn unknown_source(response: &Response) -> CcError {
    CcError::UnknownHttpSource {
        status: response.status,
        raw_response: response.raw_body.clone(),
    }
}

/// Converts non-2xx/3xx responses into typed errors.
///
/// Responses below 400 pass through untouched. Errors returned by the inner
/// link (transport failures) are passed through as well.
pub struct ErrorWrapper {
    classify: fn(&Response) -> CcError,
}

impl ErrorWrapper {
    /// Classifier for the v2 Cloud Controller.
    pub fn new() -> Self {
        Self {
            classify: classify_v2,
        }
    }

    /// Classifier for the v3 Cloud Controller.
    pub fn v3() -> Self {
        Self {
            classify: classify_v3,
        }
    }

    /// Classifier for UAA.
    pub fn uaa() -> Self {
        Self {
            classify: classify_uaa,
        }
    }
}

impl Default for ErrorWrapper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionWrapper for ErrorWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        inner.make(request, response).await?;
        if response.status >= 400 {
            return Err((self.classify)(response));
        }
        Ok(())
    }
}
