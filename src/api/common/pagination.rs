//
//  cf-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Engine for Cloud Controller List Endpoints
//!
//! List endpoints return one page at a time, each carrying a link to the next
//! page. The engine follows those links until none remains, decoding every
//! element of each page into a typed resource and handing it to a callback.
//!
//! # Overview
//!
//! | Envelope | API | Next link |
//! |----------|-----|-----------|
//! | [`V2PaginatedEnvelope`] | v2 | `next_url` |
//! | [`V3PaginatedEnvelope`] | v3 | `pagination.next.href` |
//!
//! # Algorithm
//!
//! 1. Execute the current request through the connection chain
//! 2. Append the response's warnings, even on failure
//! 3. On failure, stop and return the warnings gathered so far
//! 4. Decode the envelope and every element of `resources`, in order
//! 5. Stop when the next link is empty
//! 6. Otherwise GET the next link (absolute or server-relative) and repeat
//!
//! # Example
//!
//! ```rust,no_run
//! use cf_client::api::common::{paginate, V2PaginatedEnvelope};
//! use cf_client::api::{Connection, Request};
//! use reqwest::Method;
//! use url::Url;
//!
//! # async fn run(connection: &dyn Connection) {
//! let request = Request::new(
//!     Method::GET,
//!     Url::parse("https://api.example.com/v2/service_brokers").unwrap(),
//! );
//!
//! let mut names = Vec::new();
//! let outcome = paginate::<V2PaginatedEnvelope, serde_json::Value, _>(connection, request, |broker| {
//!     names.push(broker["entity"]["name"].to_string());
//! })
//! .await;
//!
//! println!("{} brokers, {} warnings", names.len(), outcome.warnings.len());
//! # }
//! ```
//!
//! # Notes
//!
//! - Items already delivered to the callback are not rolled back when a later
//!   page fails
//! - An element that does not decode aborts the run with
//!   [`CcError::UnexpectedObjectInList`]

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{CcError, Result, Warned, Warnings};
use crate::api::router::resolve_url;
use crate::api::{Connection, Request, Response};

/// A decoded page of a list endpoint.
pub trait Page: DeserializeOwned {
    /// The link to the next page; `None` or empty ends pagination.
    fn next_url(&self) -> Option<&str>;

    /// Consumes the page, yielding its raw elements.
    fn into_resources(self) -> Vec<Value>;
}

/// v2 list envelope: `{"next_url": "...", "resources": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct V2PaginatedEnvelope {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<Value>,
}

impl Page for V2PaginatedEnvelope {
    fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    fn into_resources(self) -> Vec<Value> {
        self.resources
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct V3Link {
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct V3Pagination {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next: Option<V3Link>,
}

/// v3 list envelope: `{"pagination": {"next": {"href": "..."}}, "resources": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct V3PaginatedEnvelope {
    #[serde(default)]
    pub pagination: V3Pagination,
    #[serde(default)]
    pub resources: Vec<Value>,
}

impl Page for V3PaginatedEnvelope {
    fn next_url(&self) -> Option<&str> {
        self.pagination.next.as_ref().map(|link| link.href.as_str())
    }

    fn into_resources(self) -> Vec<Value> {
        self.resources
    }
}

/// Follows next-page links, calling `on_item` for every decoded element.
///
/// # Type Parameters
///
/// - `P` - The envelope shape ([`V2PaginatedEnvelope`] or [`V3PaginatedEnvelope`])
/// - `T` - The resource each element decodes into
///
/// # Returns
///
/// The warnings of every page fetched, in order, plus `Ok(())` or the error
/// of the failing page.
pub async fn paginate<P, T, F>(connection: &dyn Connection, request: Request, mut on_item: F) -> Warned<()>
where
    P: Page,
    T: DeserializeOwned,
    F: FnMut(T),
{
    let mut warnings = Warnings::new();
    let result = run_pages::<P, T, F>(connection, request, &mut on_item, &mut warnings).await;
    Warned::new(result, warnings)
}

/// Collects every element of a paginated list.
pub async fn list_all<P, T>(connection: &dyn Connection, request: Request) -> Warned<Vec<T>>
where
    P: Page,
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let outcome = paginate::<P, T, _>(connection, request, |item| items.push(item)).await;
    outcome.map(|()| items)
}

async fn run_pages<P, T, F>(
    connection: &dyn Connection,
    mut request: Request,
    on_item: &mut F,
    warnings: &mut Warnings,
) -> Result<()>
where
    P: Page,
    T: DeserializeOwned,
    F: FnMut(T),
{
    let mut page_number = 1;
    loop {
        debug!("Fetching page {} from {}", page_number, request.url);
        let mut response = Response::new();
        let result = connection.make(&mut request, &mut response).await;
        warnings.extend(response.warnings.drain(..));
        result?;

        let page: P = response.decode()?;
        let next = page.next_url().filter(|url| !url.is_empty()).map(str::to_string);

        for (index, raw) in page.into_resources().into_iter().enumerate() {
            let item = serde_json::from_value::<T>(raw).map_err(|e| {
                CcError::UnexpectedObjectInList {
                    index,
                    message: e.to_string(),
                }
            })?;
            on_item(item);
        }

        match next {
            None => return Ok(()),
            Some(next) => {
                let url = resolve_url(&request.url, &next)?;
                request = Request::new(Method::GET, url);
                page_number += 1;
            }
        }
    }
}
