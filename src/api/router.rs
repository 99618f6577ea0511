//
//  cf-client
//  api/router.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Routing
//!
//! A [`Router`] turns a route name plus path parameters into a [`Request`].
//! Each client is handed its own route table at construction time; there is
//! no process-wide registry.
//!
//! Path templates use `:name` placeholders:
//!
//! ```text
//! GetServiceBroker  GET  /v2/service_brokers/:service_broker_guid
//! ```

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use url::Url;

use crate::api::common::{CcError, Result};
use crate::api::Request;

/// Characters escaped when substituting a path parameter.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A named endpoint: method plus path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
}

impl Route {
    pub fn new(name: &'static str, method: Method, path: &'static str) -> Self {
        Self { name, method, path }
    }

    /// Substitutes `:param` placeholders with percent-encoded values.
    ///
    /// # Errors
    ///
    /// Returns [`CcError::MissingRouteParam`] when a placeholder has no value.
    pub fn expand(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut expanded = Vec::new();
        for segment in self.path.split('/') {
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == param)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| CcError::MissingRouteParam {
                            route: self.name.to_string(),
                            param: param.to_string(),
                        })?;
                    expanded.push(utf8_percent_encode(value, PATH_SEGMENT).to_string());
                }
                None => expanded.push(segment.to_string()),
            }
        }
        Ok(expanded.join("/"))
    }
}

/// Resolves route names against a base URL.
///
/// # Example
///
/// ```rust
/// use cf_client::api::{Route, Router};
/// use reqwest::Method;
/// use url::Url;
///
/// let router = Router::new(
///     Url::parse("https://api.example.com").unwrap(),
///     vec![Route::new("GetApp", Method::GET, "/v2/apps/:app_guid")],
/// );
///
/// let request = router.request("GetApp", &[("app_guid", "a b")]).unwrap();
/// assert_eq!(request.url.as_str(), "https://api.example.com/v2/apps/a%20b");
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    base: Url,
    routes: HashMap<&'static str, Route>,
}

impl Router {
    pub fn new(base: Url, routes: Vec<Route>) -> Self {
        Self {
            base,
            routes: routes.into_iter().map(|r| (r.name, r)).collect(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Points the router at a different API root.
    pub fn set_base(&mut self, base: Url) {
        self.base = base;
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Builds a request for a named route.
    ///
    /// # Errors
    ///
    /// - [`CcError::UnknownRoute`] if the table has no such route
    /// - [`CcError::MissingRouteParam`] if a placeholder is left unfilled
    /// - [`CcError::InvalidUrl`] if the result is not a valid URL
    pub fn request(&self, name: &str, params: &[(&str, &str)]) -> Result<Request> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| CcError::UnknownRoute(name.to_string()))?;
        let path = route.expand(params)?;
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        let url = Url::parse(&joined).map_err(|e| CcError::InvalidUrl(format!("{}: {}", joined, e)))?;
        Ok(Request::new(route.method.clone(), url))
    }

    /// Builds a request for a literal URL.
    ///
    /// Absolute URLs are used verbatim; server-relative ones are resolved
    /// against the router's base.
    pub fn request_for_url(&self, method: Method, url: &str) -> Result<Request> {
        let url = resolve_url(&self.base, url)?;
        Ok(Request::new(method, url))
    }
}

/// Resolves an absolute or server-relative URL against `base`.
pub fn resolve_url(base: &Url, url: &str) -> Result<Url> {
    base.join(url)
        .map_err(|e| CcError::InvalidUrl(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(
            Url::parse("https://api.example.com/").unwrap(),
            vec![
                Route::new("GetJob", Method::GET, "/v2/jobs/:job_guid"),
                Route::new("PostThing", Method::POST, "/v2/things"),
            ],
        )
    }

    #[test]
    fn test_request_expands_params() {
        let request = router().request("GetJob", &[("job_guid", "abc/123")]).unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "https://api.example.com/v2/jobs/abc%2F123");
    }

    #[test]
    fn test_request_carries_route_method() {
        let request = router().request("PostThing", &[]).unwrap();
        assert_eq!(request.method, Method::POST);
        assert!(!request.retry_eligible());
    }

    #[test]
    fn test_unknown_route() {
        assert!(matches!(
            router().request("Nope", &[]),
            Err(CcError::UnknownRoute(name)) if name == "Nope"
        ));
    }

    #[test]
    fn test_missing_param() {
        assert!(matches!(
            router().request("GetJob", &[]),
            Err(CcError::MissingRouteParam { param, .. }) if param == "job_guid"
        ));
    }

    #[test]
    fn test_request_for_relative_and_absolute_urls() {
        let router = router();
        let relative = router
            .request_for_url(Method::GET, "/v2/apps?page=2&results-per-page=50")
            .unwrap();
        assert_eq!(
            relative.url.as_str(),
            "https://api.example.com/v2/apps?page=2&results-per-page=50"
        );

        let absolute = router
            .request_for_url(Method::GET, "https://other.example.com/v3/jobs/1")
            .unwrap();
        assert_eq!(absolute.url.host_str(), Some("other.example.com"));
    }
}
