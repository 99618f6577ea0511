//
//  cf-client
//  api/fake.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Scripted in-process server used by client and actor tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;

use crate::api::common::Result;
use crate::api::wrapper::ErrorWrapper;
use crate::api::{build_chain, Connection, ConnectionWrapper, Request, RequestBody, Response};

/// A canned response.
#[derive(Debug, Clone)]
pub(crate) struct Canned {
    pub status: u16,
    pub body: Value,
    pub warnings: Vec<String>,
    pub location: Option<String>,
}

impl Canned {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            warnings: Vec::new(),
            location: None,
        }
    }

    pub fn warn(mut self, warning: &str) -> Self {
        self.warnings.push(warning.to_string());
        self
    }

    pub fn location(mut self, url: &str) -> Self {
        self.location = Some(url.to_string());
        self
    }
}

struct Stub {
    method: Method,
    target: String,
    responses: VecDeque<Canned>,
}

/// A request the fake received.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

/// Matches stubs on method plus path, or path and query when the stub's
/// target contains `?`. Repeated stubs for one target answer in order and
/// the last one keeps answering.
#[derive(Default)]
pub(crate) struct FakeServer {
    stubs: Mutex<Vec<Stub>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(self: &Arc<Self>, method: Method, target: &str, canned: Canned) -> Arc<Self> {
        let mut stubs = self.stubs.lock().unwrap();
        match stubs
            .iter_mut()
            .find(|s| s.method == method && s.target == target)
        {
            Some(stub) => stub.responses.push_back(canned),
            None => stubs.push(Stub {
                method,
                target: target.to_string(),
                responses: VecDeque::from([canned]),
            }),
        }
        self.clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Wraps the fake with the v2 error classifier.
    pub fn v2_chain(self: &Arc<Self>) -> Box<dyn Connection> {
        self.chain(ErrorWrapper::new())
    }

    /// Wraps the fake with the v3 error classifier.
    pub fn v3_chain(self: &Arc<Self>) -> Box<dyn Connection> {
        self.chain(ErrorWrapper::v3())
    }

    /// Wraps the fake with the UAA error classifier.
    pub fn uaa_chain(self: &Arc<Self>) -> Box<dyn Connection> {
        self.chain(ErrorWrapper::uaa())
    }

    fn chain(self: &Arc<Self>, errors: ErrorWrapper) -> Box<dyn Connection> {
        let wrappers: Vec<Box<dyn ConnectionWrapper>> = vec![Box::new(errors)];
        build_chain(Box::new(self.clone()), wrappers)
    }

    fn answer(&self, request: &Request) -> Canned {
        let path = request.url.path().to_string();
        let full = match request.url.query() {
            Some(query) => format!("{}?{}", path, query),
            None => path.clone(),
        };

        let mut stubs = self.stubs.lock().unwrap();
        let stub = stubs.iter_mut().find(|s| {
            s.method == request.method
                && if s.target.contains('?') {
                    s.target == full
                } else {
                    s.target == path
                }
        });
        match stub {
            Some(stub) if stub.responses.len() > 1 => stub.responses.pop_front().unwrap(),
            Some(stub) => stub.responses[0].clone(),
            None => Canned::new(
                404,
                json!({"code": 10000, "description": format!("Unknown request {}", full), "error_code": "CF-NotFound"}),
            ),
        }
    }
}

#[async_trait]
impl Connection for FakeServer {
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
        let body = match &mut request.body {
            RequestBody::Pipe(pipe) => match pipe.take_reader() {
                Some(mut reader) => {
                    let mut streamed = Vec::new();
                    let _ = reader.read_to_end(&mut streamed).await;
                    Some(streamed)
                }
                None => None,
            },
            other => other.as_bytes().map(<[u8]>::to_vec),
        };
        self.requests.lock().unwrap().push(Recorded {
            method: request.method.clone(),
            url: request.url.to_string(),
            body,
        });

        let canned = self.answer(request);
        response.status = canned.status;
        response.protocol = "HTTP/1.1".to_string();
        response.warnings = canned.warnings;
        response.resource_location_url = canned.location;
        response.raw_body = if canned.body.is_null() {
            Vec::new()
        } else {
            canned.body.to_string().into_bytes()
        };
        Ok(())
    }
}
