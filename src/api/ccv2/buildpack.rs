//
//  cf-client
//  api/ccv2/buildpack.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Buildpacks and their bits.

use std::path::Path;

use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;

use super::{Client, GET_BUILDPACKS, PUT_BUILDPACK_BITS};
use crate::api::common::{CcError, Warned, Warnings};
use crate::api::upload::{upload_with_progress, MultipartForm, ProgressFn};
use crate::api::{Query, Response};

/// Form field the Cloud Controller expects the buildpack archive under.
pub const BUILDPACK_FIELD: &str = "buildpack";

crate::jsonry! {
    /// A buildpack.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Buildpack {
        #[jsonry = "metadata.guid"]
        pub guid: String,
        #[jsonry = "entity.name"]
        pub name: String,
        /// Detection order, 1 is checked first.
        #[jsonry = "entity.position,omitempty"]
        pub position: Option<i64>,
        #[jsonry = "entity.enabled,omitempty"]
        pub enabled: Option<bool>,
        #[jsonry = "entity.locked,omitempty"]
        pub locked: Option<bool>,
        #[jsonry = "entity.filename"]
        pub filename: String,
        #[jsonry = "entity.stack"]
        pub stack: String,
    }
}

impl Client {
    /// Lists buildpacks matching `query`.
    pub async fn get_buildpacks(&self, query: &Query) -> Warned<Vec<Buildpack>> {
        self.list(GET_BUILDPACKS, query).await
    }

    /// Uploads the archive at `path` as the bits of buildpack `guid`.
    pub async fn upload_buildpack(&self, guid: &str, path: &Path) -> Warned<Buildpack> {
        self.upload_buildpack_with_progress(guid, path, None).await
    }

    /// Like [`Client::upload_buildpack`], reporting bytes sent to `progress`.
    ///
    /// The archive is streamed, never held in memory, so the request cannot
    /// be retried once it has started.
    ///
    /// # Errors
    ///
    /// - [`CcError::Upload`] if the file cannot be opened or read
    /// - Any classified Cloud Controller error from the PUT
    pub async fn upload_buildpack_with_progress(
        &self,
        guid: &str,
        path: &Path,
        progress: Option<ProgressFn>,
    ) -> Warned<Buildpack> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(err) => {
                return Warned::err(
                    CcError::Upload(format!("{}: {}", path.display(), err)),
                    Warnings::new(),
                )
            }
        };
        let size = match file.metadata().await {
            Ok(meta) => meta.len(),
            Err(err) => return Warned::err(CcError::Upload(err.to_string()), Warnings::new()),
        };

        let request = match self
            .router
            .request(PUT_BUILDPACK_BITS, &[("buildpack_guid", guid)])
        {
            Ok(request) => request,
            Err(err) => return Warned::err(err, Warnings::new()),
        };

        let mut form = MultipartForm::new(BUILDPACK_FIELD, file_name.as_str());
        if let Some(progress) = progress {
            form = form.with_progress(progress);
        }
        let length = form.content_length(size);
        let body = form.stream(file);

        let content_type = match HeaderValue::from_str(&body.content_type) {
            Ok(value) => value,
            Err(err) => return Warned::err(CcError::Upload(err.to_string()), Warnings::new()),
        };
        let mut request = request
            .with_header(CONTENT_TYPE, content_type)
            .with_header(CONTENT_LENGTH, HeaderValue::from(length))
            .with_body(body.body);

        debug!("Uploading {} ({} bytes) to buildpack {}", file_name, size, guid);
        let mut response = Response::new();
        let result = upload_with_progress(
            self.connection.as_ref(),
            &mut request,
            &mut response,
            body.completion,
        )
        .await;

        let warnings = Warnings::from(std::mem::take(&mut response.warnings));
        Warned::new(result.and_then(|()| response.decode_or_default()), warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use super::*;
    use crate::api::fake::{Canned, FakeServer};
    use reqwest::Method;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn test_get_buildpacks() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/buildpacks",
            Canned::new(200, json!({
                "resources": [
                    {"metadata": {"guid": "bp-1"}, "entity": {"name": "ruby", "position": 1, "enabled": true, "locked": false, "stack": "cflinuxfs4"}},
                    {"metadata": {"guid": "bp-2"}, "entity": {"name": "go"}}
                ]
            })),
        );

        let buildpacks = client(&server)
            .get_buildpacks(&Query::new())
            .await
            .result
            .unwrap();

        assert_eq!(buildpacks[0].position, Some(1));
        assert_eq!(buildpacks[0].enabled, Some(true));
        assert_eq!(buildpacks[0].locked, Some(false));
        assert_eq!(buildpacks[1].position, None);
        assert_eq!(buildpacks[1].stack, "");
    }

    #[test]
    fn test_unset_options_are_omitted() {
        let buildpack = Buildpack {
            name: "ruby".into(),
            position: Some(0),
            ..Default::default()
        };
        let json = crate::jsonry::marshal(&buildpack);
        assert_eq!(json["entity"]["position"], 0);
        assert!(json["entity"].get("enabled").is_none());
        assert!(json["entity"].get("locked").is_none());
    }

    #[tokio::test]
    async fn test_upload_buildpack() {
        let mut archive = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
        archive.write_all(b"zip-bytes").unwrap();

        let server = FakeServer::new();
        server.on(
            Method::PUT,
            "/v2/buildpacks/bp-1/bits",
            Canned::new(201, json!({"metadata": {"guid": "bp-1"}, "entity": {"name": "ruby", "filename": "ruby.zip"}}))
                .warn("uploaded"),
        );

        let outcome = client(&server).upload_buildpack("bp-1", archive.path()).await;

        let buildpack = outcome.result.unwrap();
        assert_eq!(buildpack.filename, "ruby.zip");
        assert_eq!(outcome.warnings.as_slice(), &["uploaded"]);
        let requests = server.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert!(requests[0].url.ends_with("/v2/buildpacks/bp-1/bits"));
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let server = FakeServer::new();
        let outcome = client(&server)
            .upload_buildpack("bp-1", Path::new("/definitely/not/here.zip"))
            .await;

        assert!(matches!(outcome.result, Err(CcError::Upload(_))));
        assert!(server.requests().is_empty());
    }
}
