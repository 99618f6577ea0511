//
//  cf-client
//  api/ccv3/service_instance.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Service instances.

use tracing::debug;

use super::{Client, JobUrl, GET_SERVICE_INSTANCES, PATCH_SERVICE_INSTANCE};
use crate::api::common::{Warned, Warnings};
use crate::api::Query;

pub const SERVICE_INSTANCE_TYPE_MANAGED: &str = "managed";
pub const SERVICE_INSTANCE_TYPE_USER_PROVIDED: &str = "user-provided";

crate::jsonry! {
    /// A service instance.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServiceInstance {
        #[jsonry = "guid"]
        pub guid: String,
        #[jsonry = "name"]
        pub name: String,
        /// `managed` or `user-provided`.
        #[jsonry = "type"]
        pub instance_type: String,
        #[jsonry = "upgrade_available"]
        pub upgrade_available: bool,
        /// Maintenance level the instance was last provisioned or updated at.
        #[jsonry = "maintenance_info.version"]
        pub maintenance_info_version: String,
        #[jsonry = "relationships.service_plan.data.guid"]
        pub service_plan_guid: String,
        #[jsonry = "relationships.space.data.guid"]
        pub space_guid: String,
    }

    /// The fields of a `PATCH /v3/service_instances/:guid` request.
    ///
    /// Unset fields are not sent.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServiceInstanceUpdate {
        #[jsonry = "name,omitempty"]
        pub name: String,
        #[jsonry = "maintenance_info.version,omitempty"]
        pub maintenance_info_version: String,
        #[jsonry = "relationships.service_plan.data.guid,omitempty"]
        pub service_plan_guid: String,
        #[jsonry = "tags,omitempty"]
        pub tags: Vec<String>,
    }
}

impl Client {
    /// Lists service instances matching `query`, e.g.
    /// `names=<name>&space_guids=<guid>`.
    pub async fn get_service_instances(&self, query: &Query) -> Warned<Vec<ServiceInstance>> {
        self.list(GET_SERVICE_INSTANCES, query).await
    }

    /// Sends `update` for instance `guid`.
    ///
    /// Returns the URL of the job performing the update. The URL is empty
    /// when the server completed the update synchronously.
    pub async fn update_service_instance(
        &self,
        guid: &str,
        update: &ServiceInstanceUpdate,
    ) -> Warned<JobUrl> {
        let request = match self
            .router
            .request(PATCH_SERVICE_INSTANCE, &[("service_instance_guid", guid)])
            .and_then(|request| request.with_json_body(update))
        {
            Ok(request) => request,
            Err(err) => return Warned::err(err, Warnings::new()),
        };

        let (result, mut response) = self.send(request).await;
        let warnings = Warnings::from(std::mem::take(&mut response.warnings));
        let job_url = JobUrl::new(response.resource_location_url.unwrap_or_default());
        debug!("Update of service instance {} queued as {:?}", guid, job_url);
        Warned::new(result.map(|()| job_url), warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use super::*;
    use crate::api::fake::{Canned, FakeServer};
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_service_instances_follows_v3_pages() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v3/service_instances?names=db",
            Canned::new(200, json!({
                "pagination": {"next": {"href": "https://api.example.com/v3/service_instances?names=db&page=2"}},
                "resources": [{"guid": "si-1", "name": "db", "type": "managed"}]
            }))
            .warn("page-1"),
        );
        server.on(
            Method::GET,
            "/v3/service_instances?names=db&page=2",
            Canned::new(200, json!({
                "pagination": {"next": null},
                "resources": [{
                    "guid": "si-2",
                    "name": "db",
                    "type": "managed",
                    "maintenance_info": {"version": "1.0.0"},
                    "relationships": {"service_plan": {"data": {"guid": "p-1"}}, "space": {"data": {"guid": "s-1"}}}
                }]
            }))
            .warn("page-2"),
        );

        let outcome = client(&server)
            .get_service_instances(&Query::new().add("names", "db"))
            .await;

        let instances = outcome.result.unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].instance_type, SERVICE_INSTANCE_TYPE_MANAGED);
        assert_eq!(instances[1].service_plan_guid, "p-1");
        assert_eq!(instances[1].space_guid, "s-1");
        assert_eq!(instances[1].maintenance_info_version, "1.0.0");
        assert_eq!(outcome.warnings.as_slice(), &["page-1", "page-2"]);
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields_and_returns_job_url() {
        let server = FakeServer::new();
        server.on(
            Method::PATCH,
            "/v3/service_instances/si-1",
            Canned::new(202, serde_json::Value::Null)
                .location("https://api.example.com/v3/jobs/job-1")
                .warn("updating"),
        );

        let update = ServiceInstanceUpdate {
            maintenance_info_version: "2.0.0".into(),
            ..Default::default()
        };
        let outcome = client(&server).update_service_instance("si-1", &update).await;

        assert_eq!(
            outcome.result.unwrap().as_str(),
            "https://api.example.com/v3/jobs/job-1"
        );
        assert_eq!(outcome.warnings.as_slice(), &["updating"]);

        let sent: serde_json::Value =
            serde_json::from_slice(server.requests()[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent, json!({"maintenance_info": {"version": "2.0.0"}}));
    }
}
