//
//  cf-client
//  api/ccv2/service.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Services offered by brokers.

use super::{Client, GET_SERVICES};
use crate::api::common::Warned;
use crate::api::Query;

crate::jsonry! {
    /// A service offering.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Service {
        #[jsonry = "metadata.guid"]
        pub guid: String,
        /// The service's display name.
        #[jsonry = "entity.label"]
        pub label: String,
        #[jsonry = "entity.description"]
        pub description: String,
        #[jsonry = "entity.service_broker_guid"]
        pub service_broker_guid: String,
        #[jsonry = "entity.service_broker_name"]
        pub service_broker_name: String,
    }
}

impl Client {
    /// Lists services matching `query`, e.g. `q=service_broker_guid:<guid>`.
    pub async fn get_services(&self, query: &Query) -> Warned<Vec<Service>> {
        self.list(GET_SERVICES, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use crate::api::fake::{Canned, FakeServer};
    use crate::api::Query;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_services_by_broker() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/services?q=service_broker_guid%3Ab-1",
            Canned::new(200, json!({
                "next_url": "",
                "resources": [
                    {"metadata": {"guid": "svc-1"}, "entity": {"label": "mysql", "service_broker_guid": "b-1"}},
                    {"metadata": {"guid": "svc-2"}, "entity": {"label": "redis", "service_broker_guid": "b-1"}}
                ]
            })),
        );

        let outcome = client(&server)
            .get_services(&Query::new().add("q", "service_broker_guid:b-1"))
            .await;

        let services = outcome.result.unwrap();
        let labels: Vec<_> = services.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["mysql", "redis"]);
        assert_eq!(services[0].service_broker_guid, "b-1");
        assert_eq!(server.requests().len(), 1);
    }
}
