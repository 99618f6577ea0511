//
//  cf-client
//  api/ccv2/service_plan_visibility.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::{Client, GET_SERVICE_PLAN_VISIBILITIES};
use crate::api::common::Warned;
use crate::api::Query;

crate::jsonry! {
    /// Grants an organization access to a non-public plan.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServicePlanVisibility {
        #[jsonry = "metadata.guid"]
        pub guid: String,
        #[jsonry = "entity.service_plan_guid"]
        pub service_plan_guid: String,
        #[jsonry = "entity.organization_guid"]
        pub organization_guid: String,
    }
}

impl Client {
    /// Lists plan visibilities matching `query`, e.g.
    /// `q=service_plan_guid:<guid>`.
    pub async fn get_service_plan_visibilities(
        &self,
        query: &Query,
    ) -> Warned<Vec<ServicePlanVisibility>> {
        self.list(GET_SERVICE_PLAN_VISIBILITIES, query).await
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
    async fn test_get_service_plan_visibilities() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_plan_visibilities?q=service_plan_guid%3Ap-1",
            Canned::new(200, json!({
                "resources": [
                    {"metadata": {"guid": "v-1"}, "entity": {"service_plan_guid": "p-1", "organization_guid": "o-1"}},
                    {"metadata": {"guid": "v-2"}, "entity": {"service_plan_guid": "p-1", "organization_guid": "o-2"}}
                ]
            })),
        );

        let visibilities = client(&server)
            .get_service_plan_visibilities(&Query::new().add("q", "service_plan_guid:p-1"))
            .await
            .result
            .unwrap();

        let orgs: Vec<_> = visibilities.iter().map(|v| v.organization_guid.as_str()).collect();
        assert_eq!(orgs, vec!["o-1", "o-2"]);
    }
}
