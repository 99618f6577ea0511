//
//  cf-client
//  api/ccv2/service_broker.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Service brokers.

use super::{Client, GET_SERVICE_BROKERS};
use crate::api::common::Warned;
use crate::api::Query;

crate::jsonry! {
    /// A service broker registered with the Cloud Controller.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cf_client::api::ccv2::ServiceBroker;
    ///
    /// let broker: ServiceBroker = cf_client::jsonry::from_slice(br#"{
    ///     "metadata": {"guid": "broker-1"},
    ///     "entity": {"name": "mysql", "broker_url": "https://broker.example.com"}
    /// }"#).unwrap();
    ///
    /// assert_eq!(broker.guid, "broker-1");
    /// assert_eq!(broker.name, "mysql");
    /// ```
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServiceBroker {
        #[jsonry = "metadata.guid"]
        pub guid: String,
        #[jsonry = "entity.name"]
        pub name: String,
        #[jsonry = "entity.broker_url"]
        pub broker_url: String,
        #[jsonry = "entity.auth_username"]
        pub auth_username: String,
        /// Set for space-scoped brokers only.
        #[jsonry = "entity.space_guid"]
        pub space_guid: String,
    }
}

impl Client {
    /// Lists service brokers matching `query`.
    pub async fn get_service_brokers(&self, query: &Query) -> Warned<Vec<ServiceBroker>> {
        self.list(GET_SERVICE_BROKERS, query).await
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
    async fn test_get_service_brokers_follows_pages() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_brokers?q=name%3Amysql",
            Canned::new(200, json!({
                "next_url": "/v2/service_brokers?q=name%3Amysql&page=2",
                "resources": [{"metadata": {"guid": "b-1"}, "entity": {"name": "mysql"}}]
            }))
            .warn("this is a warning"),
        );
        server.on(
            Method::GET,
            "/v2/service_brokers?q=name%3Amysql&page=2",
            Canned::new(200, json!({
                "next_url": null,
                "resources": [{"metadata": {"guid": "b-2"}, "entity": {"name": "mysql", "space_guid": "s-1"}}]
            }))
            .warn("this is another warning"),
        );

        let outcome = client(&server)
            .get_service_brokers(&Query::new().add("q", "name:mysql"))
            .await;

        let brokers = outcome.result.unwrap();
        assert_eq!(brokers.len(), 2);
        assert_eq!(brokers[1].space_guid, "s-1");
        assert_eq!(
            outcome.warnings.as_slice(),
            &["this is a warning", "this is another warning"]
        );
    }

    #[tokio::test]
    async fn test_get_service_brokers_error() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_brokers",
            Canned::new(403, json!({"code": 10003, "description": "You are not authorized", "error_code": "CF-NotAuthorized"}))
                .warn("w"),
        );

        let outcome = client(&server).get_service_brokers(&Query::new()).await;

        assert!(matches!(outcome.result, Err(crate::api::common::CcError::Forbidden(_))));
        assert_eq!(outcome.warnings.len(), 1);
    }
}
