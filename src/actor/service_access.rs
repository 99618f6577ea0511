//
//  cf-client
//  actor/service_access.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Service access summaries: which plans of which broker's services are
//! visible to which organizations.

use tracing::debug;

use super::{Actor, ActorError, Result};
use crate::api::ccv2::{Service, ServiceBroker, ServicePlan};
use crate::api::common::{Warned, Warnings};
use crate::api::Query;

/// A plan and the organizations it has been made visible to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePlanSummary {
    pub plan: ServicePlan,
    /// Organization GUIDs. Empty for public plans unless explicitly shared.
    pub visible_to: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSummary {
    pub service: Service,
    pub plans: Vec<ServicePlanSummary>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceBrokerSummary {
    pub broker: ServiceBroker,
    pub services: Vec<ServiceSummary>,
}

fn filter(field: &str, value: &str) -> Query {
    Query::new().add("q", format!("{}:{}", field, value))
}

impl Actor {
    /// Summarizes brokers, their services, the services' plans and each
    /// plan's visibilities.
    ///
    /// An empty `broker_name` summarizes every broker.
    ///
    /// # Errors
    ///
    /// - [`ActorError::ServiceBrokerNotFound`] when `broker_name` matches nothing
    /// - The first API error met; warnings gathered up to that point are kept
    pub async fn get_service_broker_summaries(
        &self,
        broker_name: &str,
    ) -> Warned<Vec<ServiceBrokerSummary>, ActorError> {
        let mut warnings = Warnings::new();
        let result = self.broker_summaries(broker_name, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn broker_summaries(
        &self,
        broker_name: &str,
        warnings: &mut Warnings,
    ) -> Result<Vec<ServiceBrokerSummary>> {
        let clients = self.clients()?;

        let query = if broker_name.is_empty() {
            Query::new()
        } else {
            filter("name", broker_name)
        };
        let brokers = warnings.absorb(clients.v2.get_service_brokers(&query).await)?;
        if brokers.is_empty() && !broker_name.is_empty() {
            return Err(ActorError::ServiceBrokerNotFound(broker_name.to_string()));
        }

        let mut summaries = Vec::with_capacity(brokers.len());
        for broker in brokers {
            debug!("Summarizing broker {}", broker.name);
            let services = warnings.absorb(
                clients
                    .v2
                    .get_services(&filter("service_broker_guid", &broker.guid))
                    .await,
            )?;

            let mut service_summaries = Vec::with_capacity(services.len());
            for service in services {
                let plans = warnings.absorb(
                    clients
                        .v2
                        .get_service_plans(&filter("service_guid", &service.guid))
                        .await,
                )?;

                let mut plan_summaries = Vec::with_capacity(plans.len());
                for plan in plans {
                    let visibilities = warnings.absorb(
                        clients
                            .v2
                            .get_service_plan_visibilities(&filter("service_plan_guid", &plan.guid))
                            .await,
                    )?;
                    plan_summaries.push(ServicePlanSummary {
                        plan,
                        visible_to: visibilities
                            .into_iter()
                            .map(|v| v.organization_guid)
                            .collect(),
                    });
                }
                service_summaries.push(ServiceSummary {
                    service,
                    plans: plan_summaries,
                });
            }
            summaries.push(ServiceBrokerSummary {
                broker,
                services: service_summaries,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::actor;
    use super::*;
    use crate::api::common::CcError;
    use crate::api::fake::{Canned, FakeServer};
    use reqwest::Method;
    use serde_json::json;

    fn list(resources: serde_json::Value) -> Canned {
        Canned::new(200, json!({"next_url": null, "resources": resources}))
    }

    #[tokio::test]
    async fn test_summaries_walk_every_level_in_order() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_brokers?q=name%3Abroker",
            list(json!([{"metadata": {"guid": "b-1"}, "entity": {"name": "broker"}}])).warn("brokers"),
        );
        server.on(
            Method::GET,
            "/v2/services?q=service_broker_guid%3Ab-1",
            list(json!([{"metadata": {"guid": "svc-1"}, "entity": {"label": "mysql"}}])).warn("services"),
        );
        server.on(
            Method::GET,
            "/v2/service_plans?q=service_guid%3Asvc-1",
            list(json!([
                {"metadata": {"guid": "p-1"}, "entity": {"name": "small", "public": true}},
                {"metadata": {"guid": "p-2"}, "entity": {"name": "large", "public": false}}
            ]))
            .warn("plans"),
        );
        server.on(
            Method::GET,
            "/v2/service_plan_visibilities?q=service_plan_guid%3Ap-1",
            list(json!([])).warn("visibilities-1"),
        );
        server.on(
            Method::GET,
            "/v2/service_plan_visibilities?q=service_plan_guid%3Ap-2",
            list(json!([{"metadata": {"guid": "v-1"}, "entity": {"service_plan_guid": "p-2", "organization_guid": "o-1"}}]))
                .warn("visibilities-2"),
        );

        let outcome = actor(&server).get_service_broker_summaries("broker").await;

        let summaries = outcome.result.unwrap();
        assert_eq!(summaries.len(), 1);
        let service = &summaries[0].services[0];
        assert_eq!(service.service.label, "mysql");
        assert_eq!(service.plans[0].plan.name, "small");
        assert!(service.plans[0].visible_to.is_empty());
        assert_eq!(service.plans[1].visible_to, vec!["o-1".to_string()]);
        assert_eq!(
            outcome.warnings.as_slice(),
            &["brokers", "services", "plans", "visibilities-1", "visibilities-2"]
        );
    }

    #[tokio::test]
    async fn test_unknown_broker() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_brokers?q=name%3Anope",
            list(json!([])).warn("looked"),
        );

        let outcome = actor(&server).get_service_broker_summaries("nope").await;

        assert!(matches!(outcome.result, Err(ActorError::ServiceBrokerNotFound(ref n)) if n == "nope"));
        assert_eq!(outcome.warnings.as_slice(), &["looked"]);
    }

    #[tokio::test]
    async fn test_error_keeps_earlier_warnings() {
        let server = FakeServer::new();
        server.on(
            Method::GET,
            "/v2/service_brokers",
            list(json!([{"metadata": {"guid": "b-1"}, "entity": {"name": "broker"}}])).warn("brokers"),
        );
        server.on(
            Method::GET,
            "/v2/services",
            Canned::new(403, json!({"code": 10003, "description": "no", "error_code": "CF-NotAuthorized"}))
                .warn("services"),
        );

        let outcome = actor(&server).get_service_broker_summaries("").await;

        assert!(matches!(outcome.result, Err(ActorError::Cc(CcError::Forbidden(_)))));
        assert_eq!(outcome.warnings.as_slice(), &["brokers", "services"]);
    }
}
