//
//  cf-client
//  api/ccv2/service_plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Service plans.

use super::{Client, GET_SERVICE_PLANS};
use crate::api::common::Warned;
use crate::api::Query;

crate::jsonry! {
    /// A plan of a service.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServicePlan {
        #[jsonry = "metadata.guid"]
        pub guid: String,
        #[jsonry = "entity.name"]
        pub name: String,
        #[jsonry = "entity.description"]
        pub description: String,
        /// Visible to every organization.
        #[jsonry = "entity.public"]
        pub public: bool,
        #[jsonry = "entity.free"]
        pub free: bool,
        #[jsonry = "entity.service_guid"]
        pub service_guid: String,
    }
}

impl Client {
    /// Lists service plans matching `query`, e.g. `q=service_guid:<guid>`.
    pub async fn get_service_plans(&self, query: &Query) -> Warned<Vec<ServicePlan>> {
        self.list(GET_SERVICE_PLANS, query).await
    }
}
