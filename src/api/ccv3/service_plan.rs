//
//  cf-client
//  api/ccv3/service_plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::{Client, GET_SERVICE_PLAN};
use crate::api::common::{Warned, Warnings};

crate::jsonry! {
    /// A service plan and the maintenance level it currently offers.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServicePlan {
        #[jsonry = "guid"]
        pub guid: String,
        #[jsonry = "name"]
        pub name: String,
        #[jsonry = "maintenance_info.version"]
        pub maintenance_info_version: String,
        #[jsonry = "maintenance_info.description"]
        pub maintenance_info_description: String,
    }
}

impl Client {
    /// Fetches service plan `guid`.
    pub async fn get_service_plan(&self, guid: &str) -> Warned<ServicePlan> {
        match self
            .router
            .request(GET_SERVICE_PLAN, &[("service_plan_guid", guid)])
        {
            Ok(request) => self.make(request).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}
