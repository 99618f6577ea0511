//
//  cf-client
//  actor/service_instance.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use tracing::info;

use super::{Actor, ActorError, Result};
use crate::api::ccv3::ServiceInstanceUpdate;
use crate::api::common::{Warned, Warnings};
use crate::api::Query;

impl Actor {
    /// Upgrades service instance `name` in space `space_guid` to the
    /// maintenance level its plan currently offers, then waits for the
    /// update job.
    ///
    /// # Errors
    ///
    /// - [`ActorError::ServiceInstanceNotFound`] if no such instance exists
    /// - [`ActorError::ServiceInstanceUpgradeNotAvailable`] if the instance
    ///   has no plan, or already runs the plan's maintenance version
    /// - Job failures and timeouts from polling
    pub async fn upgrade_service_instance(&self, name: &str, space_guid: &str) -> Warned<(), ActorError> {
        let mut warnings = Warnings::new();
        let result = self.upgrade(name, space_guid, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn upgrade(&self, name: &str, space_guid: &str, warnings: &mut Warnings) -> Result<()> {
        let clients = self.clients()?;

        let query = Query::new()
            .add("names", name)
            .add("space_guids", space_guid);
        let instance = warnings
            .absorb(clients.v3.get_service_instances(&query).await)?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::ServiceInstanceNotFound(name.to_string()))?;

        if instance.service_plan_guid.is_empty() {
            return Err(ActorError::ServiceInstanceUpgradeNotAvailable(name.to_string()));
        }
        let plan = warnings.absorb(clients.v3.get_service_plan(&instance.service_plan_guid).await)?;
        if plan.maintenance_info_version.is_empty()
            || plan.maintenance_info_version == instance.maintenance_info_version
        {
            return Err(ActorError::ServiceInstanceUpgradeNotAvailable(name.to_string()));
        }

        info!(
            "Upgrading {} from {:?} to {}",
            name, instance.maintenance_info_version, plan.maintenance_info_version
        );
        let update = ServiceInstanceUpdate {
            maintenance_info_version: plan.maintenance_info_version,
            ..Default::default()
        };
        let job = warnings.absorb(clients.v3.update_service_instance(&instance.guid, &update).await)?;
        warnings.absorb(clients.v3.poll_job(&job).await)?;
        Ok(())
    }
}
