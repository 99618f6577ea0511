//
//  cf-client
//  actor/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Actor
//!
//! Operations composed from several API calls. Each one accumulates the
//! warnings of every call it makes, in call order, and returns them with
//! its result.
//!
//! ## Module Structure
//!
//! - [`target`]: Selecting an API endpoint
//! - [`service_access`]: Broker, service, plan and visibility summaries
//! - [`service_instance`]: Service instance upgrades

pub mod service_access;
pub mod service_instance;
pub mod target;

pub use service_access::*;

use std::sync::Arc;

use thiserror::Error;

use crate::api::common::CcError;
use crate::auth::TokenStore;
use crate::clients::Clients;
use crate::config::Config;

/// Errors from composed operations.
#[derive(Error, Debug)]
pub enum ActorError {
    #[error(transparent)]
    Cc(#[from] CcError),

    #[error("No API endpoint set. Target an API before running this operation.")]
    NoApiTargeted,

    #[error("Service broker {0} not found")]
    ServiceBrokerNotFound(String),

    #[error("Service instance {0} not found")]
    ServiceInstanceNotFound(String),

    #[error("No upgrade is available for service instance {0}")]
    ServiceInstanceUpgradeNotAvailable(String),
}

pub type Result<T> = std::result::Result<T, ActorError>;

/// Entry point for composed operations.
pub struct Actor {
    config: Config,
    store: Arc<dyn TokenStore>,
    clients: Option<Clients>,
}

impl Actor {
    /// Creates an actor with no API targeted yet.
    pub fn new(config: Config, store: Arc<dyn TokenStore>) -> Self {
        Self {
            config,
            store,
            clients: None,
        }
    }

    /// Creates an actor around clients that are already built.
    pub fn with_clients(config: Config, store: Arc<dyn TokenStore>, clients: Clients) -> Self {
        Self {
            config,
            store,
            clients: Some(clients),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn clients(&self) -> Result<&Clients> {
        self.clients.as_ref().ok_or(ActorError::NoApiTargeted)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::FakeServer;
    use crate::api::uaa::{self, UaaClient};
    use crate::api::{ccv2, ccv3, Router};
    use crate::auth::SessionTokens;
    use std::time::Duration;
    use url::Url;

    /// An actor whose v2, v3 and UAA clients all talk to `server`.
    pub(crate) fn actor(server: &Arc<FakeServer>) -> Actor {
        let base = Url::parse("https://api.example.com").unwrap();
        let v2 = ccv2::Client::with_connection(
            server.v2_chain(),
            Router::new(base.clone(), ccv2::routes()),
            Duration::ZERO,
            Duration::from_secs(5),
        );
        let v3 = ccv3::Client::with_connection(
            server.v3_chain(),
            Router::new(base, ccv3::routes()),
            Duration::ZERO,
            Duration::from_secs(5),
        );
        let uaa = UaaClient::with_connection(
            server.uaa_chain(),
            Router::new(Url::parse("https://uaa.example.com").unwrap(), uaa::routes()),
            "cf",
            "",
        );
        Actor::with_clients(
            Config::default(),
            Arc::new(SessionTokens::default()),
            Clients::from_parts(v2, v3, Arc::new(uaa)),
        )
    }

    #[tokio::test]
    async fn test_untargeted_actor_refuses_operations() {
        let actor = Actor::new(Config::default(), Arc::new(SessionTokens::default()));
        let outcome = actor.get_service_broker_summaries("").await;
        assert!(matches!(outcome.result, Err(ActorError::NoApiTargeted)));
        assert!(outcome.warnings.is_empty());
    }
}
