//
//  cf-client
//  actor/target.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use tracing::info;

use super::{Actor, ActorError};
use crate::api::ccv3::{self, ApiInfo};
use crate::api::common::{Warned, Warnings};
use crate::api::wrapper::TracingWrapper;
use crate::clients::{anonymous_wrappers, request_logger_output, Clients};

impl Actor {
    /// Points the actor at `url`.
    ///
    /// Reads the API root without credentials, then builds the session
    /// clients against it. On failure the previous target is kept.
    ///
    /// # Returns
    ///
    /// The root document and the warnings the server attached to it.
    pub async fn target_api(&mut self, url: &str, skip_ssl_validation: bool) -> Warned<ApiInfo, ActorError> {
        let mut config = self.config.clone();
        config.target = url.trim_end_matches('/').to_string();
        config.skip_ssl_validation = skip_ssl_validation;

        let trace = TracingWrapper::new();
        let output = request_logger_output(&config);
        let root = match ccv3::Client::new(
            &config,
            &config.target,
            anonymous_wrappers(&config, &trace, output.as_ref()),
        ) {
            Ok(client) => client,
            Err(err) => return Warned::err(err.into(), Warnings::new()),
        };

        let mut warnings = Warnings::new();
        let info = match warnings.absorb(root.get_info().await) {
            Ok(info) => info,
            Err(err) => return Warned::err(err.into(), warnings),
        };

        match Clients::new(&config, &info, self.store.clone()) {
            Ok(clients) => {
                info!("Targeted {}", config.target);
                self.config = config;
                self.clients = Some(clients);
                Warned::ok(info, warnings)
            }
            Err(err) => Warned::err(err.into(), warnings),
        }
    }
}
