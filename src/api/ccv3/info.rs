//
//  cf-client
//  api/ccv3/info.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::{Client, GET_ROOT};
use crate::api::common::{Warned, Warnings};

crate::jsonry! {
    /// Endpoints advertised by the API root.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ApiInfo {
        #[jsonry = "links.cloud_controller_v2.href"]
        pub cloud_controller_v2_url: String,
        #[jsonry = "links.cloud_controller_v2.meta.version"]
        pub cloud_controller_v2_version: String,
        #[jsonry = "links.cloud_controller_v3.href"]
        pub cloud_controller_v3_url: String,
        #[jsonry = "links.cloud_controller_v3.meta.version"]
        pub cloud_controller_v3_version: String,
        /// Token endpoint used for refreshes.
        #[jsonry = "links.uaa.href"]
        pub uaa_url: String,
        #[jsonry = "links.login.href"]
        pub login_url: String,
    }
}

impl Client {
    /// Reads the root document.
    pub async fn get_info(&self) -> Warned<ApiInfo> {
        match self.router.request(GET_ROOT, &[]) {
            Ok(request) => self.make(request).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}
