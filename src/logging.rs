//
//  cf-client
//  logging.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Diagnostic logging.
//!
//! Internal diagnostics go through `tracing`. The filter is read from
//! `CF_LOG` (e.g. `CF_LOG=cf_client=debug`) and defaults to `warn`. This is
//! unrelated to the request log selected by `Config::trace`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CF_LOG";

/// Installs a global subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
