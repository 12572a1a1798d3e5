// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` takes precedence over
/// `filter`; `verbose` raises the default to debug. Calling this twice is
/// harmless.
pub fn init(filter: &str, verbose: bool) {
    let fallback = if verbose {
        "finsync=debug".to_string()
    } else {
        filter.to_string()
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("finsync=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
