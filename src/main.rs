// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use finsync::api::http::HttpApi;
use finsync::commands::{self, Session};
use finsync::{cli, config, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let base_url = matches.get_one::<String>("base-url").map(String::as_str);
    let cfg = config::Config::resolve(base_url)?;
    logging::init(&cfg.log_filter, matches.get_flag("verbose"));
    tracing::debug!(
        base_url = %cfg.base_url,
        routes = %cfg.transaction_routes,
        "configuration loaded"
    );
    let mut stdout = std::io::stdout();

    match matches.subcommand() {
        Some(("config", sub)) => {
            commands::config::handle(&cfg, &config::config_path()?, sub, &mut stdout)?;
        }
        Some(("shell", sub)) => {
            let view = finsync::utils::required::<String>(sub, "view")?.clone();
            let mut session = Session::new(HttpApi::new(&cfg)?, cfg);
            let stdin = std::io::stdin();
            commands::shell::run(&mut session, &view, stdin.lock(), stdout)?;
        }
        Some(_) => {
            let mut session = Session::new(HttpApi::new(&cfg)?, cfg);
            commands::dispatch(&mut session, &matches, &mut stdout)?;
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
