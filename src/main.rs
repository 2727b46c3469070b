// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use guardian_erp::api::HttpApi;
use guardian_erp::config::{Settings, default_config_path};
use guardian_erp::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config_path = matches.get_one::<PathBuf>("config").cloned();
    if matches.subcommand_name() == Some("init") {
        let path = match config_path {
            Some(ref p) => p.clone(),
            None => default_config_path()?,
        };
        if Settings::write_default(&path)? {
            println!("Wrote default configuration to {}", path.display());
        } else {
            println!("Configuration already present at {}", path.display());
        }
    }
    let settings = Settings::load(config_path.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&settings.logging, matches.get_flag("verbose"));

    let api = || HttpApi::new(&settings.api).context("Failed to build API client");
    let open_db = || -> Result<rusqlite::Connection> {
        let path = settings.database_path()?;
        db::open_or_init(&path).with_context(|| format!("Failed to open {}", path.display()))
    };

    match matches.subcommand() {
        Some(("init", _)) => {
            open_db()?;
            println!("Database initialized at {}", settings.database_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&api()?, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&api()?, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&api()?, sub)?,
        Some(("report", sub)) => commands::reports::handle(&api()?, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&api()?, sub)?,
        Some(("chat", sub)) => commands::chat::handle(&api()?, sub)?,
        Some(("bill", sub)) => commands::documents::handle_bills(&open_db()?, sub)?,
        Some(("invoice", sub)) => commands::documents::handle_invoices(&open_db()?, sub)?,
        Some(("inventory", sub)) => commands::inventory::handle(&mut open_db()?, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&api()?, &open_db()?)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
