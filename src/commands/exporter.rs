// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::fetch;
use crate::api::{ListParams, Resource, ResourceApi};
use crate::export::{ExportFormat, export_to_path};
use crate::models::{Account, Budget, Expense, Transaction};
use crate::utils::{arg, opt_arg};

pub fn handle(api: &dyn ResourceApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export::<Transaction>(api, Resource::Transactions, sub),
        Some(("expenses", sub)) => export::<Expense>(api, Resource::Expenses, sub),
        Some(("budgets", sub)) => export::<Budget>(api, Resource::Budgets, sub),
        Some(("accounts", sub)) => export::<Account>(api, Resource::Accounts, sub),
        _ => Ok(()),
    }
}

fn export<T>(api: &dyn ResourceApi, resource: Resource, sub: &clap::ArgMatches) -> Result<()>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let out = Path::new(arg(sub, "out")?);
    let format = match opt_arg(sub, "format") {
        Some(f) => ExportFormat::parse(f)?,
        None => ExportFormat::from_path(out),
    };
    let rows: Vec<T> = fetch(api, resource, ListParams::default());
    let n = export_to_path(&rows, format, out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    if n == 0 {
        println!("Nothing to export for {}", resource.path());
    } else {
        println!("Exported {} {} to {}", n, resource.path(), out.display());
    }
    Ok(())
}
