// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod transactions;
pub mod budgets;
pub mod reports;
pub mod exporter;
pub mod chat;
pub mod documents;
pub mod inventory;
pub mod doctor;

use chrono::Datelike;
use serde::de::DeserializeOwned;

use crate::api::{ListParams, Resource, ResourceApi};
use crate::collection::Collection;

/// Load a collection for display. A failed fetch prints a warning and yields no
/// rows, so the zero state can be told apart from an empty backend.
pub fn fetch<T: DeserializeOwned>(api: &dyn ResourceApi, resource: Resource, params: ListParams) -> Vec<T> {
    let c = Collection::<T>::load(api, resource, params);
    if let Some(e) = c.error() {
        eprintln!("warning: could not load {}: {}", resource.path(), e);
    }
    c.into_items()
}

pub(crate) fn year_or_current(m: &clap::ArgMatches) -> i32 {
    m.get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| chrono::Local::now().year())
}

pub(crate) fn json_flags(m: &clap::ArgMatches) -> (bool, bool) {
    (m.get_flag("json"), m.get_flag("jsonl"))
}
