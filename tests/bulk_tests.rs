// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::FakeApi;
use guardian_erp::api::{ListParams, Resource};
use guardian_erp::bulk::bulk_delete;
use guardian_erp::collection::Collection;
use guardian_erp::models::{RecordId, Transaction};
use serde_json::json;

fn ids(raw: &[&str]) -> Vec<RecordId> {
    raw.iter().map(|s| RecordId::from(*s)).collect()
}

fn seeded() -> FakeApi {
    FakeApi::new().with(
        Resource::Transactions,
        (1..=4)
            .map(|i| json!({"id": i, "type": "income", "amount": "10.00", "status": "completed"}))
            .collect(),
    )
}

#[test]
fn issues_one_delete_per_selected_id() {
    let api = seeded();
    let out = bulk_delete(&api, Resource::Transactions, &ids(&["1", "2", "3"]));
    assert_eq!(api.delete_calls(), ["DELETE transactions/1", "DELETE transactions/2", "DELETE transactions/3"]);
    assert_eq!(out.succeeded.len(), 3);
    assert!(out.is_complete());
}

#[test]
fn one_failure_does_not_stop_the_rest() {
    let mut api = seeded();
    api.fail_delete.insert("2".into());
    let out = bulk_delete(&api, Resource::Transactions, &ids(&["1", "2", "3"]));

    assert_eq!(api.delete_calls().len(), 3);
    assert_eq!(out.attempted(), 3);
    assert!(!out.is_complete());
    assert_eq!(out.succeeded, ids(&["1", "3"]));
    assert_eq!(out.failed.len(), 1);
    assert_eq!(out.failed[0].id, RecordId::from("2"));
    assert!(out.failed[0].error.contains("not found"));

    let left = api.data.borrow()[&Resource::Transactions].len();
    assert_eq!(left, 2);
}

#[test]
fn duplicate_ids_are_deleted_once() {
    let api = seeded();
    let out = bulk_delete(&api, Resource::Transactions, &ids(&["4", "4", "1", "4"]));
    assert_eq!(api.delete_calls(), ["DELETE transactions/4", "DELETE transactions/1"]);
    assert_eq!(out.attempted(), 2);
}

#[test]
fn empty_selection_makes_no_calls() {
    let api = seeded();
    let out = bulk_delete(&api, Resource::Transactions, &[]);
    assert!(api.calls.borrow().is_empty());
    assert_eq!(out.attempted(), 0);
    assert!(out.is_complete());
}

#[test]
fn collection_refetches_once_after_bulk_delete() {
    let mut api = seeded();
    api.fail_delete.insert("3".into());
    let mut txs: Collection<Transaction> = Collection::load(&api, Resource::Transactions, ListParams::default());
    assert_eq!(txs.items().len(), 4);

    let out = txs.bulk_delete(&api, &ids(&["1", "3"]));
    assert_eq!(out.failed.len(), 1);

    let gets = api.calls.borrow().iter().filter(|c| c.starts_with("GET")).count();
    assert_eq!(gets, 2);
    let remaining: Vec<&str> = txs.items().iter().map(|t| t.id.0.as_str()).collect();
    assert_eq!(remaining, ["2", "3", "4"]);
}
