// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::api::{Resource, ResourceApi};
use crate::models::RecordId;

#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub id: RecordId,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkOutcome {
    pub succeeded: Vec<RecordId>,
    pub failed: Vec<ItemFailure>,
}

impl BulkOutcome {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Settle-all delete: one call per distinct id, in selection order. A failure is
/// recorded and the remaining ids are still attempted, so the outcome mirrors
/// what actually happened on the server.
pub fn bulk_delete(api: &dyn ResourceApi, resource: Resource, ids: &[RecordId]) -> BulkOutcome {
    let mut seen = HashSet::new();
    let mut out = BulkOutcome::default();
    for id in ids.iter().filter(|id| seen.insert(*id)) {
        match api.delete(resource, id) {
            Ok(()) => out.succeeded.push(id.clone()),
            Err(e) => {
                warn!(resource = resource.path(), %id, error = %e, "bulk delete item failed");
                out.failed.push(ItemFailure {
                    id: id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(
        resource = resource.path(),
        succeeded = out.succeeded.len(),
        failed = out.failed.len(),
        "bulk delete settled"
    );
    out
}
