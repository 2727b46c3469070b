// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fetched collections with loading/error state.
//!
//! A [`Collection`] owns the last successful list of one resource. Mutations go to
//! the API and are followed by a full refetch; local state is never patched.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};

use crate::api::{ListParams, Resource, ResourceApi, fetch_all};
use crate::bulk::{self, BulkOutcome};
use crate::error::ErpResult;
use crate::models::RecordId;

/// Owner side of a cancellation flag. Dropping it cancels every handle.
#[derive(Debug, Default)]
pub struct Scope {
    cancelled: Arc<AtomicBool>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeHandle {
    cancelled: Arc<AtomicBool>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl ScopeHandle {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Collection<T> {
    resource: Resource,
    params: ListParams,
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    scope: ScopeHandle,
}

impl<T: DeserializeOwned> Collection<T> {
    pub fn new(resource: Resource, params: ListParams, scope: ScopeHandle) -> Self {
        Collection {
            resource,
            params,
            items: Vec::new(),
            loading: false,
            error: None,
            scope,
        }
    }

    /// Create and fetch immediately, with a scope that is never cancelled.
    pub fn load(api: &dyn ResourceApi, resource: Resource, params: ListParams) -> Self {
        let mut c = Collection::new(resource, params, ScopeHandle::default());
        c.refetch(api);
        c
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Fetch the full list again. Returns false when the result was discarded
    /// because the owning scope was cancelled in the meantime.
    pub fn refetch(&mut self, api: &dyn ResourceApi) -> bool {
        if self.scope.is_cancelled() {
            debug!(resource = self.resource.path(), "scope cancelled, skipping fetch");
            return false;
        }
        self.loading = true;
        let result = fetch_all::<T>(api, self.resource, &self.params);
        if self.scope.is_cancelled() {
            debug!(resource = self.resource.path(), "scope cancelled, dropping response");
            self.loading = false;
            return false;
        }
        match result {
            Ok(items) => {
                debug!(resource = self.resource.path(), count = items.len(), "fetched");
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                warn!(resource = self.resource.path(), error = %e, "fetch failed");
                self.items.clear();
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub fn create(&mut self, api: &dyn ResourceApi, body: &Value) -> ErpResult<Value> {
        let created = api.create(self.resource, body).inspect_err(|e| {
            error!(resource = self.resource.path(), error = %e, "create failed");
        })?;
        self.refetch(api);
        Ok(created)
    }

    pub fn update(&mut self, api: &dyn ResourceApi, id: &RecordId, body: &Value) -> ErpResult<Value> {
        let updated = api.update(self.resource, id, body).inspect_err(|e| {
            error!(resource = self.resource.path(), %id, error = %e, "update failed");
        })?;
        self.refetch(api);
        Ok(updated)
    }

    pub fn delete(&mut self, api: &dyn ResourceApi, id: &RecordId) -> ErpResult<()> {
        api.delete(self.resource, id).inspect_err(|e| {
            error!(resource = self.resource.path(), %id, error = %e, "delete failed");
        })?;
        self.refetch(api);
        Ok(())
    }

    /// Delete every id, then refetch once regardless of individual failures.
    pub fn bulk_delete(&mut self, api: &dyn ResourceApi, ids: &[RecordId]) -> BulkOutcome {
        let outcome = bulk::bulk_delete(api, self.resource, ids);
        self.refetch(api);
        outcome
    }
}
