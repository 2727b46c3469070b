// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! REST client for the ERP backend.
//!
//! [`ResourceApi`] covers the generic CRUD endpoints and [`ChatApi`] the messaging
//! ones. [`HttpApi`] implements both over `reqwest::blocking`; tests substitute
//! in-memory fakes.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::chat::{Contact, Conversation, Message, NewConversation, OutgoingMessage};
use crate::config::ApiSettings;
use crate::error::{ErpError, ErpResult};
use crate::models::RecordId;
use crate::utils::http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vendors,
    Customers,
    Accounts,
    Transactions,
    Budgets,
    TaxRecords,
    Expenses,
    AuditLogs,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Vendors => "vendors",
            Resource::Customers => "customers",
            Resource::Accounts => "accounts",
            Resource::Transactions => "transactions",
            Resource::Budgets => "budgets",
            Resource::TaxRecords => "tax-records",
            Resource::Expenses => "expenses",
            Resource::AuditLogs => "audit-logs",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Vendors => "vendor",
            Resource::Customers => "customer",
            Resource::Accounts => "account",
            Resource::Transactions => "transaction",
            Resource::Budgets => "budget",
            Resource::TaxRecords => "tax record",
            Resource::Expenses => "expense",
            Resource::AuditLogs => "audit entry",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    pub fn with_limit(limit: usize) -> Self {
        ListParams {
            limit: Some(limit),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, key: &str, value: impl ToString) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.filters.len() + 1);
        if let Some(l) = self.limit {
            out.push(("limit".to_string(), l.to_string()));
        }
        out.extend(self.filters.iter().cloned());
        out
    }
}

/// How the backend wraps collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// `{ "data": [...] }`
    #[default]
    Flat,
    /// `{ "data": { "data": [...] } }`
    Nested,
}

/// Pull the record array out of a list response. The shape must match exactly.
pub fn unwrap_collection(body: Value, shape: Envelope) -> ErpResult<Vec<Value>> {
    let outer = match body {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| ErpError::Envelope("missing top-level 'data'".into()))?,
        other => {
            return Err(ErpError::Envelope(format!(
                "expected an object, got {}",
                kind_of(&other)
            )));
        }
    };
    let inner = match shape {
        Envelope::Flat => outer,
        Envelope::Nested => match outer {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| ErpError::Envelope("missing nested 'data.data'".into()))?,
            other => {
                return Err(ErpError::Envelope(format!(
                    "expected 'data' to be an object, got {}",
                    kind_of(&other)
                )));
            }
        },
    };
    match inner {
        Value::Array(items) => Ok(items),
        other => Err(ErpError::Envelope(format!(
            "expected an array of records, got {}",
            kind_of(&other)
        ))),
    }
}

/// Single-record responses are `{ "data": {...} }` or the bare record.
pub fn unwrap_record(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub trait ResourceApi {
    fn list(&self, resource: Resource, params: &ListParams) -> ErpResult<Vec<Value>>;
    fn create(&self, resource: Resource, body: &Value) -> ErpResult<Value>;
    fn update(&self, resource: Resource, id: &RecordId, body: &Value) -> ErpResult<Value>;
    fn delete(&self, resource: Resource, id: &RecordId) -> ErpResult<()>;
}

/// List and decode in one go.
pub fn fetch_all<T: DeserializeOwned>(
    api: &dyn ResourceApi,
    resource: Resource,
    params: &ListParams,
) -> ErpResult<Vec<T>> {
    api.list(resource, params)?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(ErpError::from))
        .collect()
}

pub trait ChatApi {
    fn get_conversations(&self) -> ErpResult<Vec<Conversation>>;
    fn get_contacts(&self) -> ErpResult<Vec<Contact>>;
    fn get_messages(&self, conversation_id: &RecordId) -> ErpResult<Vec<Message>>;
    fn send_message(&self, conversation_id: &RecordId, msg: &OutgoingMessage) -> ErpResult<Message>;
    fn update_typing_indicator(&self, conversation_id: &RecordId, is_typing: bool) -> ErpResult<()>;
    fn create_conversation(&self, req: &NewConversation) -> ErpResult<Conversation>;
    fn join_channel(&self, channel_id: &RecordId) -> ErpResult<Conversation>;
    fn search_messages(&self, query: &str) -> ErpResult<Vec<Message>>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    envelope: Envelope,
    chat_envelope: Envelope,
    page_limit: usize,
}

impl HttpApi {
    pub fn new(settings: &ApiSettings) -> ErpResult<Self> {
        if settings.base_url.trim().is_empty() {
            return Err(ErpError::Config("api.base_url is empty".into()));
        }
        Ok(HttpApi {
            client: http_client(settings.timeout_secs)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone().filter(|t| !t.is_empty()),
            envelope: settings.envelope,
            chat_envelope: settings.chat_envelope,
            page_limit: settings.page_limit,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = self.url(path);
        let mut req = self.client.request(method, &url);
        if let Some(ref t) = self.token {
            req = req.bearer_auth(t);
        }
        (req, url)
    }

    fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> ErpResult<Value> {
        let (req, url) = self.request(method.clone(), path);
        debug!(%method, %url, "api request");
        let resp = build(req).send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(ErpError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body: text.chars().take(512).collect(),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn decode_record<T: DeserializeOwned>(body: Value) -> ErpResult<T> {
        Ok(serde_json::from_value(unwrap_record(body))?)
    }

    fn decode_list<T: DeserializeOwned>(&self, body: Value) -> ErpResult<Vec<T>> {
        unwrap_collection(body, self.chat_envelope)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(ErpError::from))
            .collect()
    }
}

impl ResourceApi for HttpApi {
    fn list(&self, resource: Resource, params: &ListParams) -> ErpResult<Vec<Value>> {
        let mut pairs = params.query_pairs();
        if params.limit.is_none() {
            pairs.insert(0, ("limit".to_string(), self.page_limit.to_string()));
        }
        let body = self.send(Method::GET, resource.path(), |r| r.query(&pairs))?;
        unwrap_collection(body, self.envelope)
    }

    fn create(&self, resource: Resource, body: &Value) -> ErpResult<Value> {
        let resp = self.send(Method::POST, resource.path(), |r| r.json(body))?;
        Ok(unwrap_record(resp))
    }

    fn update(&self, resource: Resource, id: &RecordId, body: &Value) -> ErpResult<Value> {
        let path = format!("{}/{}", resource.path(), id);
        let resp = self.send(Method::PUT, &path, |r| r.json(body))?;
        Ok(unwrap_record(resp))
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> ErpResult<()> {
        let path = format!("{}/{}", resource.path(), id);
        self.send(Method::DELETE, &path, |r| r)?;
        Ok(())
    }
}

impl ChatApi for HttpApi {
    fn get_conversations(&self) -> ErpResult<Vec<Conversation>> {
        let body = self.send(Method::GET, "chat/conversations", |r| r)?;
        self.decode_list(body)
    }

    fn get_contacts(&self) -> ErpResult<Vec<Contact>> {
        let body = self.send(Method::GET, "chat/contacts", |r| r)?;
        self.decode_list(body)
    }

    fn get_messages(&self, conversation_id: &RecordId) -> ErpResult<Vec<Message>> {
        let path = format!("chat/conversations/{}/messages", conversation_id);
        let body = self.send(Method::GET, &path, |r| r)?;
        self.decode_list(body)
    }

    fn send_message(&self, conversation_id: &RecordId, msg: &OutgoingMessage) -> ErpResult<Message> {
        let path = format!("chat/conversations/{}/messages", conversation_id);
        let body = self.send(Method::POST, &path, |r| r.json(msg))?;
        Self::decode_record(body)
    }

    fn update_typing_indicator(&self, conversation_id: &RecordId, is_typing: bool) -> ErpResult<()> {
        let path = format!("chat/conversations/{}/typing", conversation_id);
        self.send(Method::POST, &path, |r| r.json(&json!({ "isTyping": is_typing })))?;
        Ok(())
    }

    fn create_conversation(&self, req: &NewConversation) -> ErpResult<Conversation> {
        let body = self.send(Method::POST, "chat/conversations", |r| r.json(req))?;
        Self::decode_record(body)
    }

    fn join_channel(&self, channel_id: &RecordId) -> ErpResult<Conversation> {
        let path = format!("chat/channels/{}/join", channel_id);
        let body = self.send(Method::POST, &path, |r| r)?;
        Self::decode_record(body)
    }

    fn search_messages(&self, query: &str) -> ErpResult<Vec<Message>> {
        let body = self.send(Method::GET, "chat/messages/search", |r| r.query(&[("q", query)]))?;
        self.decode_list(body)
    }
}
