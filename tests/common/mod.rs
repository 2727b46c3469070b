// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use guardian_erp::api::{ChatApi, ListParams, Resource, ResourceApi};
use guardian_erp::chat::{Contact, Conversation, Message, NewConversation, OutgoingMessage};
use guardian_erp::error::{ErpError, ErpResult};
use guardian_erp::models::RecordId;
use serde_json::{Value, json};

pub fn server_error(url: &str) -> ErpError {
    ErpError::Status {
        method: "GET".into(),
        url: url.into(),
        status: 500,
        body: "boom".into(),
    }
}

/// In-memory backend. Records every call so tests can count them.
#[derive(Default)]
pub struct FakeApi {
    pub data: RefCell<HashMap<Resource, Vec<Value>>>,
    pub fail_list: Cell<bool>,
    pub fail_delete: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
    pub last_params: RefCell<Option<ListParams>>,

    pub conversations: Vec<Conversation>,
    pub contacts: Vec<Value>,
    pub messages: HashMap<RecordId, Vec<Message>>,
    pub fail_send: bool,
    pub typing: RefCell<Vec<(RecordId, bool)>>,
    pub next_id: Cell<u64>,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi::default()
    }

    pub fn with(self, resource: Resource, rows: Vec<Value>) -> Self {
        self.data.borrow_mut().insert(resource, rows);
        self
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("DELETE"))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl ResourceApi for FakeApi {
    fn list(&self, resource: Resource, params: &ListParams) -> ErpResult<Vec<Value>> {
        self.record(format!("GET {}", resource.path()));
        *self.last_params.borrow_mut() = Some(params.clone());
        if self.fail_list.get() {
            return Err(server_error(resource.path()));
        }
        Ok(self.data.borrow().get(&resource).cloned().unwrap_or_default())
    }

    fn create(&self, resource: Resource, body: &Value) -> ErpResult<Value> {
        self.record(format!("POST {}", resource.path()));
        let n = self.next_id.get() + 100;
        self.next_id.set(n);
        let mut created = body.clone();
        created["id"] = json!(n);
        self.data
            .borrow_mut()
            .entry(resource)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    fn update(&self, resource: Resource, id: &RecordId, body: &Value) -> ErpResult<Value> {
        self.record(format!("PUT {}/{}", resource.path(), id));
        Ok(body.clone())
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> ErpResult<()> {
        self.record(format!("DELETE {}/{}", resource.path(), id));
        if self.fail_delete.contains(&id.0) {
            return Err(ErpError::not_found(resource.singular(), &id.0));
        }
        if let Some(rows) = self.data.borrow_mut().get_mut(&resource) {
            rows.retain(|r| {
                let rid: Option<RecordId> = serde_json::from_value(r["id"].clone()).ok();
                rid.as_ref() != Some(id)
            });
        }
        Ok(())
    }
}

impl ChatApi for FakeApi {
    fn get_conversations(&self) -> ErpResult<Vec<Conversation>> {
        Ok(self.conversations.clone())
    }

    fn get_contacts(&self) -> ErpResult<Vec<Contact>> {
        self.contacts
            .iter()
            .map(|v| serde_json::from_value(v.clone()).map_err(ErpError::from))
            .collect()
    }

    fn get_messages(&self, conversation_id: &RecordId) -> ErpResult<Vec<Message>> {
        Ok(self.messages.get(conversation_id).cloned().unwrap_or_default())
    }

    fn send_message(&self, conversation_id: &RecordId, msg: &OutgoingMessage) -> ErpResult<Message> {
        if self.fail_send {
            return Err(server_error("chat/messages"));
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        Ok(Message {
            id: RecordId::from(format!("srv-{}", n).as_str()),
            conversation_id: conversation_id.clone(),
            sender_id: RecordId::from("me"),
            sender_name: Some("Me".into()),
            content: msg.content.clone(),
            r#type: msg.r#type,
            file: msg.file.clone(),
            reactions: Vec::new(),
            created_at: None,
        })
    }

    fn update_typing_indicator(&self, conversation_id: &RecordId, is_typing: bool) -> ErpResult<()> {
        self.typing.borrow_mut().push((conversation_id.clone(), is_typing));
        Ok(())
    }

    fn create_conversation(&self, req: &NewConversation) -> ErpResult<Conversation> {
        Ok(Conversation {
            id: RecordId::from("new-1"),
            r#type: req.r#type,
            name: req.name.clone(),
            members: req.members.clone(),
            last_message: None,
            unread_count: 0,
        })
    }

    fn join_channel(&self, channel_id: &RecordId) -> ErpResult<Conversation> {
        self.conversations
            .iter()
            .find(|c| &c.id == channel_id)
            .cloned()
            .ok_or_else(|| ErpError::not_found("channel", &channel_id.0))
    }

    fn search_messages(&self, query: &str) -> ErpResult<Vec<Message>> {
        Ok(self
            .messages
            .values()
            .flatten()
            .filter(|m| m.content.contains(query))
            .cloned()
            .collect())
    }
}
