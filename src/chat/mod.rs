// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Internal messaging state.
//!
//! [`ChatStore`] keeps conversations, per-conversation messages, unread counts and
//! typing state on the client. Sends wait for the server's copy of the message
//! before appending it.

pub mod notifications;
pub mod typing;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::api::ChatApi;
use crate::error::{ErpError, ErpResult};
use crate::models::RecordId;
use crate::status::Tone;
use notifications::{NotificationCenter, NotificationKind, Priority};
use typing::{TypingEvent, TypingIndicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    Direct,
    Group,
    Channel,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    File,
    Image,
    System,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    #[serde(default)]
    pub users: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: RecordId,
    pub conversation_id: RecordId,
    pub sender_id: RecordId,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub r#type: MessageType,
    #[serde(default)]
    pub file: Option<Attachment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: RecordId,
    pub r#type: ConversationType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<RecordId>,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u32,
}

/// Channels are conversations of type `channel`.
pub type Channel = Conversation;

impl Conversation {
    pub fn title(&self) -> String {
        match self.name {
            Some(ref n) if !n.trim().is_empty() => n.clone(),
            _ => format!("{:?} {}", self.r#type, self.id).to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    Busy,
    Offline,
}

impl Presence {
    pub fn tone(self) -> Tone {
        match self {
            Presence::Online => Tone::Green,
            Presence::Away => Tone::Orange,
            Presence::Busy => Tone::Red,
            Presence::Offline => Tone::Gray,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "offline", deserialize_with = "de_presence")]
    pub presence: Presence,
}

fn offline() -> Presence {
    Presence::Offline
}

/// Unknown or null presence values read as offline.
fn de_presence<'de, D: Deserializer<'de>>(d: D) -> Result<Presence, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(match raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("online") => Presence::Online,
        Some("away") => Presence::Away,
        Some("busy") => Presence::Busy,
        _ => Presence::Offline,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub content: String,
    pub r#type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    pub r#type: ConversationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub members: Vec<RecordId>,
}

#[derive(Debug, Default)]
pub struct ChatStore {
    conversations: Vec<Conversation>,
    contacts: Vec<Contact>,
    messages: HashMap<RecordId, Vec<Message>>,
    active: Option<RecordId>,
    typing: TypingIndicator,
    remote_typing: HashMap<RecordId, BTreeSet<RecordId>>,
    notifications: NotificationCenter,
}

impl ChatStore {
    pub fn new() -> Self {
        ChatStore::default()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn conversation(&self, id: &RecordId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    pub fn messages(&self, id: &RecordId) -> &[Message] {
        self.messages.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active(&self) -> Option<&RecordId> {
        self.active.as_ref()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_typing()
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    pub fn load_conversations(&mut self, api: &dyn ChatApi) -> ErpResult<()> {
        let convs = api.get_conversations().inspect_err(|e| {
            error!(error = %e, "failed to load conversations");
        })?;
        debug!(count = convs.len(), "conversations loaded");
        self.conversations = convs;
        Ok(())
    }

    /// Contacts ordered online first, then by name.
    pub fn load_contacts(&mut self, api: &dyn ChatApi) -> ErpResult<&[Contact]> {
        let mut contacts = api.get_contacts().inspect_err(|e| {
            error!(error = %e, "failed to load contacts");
        })?;
        contacts.sort_by(|a, b| {
            a.presence
                .cmp(&b.presence)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        debug!(count = contacts.len(), "contacts loaded");
        self.contacts = contacts;
        Ok(&self.contacts)
    }

    /// Select a conversation, fetch its history and clear its unread count.
    pub fn open_conversation(&mut self, api: &dyn ChatApi, id: &RecordId) -> ErpResult<&[Message]> {
        let msgs = api.get_messages(id).inspect_err(|e| {
            error!(conversation = %id, error = %e, "failed to load messages");
        })?;
        if self.active.as_ref() != Some(id) {
            if let Some(TypingEvent::Stopped(prev)) = self.typing.reset() {
                self.notify_typing(api, &prev, false);
            }
        }
        self.active = Some(id.clone());
        if let Some(c) = self.conversations.iter_mut().find(|c| &c.id == id) {
            c.unread_count = 0;
        }
        self.messages.insert(id.clone(), msgs);
        Ok(self.messages(id))
    }

    /// Send and append the server's copy. Nothing is appended on failure.
    pub fn send_message(
        &mut self,
        api: &dyn ChatApi,
        conversation_id: &RecordId,
        content: &str,
        kind: Option<MessageType>,
        file: Option<Attachment>,
    ) -> ErpResult<Message> {
        if content.trim().is_empty() && file.is_none() {
            return Err(ErpError::validation("message", "content is empty"));
        }
        let out = OutgoingMessage {
            content: content.trim().to_string(),
            r#type: kind.unwrap_or(if file.is_some() {
                MessageType::File
            } else {
                MessageType::Text
            }),
            file,
        };
        let msg = api.send_message(conversation_id, &out).inspect_err(|e| {
            error!(conversation = %conversation_id, error = %e, "failed to send message");
        })?;
        self.append(msg.clone());
        Ok(msg)
    }

    /// Incoming message from another member. Bumps the unread count (and raises a
    /// notification) unless its conversation is the active one. Returns false for
    /// conversations the store does not know and for messages already held.
    pub fn receive_message(&mut self, msg: Message) -> bool {
        let conv_id = msg.conversation_id.clone();
        let is_active = self.active.as_ref() == Some(&conv_id);
        if self.messages.get(&conv_id).is_some_and(|list| list.iter().any(|m| m.id == msg.id)) {
            debug!(conversation = %conv_id, message = %msg.id, "duplicate message ignored");
            return false;
        }
        let Some(conv) = self.conversations.iter_mut().find(|c| c.id == conv_id) else {
            warn!(conversation = %conv_id, "message for unknown conversation");
            return false;
        };
        if !is_active {
            conv.unread_count += 1;
            let title = format!(
                "New message from {}",
                msg.sender_name.clone().unwrap_or_else(|| msg.sender_id.to_string())
            );
            let body = msg.content.clone();
            self.notifications.push(
                NotificationKind::Message,
                Priority::Medium,
                title,
                body,
                msg.created_at.unwrap_or_else(Utc::now),
            );
        }
        if let Some(set) = self.remote_typing.get_mut(&conv_id) {
            set.remove(&msg.sender_id);
        }
        self.append(msg);
        true
    }

    fn append(&mut self, msg: Message) {
        if let Some(c) = self.conversations.iter_mut().find(|c| c.id == msg.conversation_id) {
            c.last_message = Some(msg.clone());
        }
        let list = self.messages.entry(msg.conversation_id.clone()).or_default();
        if !list.iter().any(|m| m.id == msg.id) {
            list.push(msg);
        }
    }

    pub fn create_conversation(&mut self, api: &dyn ChatApi, req: &NewConversation) -> ErpResult<Conversation> {
        let conv = api.create_conversation(req).inspect_err(|e| {
            error!(error = %e, "failed to create conversation");
        })?;
        self.upsert(conv.clone());
        Ok(conv)
    }

    pub fn join_channel(&mut self, api: &dyn ChatApi, channel_id: &RecordId) -> ErpResult<Channel> {
        let conv = api.join_channel(channel_id).inspect_err(|e| {
            error!(channel = %channel_id, error = %e, "failed to join channel");
        })?;
        self.upsert(conv.clone());
        Ok(conv)
    }

    pub fn search_messages(&self, api: &dyn ChatApi, query: &str) -> ErpResult<Vec<Message>> {
        api.search_messages(query).inspect_err(|e| {
            error!(error = %e, "message search failed");
        })
    }

    pub fn send_typing_indicator(&self, api: &dyn ChatApi, conversation_id: &RecordId, is_typing: bool) -> ErpResult<()> {
        api.update_typing_indicator(conversation_id, is_typing)
    }

    fn upsert(&mut self, conv: Conversation) {
        match self.conversations.iter_mut().find(|c| c.id == conv.id) {
            Some(existing) => *existing = conv,
            None => self.conversations.insert(0, conv),
        }
    }

    fn notify_typing(&self, api: &dyn ChatApi, conversation_id: &RecordId, is_typing: bool) {
        if let Err(e) = self.send_typing_indicator(api, conversation_id, is_typing) {
            error!(conversation = %conversation_id, error = %e, "typing indicator update failed");
        }
    }

    /// Keystroke in the composer of the active conversation.
    pub fn keystroke(&mut self, api: &dyn ChatApi, now: Instant) {
        let events = self.typing.keystroke(self.active.as_ref(), now);
        for ev in events {
            match ev {
                TypingEvent::Started(c) => self.notify_typing(api, &c, true),
                TypingEvent::Stopped(c) => self.notify_typing(api, &c, false),
            }
        }
    }

    /// Drive the debounce; call periodically.
    pub fn tick(&mut self, api: &dyn ChatApi, now: Instant) {
        if let Some(TypingEvent::Stopped(c)) = self.typing.poll(now) {
            self.notify_typing(api, &c, false);
        }
    }

    /// Typing events pushed by the server for other members.
    pub fn set_remote_typing(&mut self, conversation_id: &RecordId, user: &RecordId, is_typing: bool) {
        let set = self.remote_typing.entry(conversation_id.clone()).or_default();
        if is_typing {
            set.insert(user.clone());
        } else {
            set.remove(user);
        }
    }

    pub fn typing_users(&self, conversation_id: &RecordId) -> Vec<&RecordId> {
        self.remote_typing
            .get(conversation_id)
            .map(|s| s.iter().collect())
            .unwrap_or_default()
    }
}
