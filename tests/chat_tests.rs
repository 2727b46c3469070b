// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use common::FakeApi;
use guardian_erp::chat::notifications::{NotificationCenter, NotificationKind, Priority};
use guardian_erp::chat::typing::{TYPING_DEBOUNCE, TypingEvent, TypingIndicator};
use guardian_erp::chat::{Attachment, ChatStore, Conversation, ConversationType, Message, MessageType, Presence};
use guardian_erp::cli;
use guardian_erp::commands::chat as chat_cmd;
use serde_json::json;
use guardian_erp::error::ErpError;
use guardian_erp::models::RecordId;

fn rid(s: &str) -> RecordId {
    RecordId::from(s)
}

fn conv(id: &str) -> Conversation {
    Conversation {
        id: rid(id),
        r#type: ConversationType::Group,
        name: Some(format!("Team {}", id)),
        members: vec![rid("me"), rid("u2")],
        last_message: None,
        unread_count: 0,
    }
}

fn incoming(id: &str, conversation: &str, content: &str) -> Message {
    Message {
        id: rid(id),
        conversation_id: rid(conversation),
        sender_id: rid("u2"),
        sender_name: Some("Alice".into()),
        content: content.into(),
        r#type: MessageType::Text,
        file: None,
        reactions: Vec::new(),
        created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
    }
}

fn api_with(convs: &[&str]) -> FakeApi {
    FakeApi {
        conversations: convs.iter().map(|c| conv(c)).collect(),
        ..FakeApi::default()
    }
}

#[test]
fn typing_stops_exactly_at_the_debounce() {
    let mut t = TypingIndicator::default();
    let t0 = Instant::now();
    assert_eq!(t.keystroke(Some(&rid("c1")), t0), vec![TypingEvent::Started(rid("c1"))]);
    assert_eq!(t.poll(t0 + Duration::from_millis(999)), None);
    assert!(t.is_typing());
    assert_eq!(t.poll(t0 + TYPING_DEBOUNCE), Some(TypingEvent::Stopped(rid("c1"))));
    assert!(!t.is_typing());
    assert_eq!(t.poll(t0 + Duration::from_secs(5)), None);
}

#[test]
fn each_keystroke_pushes_the_deadline_out() {
    let mut t = TypingIndicator::default();
    let t0 = Instant::now();
    t.keystroke(Some(&rid("c1")), t0);
    let again = t.keystroke(Some(&rid("c1")), t0 + Duration::from_millis(600));
    assert!(again.is_empty());
    assert_eq!(t.poll(t0 + Duration::from_millis(1500)), None);
    assert_eq!(t.remaining(t0 + Duration::from_millis(1500)), Some(Duration::from_millis(100)));
    assert_eq!(t.poll(t0 + Duration::from_millis(1600)), Some(TypingEvent::Stopped(rid("c1"))));
}

#[test]
fn no_conversation_means_no_indicator() {
    let mut t = TypingIndicator::default();
    assert!(t.keystroke(None, Instant::now()).is_empty());
    assert!(!t.is_typing());
    assert_eq!(t.reset(), None);
}

#[test]
fn switching_conversations_stops_the_old_one() {
    let mut t = TypingIndicator::default();
    let t0 = Instant::now();
    t.keystroke(Some(&rid("c1")), t0);
    let evs = t.keystroke(Some(&rid("c2")), t0 + Duration::from_millis(10));
    assert_eq!(evs, vec![TypingEvent::Stopped(rid("c1")), TypingEvent::Started(rid("c2"))]);
}

#[test]
fn send_appends_the_server_copy_and_updates_last_message() {
    let api = api_with(&["c1"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    store.open_conversation(&api, &rid("c1")).unwrap();

    let sent = store.send_message(&api, &rid("c1"), "  on my way  ", None, None).unwrap();
    assert_eq!(sent.id, rid("srv-1"));
    assert_eq!(sent.content, "on my way");
    assert_eq!(store.messages(&rid("c1")).len(), 1);
    let last = store.conversation(&rid("c1")).unwrap().last_message.as_ref().unwrap();
    assert_eq!(last.id, rid("srv-1"));
}

#[test]
fn failed_send_appends_nothing() {
    let api = FakeApi {
        fail_send: true,
        ..api_with(&["c1"])
    };
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    assert!(store.send_message(&api, &rid("c1"), "hello", None, None).is_err());
    assert!(store.messages(&rid("c1")).is_empty());
    assert!(store.conversation(&rid("c1")).unwrap().last_message.is_none());
}

#[test]
fn empty_message_without_file_is_rejected() {
    let api = api_with(&["c1"]);
    let mut store = ChatStore::new();
    let err = store.send_message(&api, &rid("c1"), "   ", None, None).unwrap_err();
    assert!(matches!(err, ErpError::Validation { .. }));
    assert_eq!(api.next_id.get(), 0);
}

#[test]
fn file_messages_default_to_file_type() {
    let api = api_with(&["c1"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    let file = Attachment {
        name: "roster.pdf".into(),
        url: "https://files.example/roster.pdf".into(),
        size: None,
        mime_type: None,
    };
    let sent = store.send_message(&api, &rid("c1"), "", None, Some(file)).unwrap();
    assert_eq!(sent.r#type, MessageType::File);
    assert_eq!(sent.file.unwrap().name, "roster.pdf");
}

#[test]
fn incoming_message_bumps_unread_unless_conversation_is_open() {
    let api = api_with(&["c1", "c2"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    store.open_conversation(&api, &rid("c1")).unwrap();

    assert!(store.receive_message(incoming("m1", "c1", "seen")));
    assert!(store.receive_message(incoming("m2", "c2", "patrol report")));
    assert!(store.receive_message(incoming("m3", "c2", "gate 4 clear")));

    assert_eq!(store.conversation(&rid("c1")).unwrap().unread_count, 0);
    assert_eq!(store.conversation(&rid("c2")).unwrap().unread_count, 2);
    assert_eq!(store.total_unread(), 2);

    let n = store.notifications();
    assert_eq!(n.len(), 2);
    let newest = n.iter().next().unwrap();
    assert_eq!(newest.title, "New message from Alice");
    assert_eq!(newest.body, "gate 4 clear");

    store.open_conversation(&api, &rid("c2")).unwrap();
    assert_eq!(store.total_unread(), 0);
}

#[test]
fn message_for_unknown_conversation_is_ignored() {
    let mut store = ChatStore::new();
    assert!(!store.receive_message(incoming("m1", "nope", "hi")));
    assert!(store.messages(&rid("nope")).is_empty());
}

#[test]
fn duplicate_incoming_message_is_stored_once() {
    let api = api_with(&["c1"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    assert!(store.receive_message(incoming("m1", "c1", "hi")));
    assert!(!store.receive_message(incoming("m1", "c1", "hi")));
    assert_eq!(store.messages(&rid("c1")).len(), 1);
    assert_eq!(store.total_unread(), 1);
    assert_eq!(store.notifications().len(), 1);
}

#[test]
fn store_keystrokes_drive_the_remote_indicator() {
    let api = api_with(&["c1", "c2"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();

    let t0 = Instant::now();
    store.keystroke(&api, t0);
    assert!(api.typing.borrow().is_empty());

    store.open_conversation(&api, &rid("c1")).unwrap();
    store.keystroke(&api, t0);
    store.keystroke(&api, t0 + Duration::from_millis(300));
    store.tick(&api, t0 + Duration::from_millis(900));
    assert_eq!(*api.typing.borrow(), vec![(rid("c1"), true)]);

    store.tick(&api, t0 + Duration::from_millis(1300));
    assert_eq!(*api.typing.borrow(), vec![(rid("c1"), true), (rid("c1"), false)]);
    assert!(!store.is_typing());
}

#[test]
fn opening_another_conversation_clears_typing() {
    let api = api_with(&["c1", "c2"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    store.open_conversation(&api, &rid("c1")).unwrap();
    store.keystroke(&api, Instant::now());
    store.open_conversation(&api, &rid("c2")).unwrap();
    assert_eq!(*api.typing.borrow(), vec![(rid("c1"), true), (rid("c1"), false)]);
}

#[test]
fn remote_typing_clears_when_the_member_posts() {
    let api = api_with(&["c1"]);
    let mut store = ChatStore::new();
    store.load_conversations(&api).unwrap();
    store.set_remote_typing(&rid("c1"), &rid("u2"), true);
    assert_eq!(store.typing_users(&rid("c1")), vec![&rid("u2")]);
    store.receive_message(incoming("m1", "c1", "done"));
    assert!(store.typing_users(&rid("c1")).is_empty());
}

#[test]
fn join_and_search_go_through_the_api() {
    let mut api = api_with(&["ops"]);
    api.messages.insert(rid("ops"), vec![incoming("m1", "ops", "night shift roster"), incoming("m2", "ops", "ok")]);
    let mut store = ChatStore::new();
    let ch = store.join_channel(&api, &rid("ops")).unwrap();
    assert_eq!(ch.title(), "Team ops");
    assert_eq!(store.conversations().len(), 1);
    assert!(store.join_channel(&api, &rid("missing")).is_err());

    let hits = store.search_messages(&api, "roster").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, rid("m1"));
}

fn api_with_contacts() -> FakeApi {
    FakeApi {
        contacts: vec![
            json!({"id": 7, "name": "zawadi", "role": "Supervisor", "presence": "offline"}),
            json!({"id": 3, "name": "Bosco", "presence": "away"}),
            json!({"id": 4, "name": "amani", "presence": "online"}),
            json!({"id": 5, "name": "Claire", "presence": null}),
            json!({"id": 6, "name": "Eric", "presence": "on-leave"}),
        ],
        ..FakeApi::default()
    }
}

#[test]
fn contacts_load_online_first_and_tolerate_odd_presence() {
    let api = api_with_contacts();
    let mut store = ChatStore::new();
    let names: Vec<&str> = store
        .load_contacts(&api)
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["amani", "Bosco", "Claire", "Eric", "zawadi"]);
    assert_eq!(store.contacts()[0].presence, Presence::Online);
    assert_eq!(store.contacts()[2].presence, Presence::Offline);
    assert_eq!(store.contacts()[4].role.as_deref(), Some("Supervisor"));
}

#[test]
fn contacts_command_lists_through_the_api() {
    let api = api_with_contacts();
    for args in [&["chat", "contacts"][..], &["chat", "contacts", "--online", "--json"]] {
        let mut full = vec!["guardian"];
        full.extend_from_slice(args);
        let m = cli::build_cli().get_matches_from(full);
        let (_, sub) = m.subcommand().unwrap();
        chat_cmd::handle(&api, sub).unwrap();
    }
}

#[test]
fn notification_center_ids_and_read_state() {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut n = NotificationCenter::new();
    let a = n.push(NotificationKind::Info, Priority::Low, "a", "", at);
    let b = n.push(NotificationKind::Warning, Priority::High, "b", "", at);
    let c = n.push(NotificationKind::Info, Priority::Medium, "c", "", at);
    assert_eq!((a, b, c), (1, 2, 3));
    assert_eq!(n.iter().next().unwrap().title, "c");
    assert_eq!(n.unread_count(), 3);

    assert!(n.mark_read(b));
    assert!(!n.mark_read(b));
    assert_eq!(n.unread_count(), 2);
    assert_eq!(n.by_kind(NotificationKind::Info).len(), 2);

    assert!(n.dismiss(a));
    assert!(!n.dismiss(a));
    assert_eq!(n.mark_all_read(), 1);
    assert_eq!(n.unread_count(), 0);

    let d = n.push(NotificationKind::Error, Priority::Urgent, "d", "", at);
    assert_eq!(d, 4);
}
