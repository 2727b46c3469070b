// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color};

use super::json_flags;
use crate::api::ChatApi;
use crate::chat::{Attachment, ChatStore, Contact, ConversationType, Message, NewConversation, Presence};
use crate::models::RecordId;
use crate::utils::{arg, maybe_print_json, opt_arg, pretty_table};

pub fn handle(api: &dyn ChatApi, m: &clap::ArgMatches) -> Result<()> {
    let mut store = ChatStore::new();
    match m.subcommand() {
        Some(("conversations", sub)) => conversations(api, &mut store, sub)?,
        Some(("contacts", sub)) => contacts(api, &mut store, sub)?,
        Some(("open", sub)) => open(api, &mut store, sub)?,
        Some(("send", sub)) => send(api, &mut store, sub)?,
        Some(("search", sub)) => search(api, &store, sub)?,
        Some(("join", sub)) => {
            let id = RecordId::from(arg(sub, "channel")?);
            let ch = store
                .join_channel(api, &id)
                .with_context(|| format!("Failed to join channel {}", id))?;
            println!("Joined {}", ch.title());
        }
        Some(("create", sub)) => create(api, &mut store, sub)?,
        _ => {}
    }
    Ok(())
}

fn conversations(api: &dyn ChatApi, store: &mut ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    store
        .load_conversations(api)
        .context("Failed to load conversations")?;
    if maybe_print_json(json_flag, jsonl_flag, &store.conversations())? {
        return Ok(());
    }
    let mut t = pretty_table(&["Id", "Type", "Name", "Members", "Unread", "Last Message"], vec![]);
    for c in store.conversations() {
        let unread = Cell::new(c.unread_count);
        t.add_row(vec![
            Cell::new(&c.id),
            Cell::new(format!("{:?}", c.r#type).to_lowercase()),
            Cell::new(c.title()),
            Cell::new(c.members.len()),
            if c.unread_count > 0 { unread.fg(Color::Red) } else { unread },
            Cell::new(c.last_message.as_ref().map(preview).unwrap_or_default()),
        ]);
    }
    println!("{}", t);
    println!("{} unread", store.total_unread());
    Ok(())
}

fn contacts(api: &dyn ChatApi, store: &mut ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let online_only = sub.get_flag("online");
    let shown: Vec<&Contact> = store
        .load_contacts(api)
        .context("Failed to load contacts")?
        .iter()
        .filter(|c| !online_only || c.presence != Presence::Offline)
        .collect();
    if maybe_print_json(json_flag, jsonl_flag, &shown)? {
        return Ok(());
    }
    let mut t = pretty_table(&["Id", "Name", "Role", "Presence"], vec![]);
    for c in &shown {
        t.add_row(vec![
            Cell::new(&c.id),
            Cell::new(&c.name),
            Cell::new(c.role.as_deref().unwrap_or("")),
            Cell::new(format!("{:?}", c.presence).to_lowercase()).fg(c.presence.tone().term_color()),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn preview(m: &Message) -> String {
    const MAX: usize = 40;
    let text = match m.file {
        Some(ref f) if m.content.is_empty() => format!("[{}]", f.name),
        _ => m.content.clone(),
    };
    if text.chars().count() > MAX {
        format!("{}…", text.chars().take(MAX).collect::<String>())
    } else {
        text
    }
}

fn print_messages(msgs: &[Message]) {
    let rows = msgs
        .iter()
        .map(|m| {
            vec![
                m.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                m.sender_name.clone().unwrap_or_else(|| m.sender_id.to_string()),
                match m.file {
                    Some(ref f) => format!("{} [{}]", m.content, f.url),
                    None => m.content.clone(),
                },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["When", "From", "Message"], rows));
}

fn open(api: &dyn ChatApi, store: &mut ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let id = RecordId::from(arg(sub, "conversation")?);
    let msgs = store
        .open_conversation(api, &id)
        .with_context(|| format!("Failed to open conversation {}", id))?;
    if !maybe_print_json(json_flag, jsonl_flag, &msgs)? {
        print_messages(msgs);
    }
    Ok(())
}

fn send(api: &dyn ChatApi, store: &mut ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::from(arg(sub, "conversation")?);
    let content = opt_arg(sub, "content").unwrap_or("");
    let file = opt_arg(sub, "file-url").map(|url| Attachment {
        name: opt_arg(sub, "file-name")
            .map(str::to_string)
            .unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url).to_string()),
        url: url.to_string(),
        size: None,
        mime_type: None,
    });
    let msg = store
        .send_message(api, &id, content, None, file)
        .with_context(|| format!("Failed to send message to {}", id))?;
    println!("Sent message {} to {}", msg.id, id);
    Ok(())
}

fn search(api: &dyn ChatApi, store: &ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let q = arg(sub, "query")?;
    let hits = store.search_messages(api, q).context("Message search failed")?;
    if !maybe_print_json(json_flag, jsonl_flag, &hits)? {
        print_messages(&hits);
        println!("{} matches", hits.len());
    }
    Ok(())
}

fn create(api: &dyn ChatApi, store: &mut ChatStore, sub: &clap::ArgMatches) -> Result<()> {
    let kind = match arg(sub, "type")?.to_ascii_lowercase().as_str() {
        "direct" => ConversationType::Direct,
        "group" => ConversationType::Group,
        "channel" => ConversationType::Channel,
        other => bail!("Unknown conversation type '{}' (direct|group|channel)", other),
    };
    let members: Vec<RecordId> = sub
        .get_many::<String>("member")
        .into_iter()
        .flatten()
        .map(|s| RecordId::from(s.as_str()))
        .collect();
    let req = NewConversation {
        r#type: kind,
        name: opt_arg(sub, "name").map(str::to_string),
        members,
    };
    let conv = store
        .create_conversation(api, &req)
        .context("Failed to create conversation")?;
    println!("Created {} ({})", conv.title(), conv.id);
    Ok(())
}
