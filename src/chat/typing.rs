// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Debounced "is typing" indicator.
//!
//! The first keystroke in a conversation flips the indicator on; it flips back off
//! once [`TYPING_DEBOUNCE`] passes with no further keystroke. Each keystroke pushes
//! the deadline out again. Callers pass `now` in, so the machine never reads a
//! clock itself.

use std::time::{Duration, Instant};

use crate::models::RecordId;

pub const TYPING_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingState {
    Idle,
    Typing {
        conversation: RecordId,
        deadline: Instant,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingEvent {
    Started(RecordId),
    Stopped(RecordId),
}

#[derive(Debug, Clone)]
pub struct TypingIndicator {
    state: TypingState,
    debounce: Duration,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        TypingIndicator::new(TYPING_DEBOUNCE)
    }
}

impl TypingIndicator {
    pub fn new(debounce: Duration) -> Self {
        TypingIndicator {
            state: TypingState::Idle,
            debounce,
        }
    }

    pub fn state(&self) -> &TypingState {
        &self.state
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.state, TypingState::Typing { .. })
    }

    /// Register a keystroke. Without a selected conversation nothing happens.
    /// Typing into a different conversation stops the old one first.
    pub fn keystroke(&mut self, conversation: Option<&RecordId>, now: Instant) -> Vec<TypingEvent> {
        let Some(conv) = conversation else {
            return Vec::new();
        };
        let deadline = now + self.debounce;
        let mut events = Vec::new();
        match &mut self.state {
            TypingState::Typing {
                conversation: current,
                deadline: d,
            } if *current == *conv => {
                *d = deadline;
                return events;
            }
            TypingState::Typing {
                conversation: current,
                ..
            } => events.push(TypingEvent::Stopped(current.clone())),
            TypingState::Idle => {}
        }
        self.state = TypingState::Typing {
            conversation: conv.clone(),
            deadline,
        };
        events.push(TypingEvent::Started(conv.clone()));
        events
    }

    /// Expire the indicator once the debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<TypingEvent> {
        match &self.state {
            TypingState::Typing {
                conversation,
                deadline,
            } if now >= *deadline => {
                let ev = TypingEvent::Stopped(conversation.clone());
                self.state = TypingState::Idle;
                Some(ev)
            }
            _ => None,
        }
    }

    /// Time left before the indicator expires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            TypingState::Typing { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            TypingState::Idle => None,
        }
    }

    pub fn reset(&mut self) -> Option<TypingEvent> {
        match std::mem::replace(&mut self.state, TypingState::Idle) {
            TypingState::Typing { conversation, .. } => Some(TypingEvent::Stopped(conversation)),
            TypingState::Idle => None,
        }
    }
}
