// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buckets raw messages into time-ordered conversations.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::TimeDelta;
use gp2gp_core::Message;

/// All messages sharing one conversation id, sorted by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
}

/// Group messages by conversation id.
///
/// Each bucket is sorted by time; ties keep input order. With a cutoff,
/// messages later than `first message time + cutoff` are dropped (a
/// message exactly at the boundary is kept). A cutoff too large to
/// represent is treated as unbounded.
///
/// The whole input is bucketed before anything is yielded. Conversations
/// come out ordered by id.
pub fn group_into_conversations(
    messages: impl IntoIterator<Item = Message>,
    cutoff: Option<Duration>,
) -> impl Iterator<Item = Conversation> {
    let cutoff = cutoff.and_then(|c| TimeDelta::from_std(c).ok());

    let mut buckets: BTreeMap<String, Vec<Message>> = BTreeMap::new();
    for message in messages {
        buckets
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
    }

    buckets.into_iter().map(move |(id, mut messages)| {
        messages.sort_by_key(|m| m.time);
        let limit = cutoff
            .zip(messages.first())
            .and_then(|(cutoff, first)| first.time.checked_add_signed(cutoff));
        if let Some(limit) = limit {
            messages.retain(|m| m.time <= limit);
        }
        Conversation { id, messages }
    })
}
