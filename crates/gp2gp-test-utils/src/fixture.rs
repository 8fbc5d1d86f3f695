// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and conversation builders.
//!
//! Conversations are written as a timeline of offsets from [`t0`], using the
//! default protocol interaction ids. Requester and sender parties are fixed
//! so the role classifier can tell continuation markers from fragments.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gp2gp_config::ProtocolConfig;
use gp2gp_core::Message;

pub const REQUESTER: &str = "200000000001";
pub const SENDER: &str = "200000000002";

/// Fixed reference instant for fixtures.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Builds one [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(conversation_id: &str, guid: &str, interaction_id: &str) -> Self {
        Self {
            message: Message {
                time: t0(),
                conversation_id: conversation_id.to_string(),
                guid: guid.to_string(),
                interaction_id: interaction_id.to_string(),
                from_party: REQUESTER.to_string(),
                to_party: SENDER.to_string(),
                message_ref: None,
                error_code: None,
                from_system: None,
                to_system: None,
            },
        }
    }

    pub fn at(mut self, offset: TimeDelta) -> Self {
        self.message.time = t0() + offset;
        self
    }

    pub fn from_party(mut self, party: &str) -> Self {
        self.message.from_party = party.to_string();
        self
    }

    pub fn to_party(mut self, party: &str) -> Self {
        self.message.to_party = party.to_string();
        self
    }

    pub fn message_ref(mut self, guid: &str) -> Self {
        self.message.message_ref = Some(guid.to_string());
        self
    }

    pub fn error_code(mut self, code: Option<u32>) -> Self {
        self.message.error_code = code;
        self
    }

    pub fn systems(mut self, from: &str, to: &str) -> Self {
        self.message.from_system = Some(from.to_string());
        self.message.to_system = Some(to.to_string());
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// A conversation assembled message by message.
#[derive(Debug, Clone)]
pub struct ConversationFixture {
    id: String,
    protocol: ProtocolConfig,
    messages: Vec<Message>,
}

impl ConversationFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            protocol: ProtocolConfig::default(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Request-started, requester to sender.
    pub fn request_started(&mut self, guid: &str, offset: TimeDelta) -> &mut Self {
        let interaction = self.protocol.request_started.clone();
        self.push(
            MessageBuilder::new(&self.id, guid, &interaction)
                .at(offset)
                .systems("Requester System", "Sender System")
                .build(),
        )
    }

    /// Core-record delivery, sender to requester.
    pub fn request_completed(&mut self, guid: &str, offset: TimeDelta) -> &mut Self {
        let interaction = self.protocol.request_completed.clone();
        self.push(Self::reversed(MessageBuilder::new(&self.id, guid, &interaction).at(offset)))
    }

    /// Large-payload continuation marker, requester to sender.
    pub fn continuation_marker(&mut self, guid: &str, offset: TimeDelta) -> &mut Self {
        let interaction = self.protocol.large_payload_fragment.clone();
        self.push(MessageBuilder::new(&self.id, guid, &interaction).at(offset).build())
    }

    /// Large-payload fragment, sender to requester.
    pub fn fragment(&mut self, guid: &str, offset: TimeDelta) -> &mut Self {
        let interaction = self.protocol.large_payload_fragment.clone();
        self.push(Self::reversed(MessageBuilder::new(&self.id, guid, &interaction).at(offset)))
    }

    /// Acknowledgment of `acked`, sent back by whoever received it.
    pub fn ack(
        &mut self,
        guid: &str,
        offset: TimeDelta,
        acked: &str,
        error_code: Option<u32>,
    ) -> &mut Self {
        let interaction = self.protocol.acknowledgment.clone();
        let (from, to) = self
            .messages
            .iter()
            .find(|m| m.guid == acked)
            .map(|m| (m.to_party.clone(), m.from_party.clone()))
            .unwrap_or_else(|| (REQUESTER.to_string(), SENDER.to_string()));
        self.push(
            MessageBuilder::new(&self.id, guid, &interaction)
                .at(offset)
                .from_party(&from)
                .to_party(&to)
                .message_ref(acked)
                .error_code(error_code)
                .build(),
        )
    }

    /// A message with an interaction id outside the protocol.
    pub fn unrecognized(&mut self, guid: &str, offset: TimeDelta) -> &mut Self {
        self.push(
            MessageBuilder::new(&self.id, guid, "urn:nhs:names:services:gp2gp/PRPA_IN000202UK01")
                .at(offset)
                .build(),
        )
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    fn reversed(builder: MessageBuilder) -> Message {
        builder.from_party(SENDER).to_party(REQUESTER).build()
    }

    fn push(&mut self, message: Message) -> &mut Self {
        self.messages.push(message);
        self
    }
}
