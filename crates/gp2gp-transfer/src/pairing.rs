// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairs acknowledgments with the messages they acknowledge.

use std::collections::HashMap;

use gp2gp_config::ProtocolConfig;
use gp2gp_core::{InteractionKind, Message, TransferObserver};

use crate::grouper::Conversation;

/// A message together with every acknowledgment received for it, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcknowledgedMessage {
    pub message: Message,
    pub acknowledgments: Vec<Message>,
}

impl AcknowledgedMessage {
    fn new(message: Message) -> Self {
        Self {
            message,
            acknowledgments: Vec::new(),
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        !self.acknowledgments.is_empty()
    }

    /// Error codes (or their absence) of every acknowledgment.
    pub fn acknowledgment_codes(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        self.acknowledgments.iter().map(|ack| ack.error_code)
    }

    /// Whether any acknowledgment carries an error code.
    pub fn has_acknowledgment_error(&self) -> bool {
        self.acknowledgment_codes().any(|code| code.is_some())
    }
}

#[derive(Default)]
struct Pairing {
    entries: Vec<AcknowledgedMessage>,
    index: HashMap<String, usize>,
}

/// Fold a time-sorted conversation into acknowledged messages.
///
/// Non-acknowledgment messages open an entry keyed by their guid; a repeated
/// guid replaces the earlier entry in place. Acknowledgments attach to the
/// entry named by their `message_ref`; when there is none (the ref is
/// missing or names a message not seen earlier) the acknowledgment is
/// reported and dropped.
///
/// Output follows first-seen guid order.
pub fn pair_acknowledgments(
    conversation: Conversation,
    protocol: &ProtocolConfig,
    observer: &dyn TransferObserver,
) -> Vec<AcknowledgedMessage> {
    let Conversation { id, messages } = conversation;

    let pairing = messages
        .into_iter()
        .fold(Pairing::default(), |mut pairing, message| {
            if protocol.interaction_kind(&message.interaction_id) == InteractionKind::Acknowledgment {
                let target = message
                    .message_ref
                    .as_deref()
                    .and_then(|r| pairing.index.get(r).copied());
                match target {
                    Some(i) => pairing.entries[i].acknowledgments.push(message),
                    None => observer.unpaired_acknowledgment(&id, message.message_ref.as_deref()),
                }
            } else if let Some(&i) = pairing.index.get(&message.guid) {
                pairing.entries[i] = AcknowledgedMessage::new(message);
            } else {
                pairing.index.insert(message.guid.clone(), pairing.entries.len());
                pairing.entries.push(AcknowledgedMessage::new(message));
            }
            pairing
        });

    pairing.entries
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use gp2gp_test_utils::{ConversationFixture, RecordedWarning, RecordingObserver};

    use super::*;

    fn pair(fixture: ConversationFixture, observer: &RecordingObserver) -> Vec<AcknowledgedMessage> {
        let conversation = Conversation {
            id: fixture.id().to_string(),
            messages: fixture.into_messages(),
        };
        pair_acknowledgments(conversation, &ProtocolConfig::default(), observer)
    }

    #[test]
    fn attaches_acknowledgments_to_their_message() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("rs-ack", TimeDelta::minutes(1), "rs", None)
            .request_completed("ehr", TimeDelta::minutes(2))
            .ack("ehr-ack-1", TimeDelta::minutes(3), "ehr", Some(12))
            .ack("ehr-ack-2", TimeDelta::minutes(4), "ehr", None);

        let observer = RecordingObserver::new();
        let paired = pair(fixture, &observer);

        assert_eq!(paired.len(), 2);
        assert_eq!(paired[0].message.guid, "rs");
        assert_eq!(paired[0].acknowledgments.len(), 1);
        assert_eq!(paired[1].message.guid, "ehr");
        assert_eq!(
            paired[1].acknowledgment_codes().collect::<Vec<_>>(),
            vec![Some(12), None]
        );
        assert!(observer.is_empty());
    }

    #[test]
    fn message_without_acknowledgment_has_empty_list() {
        let mut fixture = ConversationFixture::new("c");
        fixture.request_started("rs", TimeDelta::zero());

        let paired = pair(fixture, &RecordingObserver::new());
        assert_eq!(paired.len(), 1);
        assert!(!paired[0].is_acknowledged());
    }

    #[test]
    fn unknown_ref_is_reported_and_dropped() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("stray", TimeDelta::minutes(1), "does-not-exist", None);

        let observer = RecordingObserver::new();
        let paired = pair(fixture, &observer);

        assert_eq!(paired.len(), 1);
        assert!(!paired[0].is_acknowledged());
        assert_eq!(
            observer.warnings(),
            vec![RecordedWarning::UnpairedAcknowledgment {
                conversation_id: "c".to_string(),
                message_ref: Some("does-not-exist".to_string()),
            }]
        );
    }

    #[test]
    fn acknowledgment_before_its_message_is_unpaired() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("early", TimeDelta::minutes(1), "ehr", None)
            .request_completed("ehr", TimeDelta::minutes(2));

        let observer = RecordingObserver::new();
        let paired = pair(fixture, &observer);

        assert_eq!(paired.len(), 2);
        assert!(!paired[1].is_acknowledged());
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn acknowledgment_codes_report_errors() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("rs-ack", TimeDelta::minutes(1), "rs", Some(30));

        let paired = pair(fixture, &RecordingObserver::new());
        assert!(paired[0].has_acknowledgment_error());
    }
}
