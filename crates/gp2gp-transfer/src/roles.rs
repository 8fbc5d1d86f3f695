// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifies paired messages into their protocol roles.
//!
//! The large-payload interaction is used for two different things and only
//! the sender tells them apart: from the requesting party it is a
//! continuation marker, from the sending party it is a payload fragment.

use gp2gp_config::ProtocolConfig;
use gp2gp_core::{Gp2gpError, InteractionKind, Message, TransferObserver};

use crate::pairing::AcknowledgedMessage;

/// Role of a message after the request-started message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    RequestCompleted,
    ContinuationMarker,
    Fragment,
    Undetermined,
}

/// Resolve the role of one message given the parties of the transfer.
pub fn message_role(
    message: &Message,
    protocol: &ProtocolConfig,
    requesting_party: &str,
    sending_party: &str,
) -> MessageRole {
    match protocol.interaction_kind(&message.interaction_id) {
        InteractionKind::RequestCompleted => MessageRole::RequestCompleted,
        InteractionKind::LargePayloadFragment if message.from_party == requesting_party => {
            MessageRole::ContinuationMarker
        }
        InteractionKind::LargePayloadFragment if message.from_party == sending_party => {
            MessageRole::Fragment
        }
        _ => MessageRole::Undetermined,
    }
}

/// A conversation with every message sorted into its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gp2gpConversation {
    pub id: String,
    pub request_started: AcknowledgedMessage,
    pub request_completed_candidates: Vec<AcknowledgedMessage>,
    pub continuation_markers: Vec<Message>,
    pub fragments: Vec<AcknowledgedMessage>,
}

impl Gp2gpConversation {
    /// Build from the output of [`pair_acknowledgments`](crate::pairing::pair_acknowledgments).
    ///
    /// Fails with [`Gp2gpError::ConversationMissingStart`] if the first entry
    /// is missing or is not a request-started message. Messages that fit no
    /// role are reported and discarded.
    pub fn parse(
        id: &str,
        paired: Vec<AcknowledgedMessage>,
        protocol: &ProtocolConfig,
        observer: &dyn TransferObserver,
    ) -> Result<Self, Gp2gpError> {
        let mut paired = paired.into_iter();

        let request_started = paired
            .next()
            .filter(|first| {
                protocol.interaction_kind(&first.message.interaction_id)
                    == InteractionKind::RequestStarted
            })
            .ok_or_else(|| Gp2gpError::ConversationMissingStart {
                conversation_id: id.to_string(),
            })?;

        let mut conversation = Self {
            id: id.to_string(),
            request_started,
            request_completed_candidates: Vec::new(),
            continuation_markers: Vec::new(),
            fragments: Vec::new(),
        };

        let requesting_party = conversation.request_started.message.from_party.clone();
        let sending_party = conversation.request_started.message.to_party.clone();

        for entry in paired {
            match message_role(&entry.message, protocol, &requesting_party, &sending_party) {
                MessageRole::RequestCompleted => conversation.request_completed_candidates.push(entry),
                MessageRole::ContinuationMarker => conversation.continuation_markers.push(entry.message),
                MessageRole::Fragment => conversation.fragments.push(entry),
                MessageRole::Undetermined => observer.undetermined_message_purpose(
                    id,
                    &entry.message.guid,
                    &entry.message.interaction_id,
                ),
            }
        }

        Ok(conversation)
    }

    /// The party that sent the request-started message.
    pub fn requesting_party(&self) -> &str {
        &self.request_started.message.from_party
    }

    pub fn sending_party(&self) -> &str {
        &self.request_started.message.to_party
    }

    pub fn core_record_sent(&self) -> bool {
        !self.request_completed_candidates.is_empty()
    }

    /// More than one core-record delivery was sent.
    pub fn has_duplicate_core_records(&self) -> bool {
        self.request_completed_candidates.len() > 1
    }

    pub fn all_core_records_acknowledged(&self) -> bool {
        self.request_completed_candidates
            .iter()
            .all(AcknowledgedMessage::is_acknowledged)
    }

    /// Either side of the large-payload exchange has started.
    pub fn uses_large_payload(&self) -> bool {
        !self.fragments.is_empty() || !self.continuation_markers.is_empty()
    }

    pub fn all_fragments_acknowledged(&self) -> bool {
        self.fragments.iter().all(AcknowledgedMessage::is_acknowledged)
    }

    pub fn has_fragment_error(&self) -> bool {
        self.fragments
            .iter()
            .any(AcknowledgedMessage::has_acknowledgment_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use gp2gp_test_utils::{ConversationFixture, RecordedWarning, RecordingObserver, REQUESTER, SENDER};

    use super::*;
    use crate::grouper::Conversation;
    use crate::pairing::pair_acknowledgments;

    fn parse(
        fixture: ConversationFixture,
        observer: &RecordingObserver,
    ) -> Result<Gp2gpConversation, Gp2gpError> {
        let protocol = ProtocolConfig::default();
        let id = fixture.id().to_string();
        let paired = pair_acknowledgments(
            Conversation {
                id: id.clone(),
                messages: fixture.into_messages(),
            },
            &protocol,
            observer,
        );
        Gp2gpConversation::parse(&id, paired, &protocol, observer)
    }

    #[test]
    fn sorts_messages_into_roles() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("rs-ack", TimeDelta::minutes(1), "rs", None)
            .request_completed("ehr", TimeDelta::minutes(2))
            .continuation_marker("marker", TimeDelta::minutes(3))
            .fragment("frag-1", TimeDelta::minutes(4))
            .fragment("frag-2", TimeDelta::minutes(5))
            .ack("frag-1-ack", TimeDelta::minutes(6), "frag-1", None);

        let observer = RecordingObserver::new();
        let conversation = parse(fixture, &observer).expect("starts correctly");

        assert_eq!(conversation.requesting_party(), REQUESTER);
        assert_eq!(conversation.sending_party(), SENDER);
        assert_eq!(conversation.request_started.acknowledgments.len(), 1);
        assert_eq!(conversation.request_completed_candidates.len(), 1);
        assert_eq!(conversation.continuation_markers.len(), 1);
        assert_eq!(conversation.fragments.len(), 2);
        assert!(!conversation.all_fragments_acknowledged());
        assert!(observer.is_empty());
    }

    #[test]
    fn first_message_not_request_started_is_rejected() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_completed("ehr", TimeDelta::zero())
            .request_started("rs", TimeDelta::minutes(1));

        let err = parse(fixture, &RecordingObserver::new()).unwrap_err();
        assert!(matches!(
            err,
            Gp2gpError::ConversationMissingStart { ref conversation_id } if conversation_id == "c"
        ));
    }

    #[test]
    fn conversation_of_only_acknowledgments_is_rejected() {
        let mut fixture = ConversationFixture::new("c");
        fixture.ack("ack", TimeDelta::zero(), "nothing", None);

        let observer = RecordingObserver::new();
        let err = parse(fixture, &observer).unwrap_err();
        assert!(err.is_conversation_scoped());
        assert_eq!(observer.count(), 1, "the stray ack is still reported");
    }

    #[test]
    fn unrecognized_and_repeated_start_are_undetermined() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .unrecognized("odd", TimeDelta::minutes(1))
            .request_started("rs-again", TimeDelta::minutes(2));

        let observer = RecordingObserver::new();
        let conversation = parse(fixture, &observer).expect("starts correctly");

        assert!(!conversation.core_record_sent());
        let guids: Vec<_> = observer
            .warnings()
            .into_iter()
            .filter_map(|w| match w {
                RecordedWarning::UndeterminedPurpose { guid, .. } => Some(guid),
                _ => None,
            })
            .collect();
        assert_eq!(guids, vec!["odd", "rs-again"]);
    }

    #[test]
    fn fragment_from_third_party_is_undetermined() {
        let protocol = ProtocolConfig::default();
        let message = gp2gp_test_utils::MessageBuilder::new("c", "x", &protocol.large_payload_fragment)
            .from_party("999999999999")
            .build();
        assert_eq!(
            message_role(&message, &protocol, REQUESTER, SENDER),
            MessageRole::Undetermined
        );
    }

    #[test]
    fn duplicate_core_records_detected() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .request_completed("ehr-1", TimeDelta::minutes(1))
            .request_completed("ehr-2", TimeDelta::minutes(2))
            .ack("ehr-1-ack", TimeDelta::minutes(3), "ehr-1", Some(12));

        let conversation = parse(fixture, &RecordingObserver::new()).expect("starts correctly");
        assert!(conversation.has_duplicate_core_records());
        assert!(!conversation.all_core_records_acknowledged());
    }
}
