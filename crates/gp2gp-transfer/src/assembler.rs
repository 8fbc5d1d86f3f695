// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the output [`Transfer`] record.

use std::time::Duration;

use gp2gp_core::{Transfer, TransferOutcome};

use crate::pairing::AcknowledgedMessage;
use crate::roles::Gp2gpConversation;
use crate::selector::EffectiveConclusion;

/// Combine a classified conversation, its conclusion, SLA, and outcome.
pub fn assemble_transfer(
    conversation: &Gp2gpConversation,
    conclusion: Option<&EffectiveConclusion<'_>>,
    sla_duration: Option<Duration>,
    outcome: TransferOutcome,
) -> Transfer {
    let start = &conversation.request_started.message;

    Transfer {
        conversation_id: conversation.id.clone(),
        sla_duration,
        requesting_party: conversation.requesting_party().to_string(),
        sending_party: conversation.sending_party().to_string(),
        requesting_supplier: start.from_system.clone(),
        sending_supplier: start.to_system.clone(),
        outcome,
        date_requested: start.time,
        date_completed: conclusion.map(|c| c.acknowledgment.time),
        sender_error_codes: conversation.request_started.acknowledgment_codes().collect(),
        final_error_codes: conversation
            .request_completed_candidates
            .iter()
            .flat_map(AcknowledgedMessage::acknowledgment_codes)
            .collect(),
        intermediate_error_codes: conversation
            .fragments
            .iter()
            .flat_map(AcknowledgedMessage::acknowledgment_codes)
            .flatten()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use gp2gp_config::ProtocolConfig;
    use gp2gp_test_utils::{t0, ConversationFixture, RecordingObserver, REQUESTER, SENDER};

    use super::*;
    use crate::grouper::Conversation;
    use crate::pairing::pair_acknowledgments;
    use crate::selector::select_effective_conclusion;

    #[test]
    fn collects_error_codes_by_stage() {
        let mut fixture = ConversationFixture::new("c");
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("rs-ack", TimeDelta::minutes(1), "rs", None)
            .request_completed("ehr-1", TimeDelta::minutes(2))
            .ack("ehr-1-ack", TimeDelta::minutes(3), "ehr-1", Some(12))
            .request_completed("ehr-2", TimeDelta::minutes(4))
            .fragment("frag-1", TimeDelta::minutes(5))
            .ack("frag-1-ack", TimeDelta::minutes(6), "frag-1", Some(29))
            .fragment("frag-2", TimeDelta::minutes(7))
            .ack("frag-2-ack", TimeDelta::minutes(8), "frag-2", None)
            .ack("ehr-2-ack", TimeDelta::minutes(9), "ehr-2", None);

        let protocol = ProtocolConfig::default();
        let observer = RecordingObserver::new();
        let paired = pair_acknowledgments(
            Conversation {
                id: "c".to_string(),
                messages: fixture.into_messages(),
            },
            &protocol,
            &observer,
        );
        let conversation =
            Gp2gpConversation::parse("c", paired, &protocol, &observer).expect("starts correctly");
        let conclusion =
            select_effective_conclusion(&conversation.request_completed_candidates, &protocol);

        let transfer = assemble_transfer(
            &conversation,
            conclusion.as_ref(),
            Some(Duration::from_secs(300)),
            TransferOutcome::integrated_on_time(),
        );

        assert_eq!(transfer.conversation_id, "c");
        assert_eq!(transfer.requesting_party, REQUESTER);
        assert_eq!(transfer.sending_party, SENDER);
        assert_eq!(transfer.requesting_supplier.as_deref(), Some("Requester System"));
        assert_eq!(transfer.sending_supplier.as_deref(), Some("Sender System"));
        assert_eq!(transfer.date_requested, t0());
        assert_eq!(transfer.date_completed, Some(t0() + TimeDelta::minutes(9)));
        assert_eq!(transfer.sender_error_codes, vec![None]);
        assert_eq!(transfer.final_error_codes, vec![Some(12), None]);
        assert_eq!(transfer.intermediate_error_codes, vec![29]);
        assert_eq!(transfer.sla_duration, Some(Duration::from_secs(300)));
    }
}
