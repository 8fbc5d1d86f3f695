// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered decision procedure assigning a transfer outcome.
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! 1. Effective acknowledgment integrated: on time if the SLA is within the
//!    threshold, otherwise late.
//! 2. Effective acknowledgment rejected: final error.
//! 3. Large-payload exchange in progress: see [`OutcomeClassifier::large_payload_outcome`].
//! 4. Request-started acknowledged with a fatal sender code.
//! 5. Request-started never acknowledged.
//! 6. Core record never sent.
//! 7. Core record sent but request-started acknowledged with an error.
//! 8. Otherwise sent, acknowledged, and never concluded.

use std::time::Duration;

use gp2gp_config::ProtocolConfig;
use gp2gp_core::TransferFailureReason::*;
use gp2gp_core::TransferOutcome;

use crate::roles::Gp2gpConversation;
use crate::selector::{ConclusionKind, EffectiveConclusion};

/// Assigns a [`TransferOutcome`] to a classified conversation.
#[derive(Debug, Clone)]
pub struct OutcomeClassifier<'p> {
    protocol: &'p ProtocolConfig,
    sla_threshold: Duration,
}

impl<'p> OutcomeClassifier<'p> {
    pub fn new(protocol: &'p ProtocolConfig, sla_threshold: Duration) -> Self {
        Self {
            protocol,
            sla_threshold,
        }
    }

    /// Classify one conversation. Total: every conversation gets exactly one outcome.
    pub fn classify(
        &self,
        conversation: &Gp2gpConversation,
        conclusion: Option<&EffectiveConclusion<'_>>,
        sla: Option<Duration>,
    ) -> TransferOutcome {
        match conclusion.map(|c| c.kind) {
            Some(ConclusionKind::Integrated) => match sla {
                Some(duration) if duration > self.sla_threshold => {
                    TransferOutcome::process_failure(IntegratedLate)
                }
                _ => TransferOutcome::integrated_on_time(),
            },
            Some(ConclusionKind::Failed) => TransferOutcome::technical_failure(FinalError),
            None if conversation.uses_large_payload() => self.large_payload_outcome(conversation),
            None => self.unconcluded_outcome(conversation),
        }
    }

    /// Rule 3: the large-payload exchange started but nothing concluded.
    ///
    /// a. Duplicate core records, fragments present, and some core record
    ///    unacknowledged: ambiguous.
    /// b. A fragment acknowledged with an error and every fragment acknowledged.
    /// c. Continuation marker sent but no fragments followed.
    /// d. A fragment never acknowledged.
    /// e. Otherwise transferred, not integrated.
    pub fn large_payload_outcome(&self, conversation: &Gp2gpConversation) -> TransferOutcome {
        let fragments_sent = !conversation.fragments.is_empty();

        if conversation.has_duplicate_core_records()
            && fragments_sent
            && !conversation.all_core_records_acknowledged()
        {
            TransferOutcome::unclassified_failure(AmbiguousFragments)
        } else if conversation.has_fragment_error() && conversation.all_fragments_acknowledged() {
            TransferOutcome::unclassified_failure(TransferredNotIntegratedWithError)
        } else if !conversation.continuation_markers.is_empty() && !fragments_sent {
            TransferOutcome::technical_failure(FragmentsNotSent)
        } else if !conversation.all_fragments_acknowledged() {
            TransferOutcome::technical_failure(FragmentsNotAcknowledged)
        } else {
            TransferOutcome::process_failure(TransferredNotIntegrated)
        }
    }

    /// Rules 4 to 8, for conversations without a conclusion or large payload.
    fn unconcluded_outcome(&self, conversation: &Gp2gpConversation) -> TransferOutcome {
        let start = &conversation.request_started;

        if start
            .acknowledgment_codes()
            .any(|code| self.protocol.is_fatal_sender_error(code))
        {
            TransferOutcome::technical_failure(FatalSenderError)
        } else if !start.is_acknowledged() {
            TransferOutcome::technical_failure(RequestNotAcknowledged)
        } else if !conversation.core_record_sent() {
            TransferOutcome::technical_failure(CoreRecordNotSent)
        } else if start.has_acknowledgment_error() {
            TransferOutcome::unclassified_failure(TransferredNotIntegratedWithError)
        } else {
            TransferOutcome::process_failure(TransferredNotIntegrated)
        }
    }
}
