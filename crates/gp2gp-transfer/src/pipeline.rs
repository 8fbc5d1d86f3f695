// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline from raw messages to transfers.
//!
//! Each conversation goes through pairing, role classification, conclusion
//! selection, SLA calculation, outcome classification, and assembly. The
//! steps share no state across conversations, so callers may run
//! [`TransferPipeline::process_conversation`] on many workers at once.

use std::sync::Arc;
use std::time::Duration;

use gp2gp_config::{Gp2gpConfig, ProtocolConfig};
use gp2gp_core::{Gp2gpError, Message, Transfer, TransferObserver};
use metrics::counter;
use tracing::{debug, info};

use crate::assembler::assemble_transfer;
use crate::grouper::{group_into_conversations, Conversation};
use crate::outcome::OutcomeClassifier;
use crate::pairing::pair_acknowledgments;
use crate::roles::Gp2gpConversation;
use crate::selector::select_effective_conclusion;
use crate::sla::calculate_sla;

/// Configured engine plus the observer it reports warnings to.
#[derive(Clone)]
pub struct TransferPipeline {
    protocol: ProtocolConfig,
    cutoff: Option<Duration>,
    sla_threshold: Duration,
    observer: Arc<dyn TransferObserver>,
}

impl std::fmt::Debug for TransferPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferPipeline")
            .field("protocol", &self.protocol)
            .field("cutoff", &self.cutoff)
            .field("sla_threshold", &self.sla_threshold)
            .finish_non_exhaustive()
    }
}

impl TransferPipeline {
    pub fn new(config: &Gp2gpConfig, observer: Arc<dyn TransferObserver>) -> Self {
        Self {
            protocol: config.protocol.clone(),
            cutoff: config.engine.cutoff(),
            sla_threshold: config.engine.sla_threshold(),
            observer,
        }
    }

    /// Replace the configured grouping cutoff.
    pub fn with_cutoff(mut self, cutoff: Option<Duration>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Group a batch of messages using the configured cutoff.
    pub fn group(&self, messages: Vec<Message>) -> impl Iterator<Item = Conversation> + use<> {
        group_into_conversations(messages, self.cutoff)
    }

    /// Classify one conversation into a transfer.
    ///
    /// Fails only with [`Gp2gpError::ConversationMissingStart`].
    pub fn process_conversation(&self, conversation: Conversation) -> Result<Transfer, Gp2gpError> {
        let observer = self.observer.as_ref();
        let id = conversation.id.clone();

        let paired = pair_acknowledgments(conversation, &self.protocol, observer);
        let parsed = Gp2gpConversation::parse(&id, paired, &self.protocol, observer)?;

        let conclusion =
            select_effective_conclusion(&parsed.request_completed_candidates, &self.protocol);
        let sla = calculate_sla(
            &id,
            conclusion.map(|c| c.delivery.message.time),
            conclusion.map(|c| c.acknowledgment.time),
            observer,
        );
        let outcome = OutcomeClassifier::new(&self.protocol, self.sla_threshold).classify(
            &parsed,
            conclusion.as_ref(),
            sla,
        );

        debug!(
            conversation_id = %id,
            status = %outcome.status(),
            failure_reason = ?outcome.failure_reason(),
            "classified conversation"
        );
        counter!("gp2gp_transfers_total", "status" => outcome.status().to_string()).increment(1);

        Ok(assemble_transfer(&parsed, conclusion.as_ref(), sla, outcome))
    }

    /// Classify already-grouped conversations, skipping any without a start.
    pub fn process_conversations(
        &self,
        conversations: impl IntoIterator<Item = Conversation>,
    ) -> Vec<Transfer> {
        conversations
            .into_iter()
            .filter_map(|conversation| {
                let id = conversation.id.clone();
                match self.process_conversation(conversation) {
                    Ok(transfer) => Some(transfer),
                    Err(err) if err.is_conversation_scoped() => {
                        self.observer.conversation_missing_start(&id);
                        None
                    }
                    Err(err) => {
                        tracing::error!(conversation_id = %id, error = %err, "failed to classify conversation");
                        None
                    }
                }
            })
            .collect()
    }

    /// Group and classify a whole batch. Never aborts on a bad conversation.
    pub fn process_batch(&self, messages: Vec<Message>) -> Vec<Transfer> {
        let message_count = messages.len();
        let transfers = self.process_conversations(self.group(messages));
        info!(
            messages = message_count,
            transfers = transfers.len(),
            "processed message batch"
        );
        transfers
    }
}
