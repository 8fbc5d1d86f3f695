// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer trait for data-quality warnings raised while classifying.

use chrono::TimeDelta;

/// Receives the non-fatal warnings the engine raises.
///
/// None of these change control flow: the engine drops the acknowledgment,
/// discards the message, or clamps the duration regardless of what the
/// observer does. Production wiring logs them; tests record them.
pub trait TransferObserver: Send + Sync {
    /// An acknowledgment referenced a message not seen earlier in the conversation.
    fn unpaired_acknowledgment(&self, conversation_id: &str, message_ref: Option<&str>);

    /// A message matched none of the known roles and was discarded.
    fn undetermined_message_purpose(&self, conversation_id: &str, guid: &str, interaction_id: &str);

    /// The effective acknowledgment preceded the delivery it acknowledges.
    fn negative_sla_duration(&self, conversation_id: &str, duration: TimeDelta);

    /// A conversation was skipped because it does not begin with a request-started message.
    fn conversation_missing_start(&self, conversation_id: &str);
}
