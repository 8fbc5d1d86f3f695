// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production observer: structured warnings plus metric counters.
//!
//! Counters go through the metrics facade; whichever recorder the host
//! process installs collects them, and without one they are no-ops.

use chrono::TimeDelta;
use gp2gp_core::TransferObserver;
use metrics::counter;
use tracing::warn;

const WARNINGS_TOTAL: &str = "gp2gp_warnings_total";

/// Logs every warning through `tracing` and counts it by kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    fn count(kind: &'static str) {
        counter!(WARNINGS_TOTAL, "kind" => kind).increment(1);
    }
}

impl TransferObserver for TracingObserver {
    fn unpaired_acknowledgment(&self, conversation_id: &str, message_ref: Option<&str>) {
        warn!(
            conversation_id,
            message_ref = message_ref.unwrap_or("<none>"),
            "could not pair acknowledgment with message for ref"
        );
        Self::count("unpaired_acknowledgment");
    }

    fn undetermined_message_purpose(&self, conversation_id: &str, guid: &str, interaction_id: &str) {
        warn!(
            conversation_id,
            guid, interaction_id, "could not determine purpose of message"
        );
        Self::count("undetermined_message_purpose");
    }

    fn negative_sla_duration(&self, conversation_id: &str, duration: TimeDelta) {
        warn!(
            conversation_id,
            duration_secs = duration.num_seconds(),
            "negative SLA duration, clamping to zero"
        );
        Self::count("negative_sla_duration");
    }

    fn conversation_missing_start(&self, conversation_id: &str) {
        warn!(
            conversation_id,
            "conversation does not begin with a request-started message, skipping"
        );
        Self::count("conversation_missing_start");
    }
}
