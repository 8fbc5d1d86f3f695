// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SLA duration between effective delivery and its acknowledgment.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gp2gp_core::TransferObserver;

/// Elapsed time from `delivered` to `acknowledged`.
///
/// Absent when either instant is absent. A negative span (acknowledgment
/// logged before the delivery) is reported and clamped to zero.
pub fn calculate_sla(
    conversation_id: &str,
    delivered: Option<DateTime<Utc>>,
    acknowledged: Option<DateTime<Utc>>,
    observer: &dyn TransferObserver,
) -> Option<Duration> {
    let elapsed = acknowledged? - delivered?;
    match elapsed.to_std() {
        Ok(duration) => Some(duration),
        Err(_) => {
            observer.negative_sla_duration(conversation_id, elapsed);
            Some(Duration::ZERO)
        }
    }
}
