// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the config, engine, and CLI crates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

/// One interchange event, as decoded from the message log.
///
/// Immutable once created. `guid` is unique within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub time: DateTime<Utc>,
    pub conversation_id: String,
    pub guid: String,
    pub interaction_id: String,
    pub from_party: String,
    pub to_party: String,
    /// On acknowledgments, the `guid` of the acknowledged message.
    #[serde(default)]
    pub message_ref: Option<String>,
    /// `None` means no error.
    #[serde(default)]
    pub error_code: Option<u32>,
    #[serde(default)]
    pub from_system: Option<String>,
    #[serde(default)]
    pub to_system: Option<String>,
}

/// Protocol role of a message, resolved once from its interaction id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    RequestStarted,
    RequestCompleted,
    Acknowledgment,
    LargePayloadFragment,
    Unrecognized,
}

/// Final status of a transfer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    IntegratedOnTime,
    TechnicalFailure,
    ProcessFailure,
    UnclassifiedFailure,
}

/// Why a transfer did not integrate on time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferFailureReason {
    IntegratedLate,
    FinalError,
    TransferredNotIntegrated,
    RequestNotAcknowledged,
    CoreRecordNotSent,
    FatalSenderError,
    FragmentsNotSent,
    FragmentsNotAcknowledged,
    TransferredNotIntegratedWithError,
    AmbiguousFragments,
}

/// Status plus failure reason. The reason is present iff the status is not
/// [`TransferStatus::IntegratedOnTime`]; the constructors are the only way
/// to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    status: TransferStatus,
    failure_reason: Option<TransferFailureReason>,
}

impl TransferOutcome {
    pub fn integrated_on_time() -> Self {
        Self {
            status: TransferStatus::IntegratedOnTime,
            failure_reason: None,
        }
    }

    pub fn technical_failure(reason: TransferFailureReason) -> Self {
        Self::failed(TransferStatus::TechnicalFailure, reason)
    }

    pub fn process_failure(reason: TransferFailureReason) -> Self {
        Self::failed(TransferStatus::ProcessFailure, reason)
    }

    pub fn unclassified_failure(reason: TransferFailureReason) -> Self {
        Self::failed(TransferStatus::UnclassifiedFailure, reason)
    }

    fn failed(status: TransferStatus, reason: TransferFailureReason) -> Self {
        Self {
            status,
            failure_reason: Some(reason),
        }
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn failure_reason(&self) -> Option<TransferFailureReason> {
        self.failure_reason
    }
}

/// One classified transfer, produced per successfully-started conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub conversation_id: String,
    #[serde(rename = "sla_duration_secs", serialize_with = "serialize_secs")]
    pub sla_duration: Option<Duration>,
    pub requesting_party: String,
    pub sending_party: String,
    pub requesting_supplier: Option<String>,
    pub sending_supplier: Option<String>,
    pub outcome: TransferOutcome,
    pub date_requested: DateTime<Utc>,
    pub date_completed: Option<DateTime<Utc>>,
    pub sender_error_codes: Vec<Option<u32>>,
    pub final_error_codes: Vec<Option<u32>>,
    pub intermediate_error_codes: Vec<u32>,
}

fn serialize_secs<S: Serializer>(duration: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    duration.map(|d| d.as_secs()).serialize(s)
}
