// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer that records every warning for later assertion.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use gp2gp_core::TransferObserver;

/// One captured observer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedWarning {
    UnpairedAcknowledgment {
        conversation_id: String,
        message_ref: Option<String>,
    },
    UndeterminedPurpose {
        conversation_id: String,
        guid: String,
        interaction_id: String,
    },
    NegativeSla {
        conversation_id: String,
        duration: TimeDelta,
    },
    MissingStart {
        conversation_id: String,
    },
}

/// A [`TransferObserver`] that keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    warnings: Mutex<Vec<RecordedWarning>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<RecordedWarning> {
        self.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn record(&self, warning: RecordedWarning) {
        self.lock().push(warning);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedWarning>> {
        // A panicking test thread must not hide the warnings already recorded.
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TransferObserver for RecordingObserver {
    fn unpaired_acknowledgment(&self, conversation_id: &str, message_ref: Option<&str>) {
        self.record(RecordedWarning::UnpairedAcknowledgment {
            conversation_id: conversation_id.to_string(),
            message_ref: message_ref.map(str::to_string),
        });
    }

    fn undetermined_message_purpose(&self, conversation_id: &str, guid: &str, interaction_id: &str) {
        self.record(RecordedWarning::UndeterminedPurpose {
            conversation_id: conversation_id.to_string(),
            guid: guid.to_string(),
            interaction_id: interaction_id.to_string(),
        });
    }

    fn negative_sla_duration(&self, conversation_id: &str, duration: TimeDelta) {
        self.record(RecordedWarning::NegativeSla {
            conversation_id: conversation_id.to_string(),
            duration,
        });
    }

    fn conversation_missing_start(&self, conversation_id: &str) {
        self.record(RecordedWarning::MissingStart {
            conversation_id: conversation_id.to_string(),
        });
    }
}
