// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelt key is
//! rejected at startup instead of silently falling back to a default.

use std::time::Duration;

use gp2gp_core::InteractionKind;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Top-level configuration.
///
/// Every section is optional and defaults to the production values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Gp2gpConfig {
    /// Grouping and SLA settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Interaction identifiers and well-known error codes.
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grouping cutoff and SLA threshold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Drop messages arriving more than this many hours after a
    /// conversation's first message. `None` keeps everything.
    #[serde(default)]
    pub cutoff_hours: Option<u64>,

    /// Conversations concluded within this many days count as on time.
    #[serde(default = "default_sla_threshold_days")]
    pub sla_threshold_days: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cutoff_hours: None,
            sla_threshold_days: default_sla_threshold_days(),
        }
    }
}

impl EngineConfig {
    pub fn cutoff(&self) -> Option<Duration> {
        self.cutoff_hours
            .map(|hours| Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR)))
    }

    pub fn sla_threshold(&self) -> Duration {
        Duration::from_secs(self.sla_threshold_days.saturating_mul(SECONDS_PER_DAY))
    }
}

fn default_sla_threshold_days() -> u64 {
    8
}

/// Wire-format contract: interaction identifiers and error codes.
///
/// Loaded once and passed by reference into the engine, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    #[serde(default = "default_request_started")]
    pub request_started: String,

    #[serde(default = "default_request_completed")]
    pub request_completed: String,

    #[serde(default = "default_acknowledgment")]
    pub acknowledgment: String,

    #[serde(default = "default_large_payload_fragment")]
    pub large_payload_fragment: String,

    /// Benign error code; an acknowledgment carrying it counts as success.
    #[serde(default = "default_suppressed_code")]
    pub suppressed_error_code: u32,

    /// Retransmission noise; never an effective conclusion on its own.
    #[serde(default = "default_duplicate_code")]
    pub duplicate_error_code: u32,

    /// Codes on the request-started acknowledgment that end the transfer.
    #[serde(default = "default_fatal_sender_codes")]
    pub fatal_sender_error_codes: Vec<u32>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            request_started: default_request_started(),
            request_completed: default_request_completed(),
            acknowledgment: default_acknowledgment(),
            large_payload_fragment: default_large_payload_fragment(),
            suppressed_error_code: default_suppressed_code(),
            duplicate_error_code: default_duplicate_code(),
            fatal_sender_error_codes: default_fatal_sender_codes(),
        }
    }
}

impl ProtocolConfig {
    /// Resolve a raw interaction id into its protocol role.
    pub fn interaction_kind(&self, interaction_id: &str) -> InteractionKind {
        if interaction_id == self.request_started {
            InteractionKind::RequestStarted
        } else if interaction_id == self.request_completed {
            InteractionKind::RequestCompleted
        } else if interaction_id == self.acknowledgment {
            InteractionKind::Acknowledgment
        } else if interaction_id == self.large_payload_fragment {
            InteractionKind::LargePayloadFragment
        } else {
            InteractionKind::Unrecognized
        }
    }

    /// No error, or the suppressed code.
    pub fn is_successful(&self, error_code: Option<u32>) -> bool {
        match error_code {
            None => true,
            Some(code) => code == self.suppressed_error_code,
        }
    }

    /// An error code that is present and is not the duplicate code.
    pub fn is_final_error(&self, error_code: Option<u32>) -> bool {
        matches!(error_code, Some(code) if code != self.duplicate_error_code)
    }

    pub fn is_fatal_sender_error(&self, error_code: Option<u32>) -> bool {
        error_code.is_some_and(|code| self.fatal_sender_error_codes.contains(&code))
    }
}

fn default_request_started() -> String {
    "urn:nhs:names:services:gp2gp/RCMR_IN010000UK05".to_string()
}

fn default_request_completed() -> String {
    "urn:nhs:names:services:gp2gp/RCMR_IN030000UK06".to_string()
}

fn default_acknowledgment() -> String {
    "urn:nhs:names:services:gp2gp/MCCI_IN010000UK13".to_string()
}

fn default_large_payload_fragment() -> String {
    "urn:nhs:names:services:gp2gp/COPC_IN000001UK01".to_string()
}

fn default_suppressed_code() -> u32 {
    15
}

fn default_duplicate_code() -> u32 {
    12
}

fn default_fatal_sender_codes() -> Vec<u32> {
    vec![6, 7, 10, 24, 14, 23, 19, 20, 21, 99]
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
