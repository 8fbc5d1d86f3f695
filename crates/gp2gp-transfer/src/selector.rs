// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picks the acknowledgment that concludes a conversation.
//!
//! The sender may retransmit the core record, so several deliveries can each
//! carry acknowledgments. Success anywhere beats failure anywhere, and
//! failure beats duplicate-only noise.

use gp2gp_config::ProtocolConfig;
use gp2gp_core::Message;

use crate::pairing::AcknowledgedMessage;

/// Whether the effective acknowledgment integrated the record or rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConclusionKind {
    Integrated,
    Failed,
}

/// The authoritative (delivery, acknowledgment) pair of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConclusion<'a> {
    pub kind: ConclusionKind,
    pub delivery: &'a AcknowledgedMessage,
    pub acknowledgment: &'a Message,
}

/// Select the effective conclusion among core-record delivery candidates.
///
/// 1. The first successful acknowledgment (no error, or the suppressed code).
/// 2. Otherwise the first acknowledgment with an error that is not the duplicate code.
/// 3. Otherwise none: the conversation is still pending.
///
/// "First" means candidate order, then acknowledgment order within a candidate.
pub fn select_effective_conclusion<'a>(
    candidates: &'a [AcknowledgedMessage],
    protocol: &ProtocolConfig,
) -> Option<EffectiveConclusion<'a>> {
    first_matching(candidates, ConclusionKind::Integrated, |code| protocol.is_successful(code))
        .or_else(|| {
            first_matching(candidates, ConclusionKind::Failed, |code| protocol.is_final_error(code))
        })
}

fn first_matching<'a>(
    candidates: &'a [AcknowledgedMessage],
    kind: ConclusionKind,
    accept: impl Fn(Option<u32>) -> bool,
) -> Option<EffectiveConclusion<'a>> {
    candidates.iter().find_map(|delivery| {
        delivery
            .acknowledgments
            .iter()
            .find(|ack| accept(ack.error_code))
            .map(|acknowledgment| EffectiveConclusion {
                kind,
                delivery,
                acknowledgment,
            })
    })
}
