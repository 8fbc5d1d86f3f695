// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message correlation and outcome classification for GP2GP record transfers.
//!
//! This crate provides:
//! - [`group_into_conversations`]: bucket and time-order raw messages, with an optional cutoff
//! - [`pair_acknowledgments`]: attach acknowledgments to the messages they reference
//! - [`Gp2gpConversation`]: messages sorted into protocol roles
//! - [`select_effective_conclusion`]: the authoritative acknowledgment among retransmissions
//! - [`OutcomeClassifier`]: the ordered outcome decision procedure
//! - [`calculate_sla`]: delivery-to-acknowledgment duration, clamped at zero
//! - [`TransferPipeline`]: all of the above wired together per batch
//!
//! Warnings flow through a [`gp2gp_core::TransferObserver`]; [`TracingObserver`]
//! is the production implementation.

pub mod assembler;
pub mod grouper;
pub mod observer;
pub mod outcome;
pub mod pairing;
pub mod pipeline;
pub mod roles;
pub mod selector;
pub mod sla;

pub use assembler::assemble_transfer;
pub use grouper::{group_into_conversations, Conversation};
pub use observer::TracingObserver;
pub use outcome::OutcomeClassifier;
pub use pairing::{pair_acknowledgments, AcknowledgedMessage};
pub use pipeline::TransferPipeline;
pub use roles::{message_role, Gp2gpConversation, MessageRole};
pub use selector::{select_effective_conclusion, ConclusionKind, EffectiveConclusion};
pub use sla::calculate_sla;
