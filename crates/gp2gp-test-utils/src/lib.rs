// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for GP2GP transfer tests.
//!
//! # Components
//!
//! - [`MessageBuilder`] - Single message with sensible defaults
//! - [`ConversationFixture`] - Whole conversations written as a timeline of offsets
//! - [`RecordingObserver`] - Captures warnings for assertion

pub mod fixture;
pub mod recorder;

pub use fixture::{t0, ConversationFixture, MessageBuilder, REQUESTER, SENDER};
pub use recorder::{RecordedWarning, RecordingObserver};
