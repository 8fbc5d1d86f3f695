// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for GP2GP transfer classification.
//!
//! This crate provides the message and transfer data model, the closed
//! status/failure-reason enumerations, the error type, and the observer
//! trait the engine reports data-quality warnings through.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::Gp2gpError;
pub use traits::TransferObserver;
pub use types::{
    InteractionKind, Message, Transfer, TransferFailureReason, TransferOutcome, TransferStatus,
};
