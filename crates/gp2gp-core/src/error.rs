// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for GP2GP transfer classification.

use thiserror::Error;

/// The primary error type used across the engine, config loading, and the CLI.
#[derive(Debug, Error)]
pub enum Gp2gpError {
    /// The first message of a conversation is not a request-started message.
    ///
    /// Fatal for that one conversation only; batch callers skip it and continue.
    #[error("conversation {conversation_id} does not begin with a request-started message")]
    ConversationMissingStart { conversation_id: String },

    /// A line of the input message log could not be decoded.
    #[error("invalid input on line {line}: {message}")]
    Input { line: usize, message: String },

    /// Reading input or writing output failed.
    #[error("i/o error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Gp2gpError {
    /// Whether this error only invalidates a single conversation rather than the batch.
    pub fn is_conversation_scoped(&self) -> bool {
        matches!(self, Gp2gpError::ConversationMissingStart { .. })
    }
}
