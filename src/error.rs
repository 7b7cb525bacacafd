// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared across the engine.
//!
//! "No readings for this user" is deliberately not represented here: absence
//! of data is a legitimate no-signal state, and the aggregator and condition
//! evaluators express it with `Option`/`false` instead of an error.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed rule, schedule, or condition configuration. Rules failing
    /// here are skipped with a logged reason and never reach the evaluator.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Delivery-record or other store write/read failure. A delivery whose
    /// record could not be persisted was not delivered.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Template render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AppError>;
