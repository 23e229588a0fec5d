//! Error types for Solace.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolaceError {
    /// Any generation-backend failure: network, timeout, malformed output,
    /// missing fields. All variants of "capability unavailable for this
    /// call" - the orchestrator treats them uniformly and falls back.
    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
