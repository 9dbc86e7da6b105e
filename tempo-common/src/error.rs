//! Common error types for the tempo playback pipeline
//!
//! Defines the single playback-fatal error type using thiserror. Everything
//! that goes wrong inside the pipeline surfaces to the controlling loop as
//! one of these variants; the pipeline itself never retries.

use thiserror::Error;

/// Common result type for tempo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared across the tempo crates
///
/// Two families of failures flow through here:
/// - `InvalidState` is a contract violation: the caller drove a component
///   through an illegal transition. Not recoverable; indicates a bug in the
///   coordination logic rather than a runtime media condition.
/// - The remaining variants are media/runtime failures (upstream I/O,
///   decoder trouble, output trouble) that the controlling loop decides how
///   to handle.
#[derive(Error, Debug)]
pub enum Error {
    /// Operation called in a state where it is not legal
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Upstream sample source error (I/O failure, loader failure)
    #[error("Stream error: {0}")]
    Stream(String),

    /// Decoder failure surfaced by a renderer
    #[error("Decode error: {0}")]
    Decode(String),

    /// Downstream sink / output failure surfaced by a renderer
    #[error("Output error: {0}")]
    Output(String),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is a contract violation rather than a runtime
    /// media failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }
}
