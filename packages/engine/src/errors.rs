//! Error types for engine calls

use thiserror::Error;

/// Failures reported by the authoritative engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A constructor was given malformed input. Fatal to that load attempt
    /// only; the caller keeps whatever state it had before.
    #[error("decode error: {0}")]
    Decode(String),

    /// A mutator was given a nonexistent node id or an invalid field value.
    /// The engine may have partially applied the operation; the caller does
    /// not roll back.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}
