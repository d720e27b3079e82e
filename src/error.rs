//! Error taxonomy. All variants are eager validation failures raised at the
//! boundary where the bad input is first observed.

use thiserror::Error;

/// Errors returned by the vector engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed construction parameter (non-positive k, empty name, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Vector length mismatch in a binary op or dense initialiser.
    #[error("shape mismatch: expected length {expected}, got {got}")]
    InvalidShape { expected: u64, got: u64 },
    /// Cell access or decode outside valid bounds.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: u64, len: u64 },
    /// The alphabet provider violated its contract.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// `num_states^k` (or a dense materialization of it) is not representable.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}
