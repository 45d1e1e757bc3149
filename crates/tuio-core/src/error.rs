//! Error types for TUIO decoding

use thiserror::Error;

/// Result type alias for TUIO core operations
pub type Result<T> = std::result::Result<T, Error>;

/// TUIO core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A positional argument required by the profile schema is absent
    #[error("missing argument at index {index}")]
    MissingArgument { index: usize },

    /// A positional argument has a type the schema cannot accept
    #[error("argument {index} is not {expected}")]
    ArgumentType { index: usize, expected: &'static str },

    /// Message was routed to a decoder for a different profile
    #[error("address mismatch: expected {expected}, got {actual}")]
    AddressMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Address is not one of the TUIO 1.1 profiles
    #[error("unknown TUIO address: {0}")]
    UnknownAddress(String),

    /// First argument is not a known command (set, alive, fseq, source)
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
