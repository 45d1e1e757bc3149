//! Transport error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("osc decode error: {0}")]
    Decode(String),

    #[error("osc encode error: {0}")]
    Encode(String),

    #[error("listener already stopped")]
    AlreadyStopped,

    #[error("transport error: {0}")]
    Other(String),
}

impl From<rosc::OscError> for TransportError {
    fn from(e: rosc::OscError) -> Self {
        TransportError::Decode(format!("{:?}", e))
    }
}
