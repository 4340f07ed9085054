//! Error taxonomy shared by every stage of the decode pipeline.
//!
//! The container carries no authentication tag, so a wrong key or a damaged
//! ciphertext is never reported as a crypto failure. It surfaces as a
//! [`AsvrError::Format`] once decompression rejects the garbage, or not at all
//! when the garbage happens to inflate.

use thiserror::Error;

pub use crate::transport::TransportError;

/// Errors that can occur while opening, decoding or rendering a container
#[derive(Error, Debug)]
pub enum AsvrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Invalid format: {0}")]
    Format(String),
    #[error("Frame index {index} out of range (frame count {count})")]
    FrameOutOfRange { index: u64, count: u32 },
    #[error("Byte range {offset}+{len} exceeds container length {available}")]
    ByteRange { offset: u64, len: u64, available: u64 },
    #[error("Key derivation parameters rejected: {0}")]
    CryptoConfig(String),
    #[error("Missing key material: {0}")]
    MissingKeyMaterial(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Worker task failed: {0}")]
    Worker(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, AsvrError>;

impl AsvrError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// True for malformed data: bad compression, bad tables, truncation.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// True for out-of-bounds frame indices and byte ranges.
    pub fn is_range(&self) -> bool {
        match self {
            Self::FrameOutOfRange { .. } | Self::ByteRange { .. } => true,
            Self::Transport(TransportError::OutOfRange { .. }) => true,
            _ => false,
        }
    }
}
