//! Error types for yggdrasil

use thiserror::Error;

/// Result type alias for yggdrasil operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in yggdrasil operations
///
/// Verification over untrusted proof data never produces an error: a
/// malformed proof degrades to a `false` verdict. The variants here
/// indicate caller misuse.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("leaf not found: {0}")]
    LeafNotFound(String),

    #[error("invalid hex digest: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
