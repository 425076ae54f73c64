//! Error types shared across the LoraLink crates

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Link-level error taxonomy.
///
/// One active cause per send or receive call; when several checks could
/// fail, the first detected wins in the session's validation order
/// (structural, then CRC, then key). A clean call maps to `Ok`/`None`
/// rather than a dedicated no-error variant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkError {
    #[error("CRC mismatch")]
    Crc,

    #[error("Invalid frame header")]
    InvalidHeader,

    #[error("Payload exceeds maximum message length")]
    ArraySize,

    #[error("More than one frame in a single receive buffer")]
    DoubleFrame,

    #[error("Buffer shorter than one frame")]
    Sizing,

    #[error("Key mismatch")]
    Key,

    #[error("Transport hardware failure")]
    Hw,

    #[error("Transport timeout")]
    Timeout,

    #[error("Failed to enter continuous-receive mode")]
    Init,
}

/// Result type for LoraLink operations
pub type Result<T> = std::result::Result<T, LinkError>;
