//! LoraLink Frame - wire layout, encoding, and structural validation
//!
//! This crate owns the on-air byte layout of a LoraLink message and the
//! two halves of the codec: building a frame from an application payload
//! and picking a received buffer apart into header fields and payload.
//! CRC and key validation belong to the session layer, which runs them
//! against the same buffer this crate decoded.

pub mod wire;

pub use loralink_core::{LinkError, Result};
pub use wire::{decode, encode, FrameBuffer, ParsedFrame};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::wire::{
        decode, encode, FrameBuffer, ParsedFrame, API_VERSION, HEADER_LEN, MAX_FRAME_LEN,
        MAX_PAYLOAD, MIN_FRAME_LEN,
    };
    pub use loralink_core::{LinkError, Result};
}
