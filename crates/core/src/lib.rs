//! LoraLink Core - addressing, CRC, and error taxonomy
//!
//! This crate provides the leaf pieces of the LoraLink messaging codec:
//! the module address model and resolver, the table-driven CRC-8 engine,
//! and the shared error taxonomy.

pub mod address;
pub mod crc;
pub mod error;

pub use error::{LinkError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        address::{Location, ModuleTable, MAX_MODULES},
        crc::crc8,
        error::{LinkError, Result},
    };
}
