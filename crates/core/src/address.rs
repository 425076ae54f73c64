//! Module addressing and resolution
//!
//! Every device on the link carries an 8-bit module address drawn from an
//! externally configured table. The table itself lives outside this codec;
//! only its size matters here, so `ModuleTable` reduces it to a count of
//! valid addresses. The top three byte values are reserved as sentinels
//! and can never name a configured module.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Highest number of configurable modules; addresses at or above this
/// value are sentinel bytes.
pub const MAX_MODULES: u8 = 0xFD;

/// Wire byte for [`Location::None`].
pub const NONE_BYTE: u8 = 0xFD;

/// Wire byte for [`Location::All`].
pub const ALL_BYTE: u8 = 0xFE;

/// Wire byte for [`Location::Invalid`].
pub const INVALID_BYTE: u8 = 0xFF;

/// A module address or one of the reserved sentinels.
///
/// Address resolution only ever produces `Module` or `Invalid`; `None`
/// and `All` exist for the application side (no destination yet,
/// broadcast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Address of a module in the configured table.
    Module(u8),
    /// No module.
    None,
    /// Every module on the link.
    All,
    /// Raw address outside the configured table.
    Invalid,
}

impl Location {
    /// The byte this location occupies in a frame's address fields.
    pub fn wire_byte(&self) -> u8 {
        match self {
            Location::Module(addr) => *addr,
            Location::None => NONE_BYTE,
            Location::All => ALL_BYTE,
            Location::Invalid => INVALID_BYTE,
        }
    }
}

/// The externally supplied enumeration of valid module addresses,
/// reduced to its count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTable {
    count: u8,
}

impl ModuleTable {
    /// Create a table of `count` modules with addresses `0..count`.
    ///
    /// Returns `None` when `count` would reach into the sentinel byte
    /// range.
    pub fn new(count: u8) -> Option<Self> {
        if count > MAX_MODULES {
            return None;
        }
        Some(Self { count })
    }

    /// Number of configured modules.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Map a raw address byte to a validated location.
    ///
    /// Identity for addresses inside the table, [`Location::Invalid`]
    /// for everything else, sentinels included.
    pub fn resolve(&self, raw: u8) -> Location {
        if raw < self.count {
            Location::Module(raw)
        } else {
            trace!(raw, "address outside module table");
            Location::Invalid
        }
    }
}
