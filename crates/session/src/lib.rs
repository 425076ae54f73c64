//! LoraLink Session - message orchestration over a half-duplex radio
//!
//! The session owns the shared key and the device's own address, and
//! drives the codec: decode, CRC check, key check, and address
//! resolution on receive; encode, CRC, transmit, and receive-mode
//! restore on send. The radio itself sits behind the [`RadioTransport`]
//! trait.
//!
//! [`RadioTransport`]: transport::RadioTransport

pub mod session;
pub mod transport;

pub use loralink_core::{LinkError, Result};
pub use session::{MessageSession, RxMessage, TxMessage};
pub use transport::{Poll, RadioTransport};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::session::{MessageSession, RxMessage, TxMessage};
    pub use crate::transport::{Poll, RadioTransport};
    pub use loralink_core::{
        address::{Location, ModuleTable},
        LinkError, Result,
    };
    pub use loralink_frame::wire::FrameBuffer;
}
