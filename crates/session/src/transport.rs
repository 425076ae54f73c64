//! Radio transport contract
//!
//! The physical link (SPI bring-up, mode switching, the actual radio
//! send/receive primitives) lives behind this trait. The session only
//! assumes a half-duplex device that must be put back into
//! continuous-receive mode after every transmission.

use loralink_core::{LinkError, Result};
use loralink_frame::wire::FrameBuffer;

/// Outcome of one non-blocking receive poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Nothing pending.
    Empty,
    /// One buffer received; the value is the number of bytes written
    /// into the caller's [`FrameBuffer`] storage.
    Frame(usize),
    /// The radio reported a failure while polling. Carries
    /// [`LinkError::Hw`] or [`LinkError::Timeout`].
    Failed(LinkError),
}

/// A half-duplex point-to-point radio.
pub trait RadioTransport {
    /// Poll for one received buffer without blocking. On
    /// [`Poll::Frame`] the implementation has filled `buf`'s storage
    /// from offset zero.
    fn poll(&mut self, buf: &mut FrameBuffer) -> Poll;

    /// Transmit one encoded frame. Blocks only as long as the radio's
    /// own send primitive does.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Put the radio back into continuous-receive mode. Returns
    /// whether the mode switch took.
    fn enter_continuous_receive(&mut self) -> bool;
}
