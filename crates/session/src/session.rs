//! Message session over a half-duplex radio
//!
//! One session per device. It owns the current shared key (volatile,
//! zero at start) and the device's own address, and runs the receive
//! validation chain in a fixed priority order: structural decode
//! failures first, then CRC, then key. Address resolution always runs,
//! so callers get best-effort address information even for rejected
//! frames.

use heapless::Vec as FixedVec;
use loralink_core::address::{Location, ModuleTable};
use loralink_core::crc::crc8;
use loralink_core::{LinkError, Result};
use loralink_frame::wire::{decode, encode, FrameBuffer, API_VERSION, HEADER_LEN, MAX_PAYLOAD};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::transport::{Poll, RadioTransport};

/// One received message, decoded and validated best-effort.
///
/// `valid` is true only when every check passed; a rejected frame still
/// carries its resolved addresses and payload for diagnostics, with the
/// first detected failure in `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxMessage {
    pub source: Location,
    pub destination: Location,
    pub payload: FixedVec<u8, MAX_PAYLOAD>,
    pub valid: bool,
    pub error: Option<LinkError>,
}

impl RxMessage {
    fn failed(error: LinkError) -> Self {
        Self {
            source: Location::None,
            destination: Location::None,
            payload: FixedVec::new(),
            valid: false,
            error: Some(error),
        }
    }

    /// Whether this message is meant for `me`, directly or by
    /// broadcast.
    pub fn addressed_to(&self, me: Location) -> bool {
        self.destination == me || self.destination == Location::All
    }
}

/// One outbound message. Lives for the duration of a single send call.
#[derive(Debug, Clone, Copy)]
pub struct TxMessage<'a> {
    pub destination: Location,
    pub payload: &'a [u8],
}

/// Messaging endpoint bound to one radio transport.
pub struct MessageSession<T: RadioTransport> {
    transport: T,
    key: u8,
    own_location: Location,
    modules: ModuleTable,
}

impl<T: RadioTransport> MessageSession<T> {
    /// Open a session: reset the key to zero and put the radio into
    /// continuous-receive mode.
    ///
    /// Fails with [`LinkError::Init`] when the mode switch does not
    /// take, leaving no half-initialized session behind.
    pub fn open(transport: T, own_location: Location, modules: ModuleTable) -> Result<Self> {
        let mut session = Self {
            transport,
            key: 0x00,
            own_location,
            modules,
        };
        if !session.transport.enter_continuous_receive() {
            return Err(LinkError::Init);
        }
        debug!(location = ?session.own_location, "session open");
        Ok(session)
    }

    /// The address this session stamps into the source field on send.
    pub fn own_location(&self) -> Location {
        self.own_location
    }

    /// Poll the transport once and decode whatever arrived.
    ///
    /// Returns `None` when nothing is pending. A transport failure
    /// comes back as an invalid message carrying [`LinkError::Hw`] or
    /// [`LinkError::Timeout`] with no decode attempted. Otherwise the
    /// buffer is decoded and validated: structural failures
    /// ([`LinkError::Sizing`], [`LinkError::InvalidHeader`]) abort
    /// validation, a trailing-bytes [`LinkError::DoubleFrame`] stays
    /// the reported error while the first frame is validated
    /// best-effort, and CRC takes priority over the key check.
    pub fn receive(&mut self) -> Option<RxMessage> {
        let mut buf = FrameBuffer::new();
        match self.transport.poll(&mut buf) {
            Poll::Empty => return None,
            Poll::Failed(error) => {
                warn!(%error, "transport poll failed");
                return Some(RxMessage::failed(error));
            }
            Poll::Frame(len) => buf.set_len(len),
        }

        let (frame, decode_error) = decode(&buf);
        let mut error = decode_error;

        let structural = matches!(
            decode_error,
            Some(LinkError::Sizing) | Some(LinkError::InvalidHeader)
        );
        if !structural {
            if frame.version != API_VERSION {
                // Forward-compatible pass-through; the nibble is not
                // enforced.
                debug!(version = frame.version, "frame version differs");
            }
            let crc_span = &buf.padded()[..HEADER_LEN + frame.size as usize];
            if frame.crc != crc8(crc_span) {
                error.get_or_insert(LinkError::Crc);
            } else if frame.key != self.key {
                error.get_or_insert(LinkError::Key);
            }
        }

        let message = RxMessage {
            source: self.modules.resolve(frame.source),
            destination: self.modules.resolve(frame.destination),
            payload: frame.payload,
            valid: error.is_none(),
            error,
        };
        match message.error {
            Some(error) => warn!(%error, source = ?message.source, "frame rejected"),
            None => debug!(source = ?message.source, len = message.payload.len(), "frame received"),
        }
        Some(message)
    }

    /// Encode and transmit one message under the current key, then put
    /// the radio back into continuous-receive mode.
    ///
    /// An oversized payload fails with [`LinkError::ArraySize`] before
    /// the transport is touched. The mode restore runs unconditionally;
    /// if it fails the call reports [`LinkError::Init`] even when the
    /// bytes already went out, because the device is left deaf.
    pub fn send(&mut self, msg: TxMessage<'_>) -> Result<()> {
        let buf = encode(msg.destination, self.own_location, msg.payload, self.key)?;

        let mut result = self.transport.send(buf.as_slice());
        if !self.transport.enter_continuous_receive() {
            warn!("failed to restore continuous receive after send");
            result = Err(LinkError::Init);
        }
        match &result {
            Ok(()) => debug!(destination = ?msg.destination, len = msg.payload.len(), "frame sent"),
            Err(error) => warn!(%error, "send failed"),
        }
        result
    }

    /// Replace the shared key. Takes effect on the next send or
    /// receive; frames already in flight under the old key will fail
    /// the key check.
    pub fn rekey(&mut self, new_key: u8) {
        self.key = new_key;
        debug!("key replaced");
    }
}
