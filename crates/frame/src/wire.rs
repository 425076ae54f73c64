//! Wire frame layout and codec
//!
//! On-air layout of one message, total length `size + 6`:
//!
//! | Offset     | Field                                     |
//! |------------|-------------------------------------------|
//! | 0          | destination                               |
//! | 1          | source                                    |
//! | 2          | reserved/pad                              |
//! | 3          | version (high nibble) / size (low nibble) |
//! | 4          | key                                       |
//! | 5..5+size  | payload                                   |
//! | 5+size     | CRC-8 over bytes `[0, 5+size)`            |
//!
//! Decoding is structural only: it checks that the buffer can hold a
//! frame and that the size nibble is sane, and flags trailing bytes as a
//! concatenated second frame. CRC and key verification run in the
//! session layer against the same buffer.

use heapless::Vec as FixedVec;
use loralink_core::address::Location;
use loralink_core::crc::crc8;
use loralink_core::{LinkError, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Frame format version carried in the high nibble of byte 3.
pub const API_VERSION: u8 = 1;

/// Maximum payload bytes per frame. The size nibble could express 15
/// but the link caps messages at 10.
pub const MAX_PAYLOAD: usize = 10;

/// Header bytes preceding the payload.
pub const HEADER_LEN: usize = 5;

/// Length of an empty-payload frame (header plus CRC).
pub const MIN_FRAME_LEN: usize = 6;

/// Largest frame the link can carry.
pub const MAX_FRAME_LEN: usize = MIN_FRAME_LEN + MAX_PAYLOAD;

const DEST_BYTE: usize = 0;
const SOURCE_BYTE: usize = 1;
const PAD_BYTE: usize = 2;
const VERSION_SIZE_BYTE: usize = 3;
const KEY_BYTE: usize = 4;
const DATA_START_BYTE: usize = 5;

const VERSION_SHIFT: u8 = 4;
const SIZE_MASK: u8 = 0x0F;

/// One raw frame as pulled off or handed to the radio.
///
/// Fixed 16-byte storage, zero-padded past `len`. Padding means a
/// truncated or corrupted frame decodes against zeros instead of
/// reading out of bounds, matching the zeroed stack buffers the link
/// has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl FrameBuffer {
    /// An empty buffer, ready for the transport to fill.
    pub fn new() -> Self {
        Self {
            bytes: [0; MAX_FRAME_LEN],
            len: 0,
        }
    }

    /// Wrap received bytes. Returns `None` if `data` exceeds the
    /// maximum frame length.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_LEN {
            return None;
        }
        let mut buf = Self::new();
        buf.bytes[..data.len()].copy_from_slice(data);
        buf.len = data.len();
        Some(buf)
    }

    /// The frame bytes actually received or encoded.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full zero-padded storage.
    pub fn padded(&self) -> &[u8; MAX_FRAME_LEN] {
        &self.bytes
    }

    /// Mutable access to the full storage, for the transport to fill.
    pub fn storage_mut(&mut self) -> &mut [u8; MAX_FRAME_LEN] {
        &mut self.bytes
    }

    /// Record how many bytes the transport wrote.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(MAX_FRAME_LEN);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Header fields and payload extracted from one received frame.
///
/// Address and key bytes are raw; resolution against the module table
/// happens in the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedFrame {
    pub destination: u8,
    pub source: u8,
    pub pad: u8,
    pub version: u8,
    pub size: u8,
    pub key: u8,
    pub payload: FixedVec<u8, MAX_PAYLOAD>,
    pub crc: u8,
}

/// Build the wire frame for one outbound message.
///
/// Fails with [`LinkError::ArraySize`] when the payload exceeds
/// [`MAX_PAYLOAD`]; every other input encodes.
pub fn encode(dest: Location, source: Location, payload: &[u8], key: u8) -> Result<FrameBuffer> {
    if payload.len() > MAX_PAYLOAD {
        return Err(LinkError::ArraySize);
    }

    let mut buf = FrameBuffer::new();
    let bytes = buf.storage_mut();
    bytes[DEST_BYTE] = dest.wire_byte();
    bytes[SOURCE_BYTE] = source.wire_byte();
    bytes[PAD_BYTE] = 0;
    bytes[VERSION_SIZE_BYTE] = (API_VERSION << VERSION_SHIFT) | payload.len() as u8;
    bytes[KEY_BYTE] = key;
    bytes[DATA_START_BYTE..DATA_START_BYTE + payload.len()].copy_from_slice(payload);

    let crc_index = DATA_START_BYTE + payload.len();
    bytes[crc_index] = crc8(&bytes[..crc_index]);
    buf.set_len(crc_index + 1);
    Ok(buf)
}

/// Pick a received buffer apart into header fields and payload.
///
/// Returns the frame together with the first structural error found,
/// if any:
///
/// - `Sizing` when the buffer cannot hold more than an empty frame
///   (strictly more than [`MIN_FRAME_LEN`] bytes are required); the
///   frame comes back zeroed.
/// - `InvalidHeader` when the size nibble exceeds [`MAX_PAYLOAD`];
///   header fields are extracted, payload and CRC are not.
/// - `DoubleFrame` when bytes trail past the frame end, meaning the
///   transport delivered two concatenated frames. The first frame's
///   content is still returned so the caller can validate it.
pub fn decode(raw: &FrameBuffer) -> (ParsedFrame, Option<LinkError>) {
    let mut frame = ParsedFrame::default();
    let len = raw.len();

    if len <= MIN_FRAME_LEN {
        trace!(len, "buffer shorter than one frame");
        return (frame, Some(LinkError::Sizing));
    }

    let bytes = raw.padded();
    frame.destination = bytes[DEST_BYTE];
    frame.source = bytes[SOURCE_BYTE];
    frame.pad = bytes[PAD_BYTE];
    frame.version = bytes[VERSION_SIZE_BYTE] >> VERSION_SHIFT;
    frame.size = bytes[VERSION_SIZE_BYTE] & SIZE_MASK;
    frame.key = bytes[KEY_BYTE];

    if frame.size as usize > MAX_PAYLOAD {
        trace!(size = frame.size, "size nibble exceeds maximum payload");
        return (frame, Some(LinkError::InvalidHeader));
    }

    // size <= 10 keeps both reads inside the padded storage.
    let crc_index = DATA_START_BYTE + frame.size as usize;
    frame.crc = bytes[crc_index];
    frame.payload =
        FixedVec::from_slice(&bytes[DATA_START_BYTE..crc_index]).unwrap_or_default();

    let error = if crc_index != len - 1 {
        trace!(crc_index, len, "trailing bytes past frame end");
        Some(LinkError::DoubleFrame)
    } else {
        None
    };
    (frame, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn frame_bytes(payload: &[u8], key: u8) -> FrameBuffer {
        encode(Location::Module(1), Location::Module(0), payload, key).unwrap()
    }

    #[test]
    fn encode_lays_out_header_and_crc() {
        let buf = frame_bytes(&[0xDE, 0xAD], 0x42);
        let bytes = buf.as_slice();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[0], 1); // destination
        assert_eq!(bytes[1], 0); // source
        assert_eq!(bytes[2], 0); // pad
        assert_eq!(bytes[3], (API_VERSION << 4) | 2);
        assert_eq!(bytes[4], 0x42);
        assert_eq!(&bytes[5..7], &[0xDE, 0xAD]);
        assert_eq!(bytes[7], crc8(&bytes[..7]));
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let payload = [0u8; MAX_PAYLOAD + 1];
        let result = encode(Location::Module(1), Location::Module(0), &payload, 0);
        assert_eq!(result.unwrap_err(), LinkError::ArraySize);
    }

    #[test]
    fn encode_accepts_maximum_payload() {
        let payload = [0xA5u8; MAX_PAYLOAD];
        let buf = frame_bytes(&payload, 0);
        assert_eq!(buf.len(), MAX_FRAME_LEN);
    }

    #[test]
    fn decode_round_trips_encoded_frames() {
        let payload = [1u8, 2, 3, 4, 5];
        let buf = frame_bytes(&payload, 0x17);
        let (frame, error) = decode(&buf);
        assert_eq!(error, None);
        assert_eq!(frame.destination, 1);
        assert_eq!(frame.source, 0);
        assert_eq!(frame.version, API_VERSION);
        assert_eq!(frame.size, payload.len() as u8);
        assert_eq!(frame.key, 0x17);
        assert_eq!(frame.payload.as_slice(), &payload);
        assert_eq!(frame.crc, buf.as_slice()[buf.len() - 1]);
    }

    #[quickcheck]
    fn round_trip_any_payload_and_key(payload: Vec<u8>, key: u8) -> bool {
        let payload = &payload[..payload.len().min(MAX_PAYLOAD)];
        let buf = frame_bytes(payload, key);
        let (frame, error) = decode(&buf);
        error.is_none()
            && frame.payload.as_slice() == payload
            && frame.key == key
            && frame.crc == crc8(&buf.padded()[..HEADER_LEN + payload.len()])
    }

    #[test]
    fn decode_rejects_exact_minimum_length() {
        // A well-formed empty-payload frame is exactly 6 bytes, but the
        // length gate is strict: it never parses on its own.
        let buf = frame_bytes(&[], 0);
        assert_eq!(buf.len(), MIN_FRAME_LEN);
        let (frame, error) = decode(&buf);
        assert_eq!(error, Some(LinkError::Sizing));
        assert_eq!(frame, ParsedFrame::default());
    }

    #[test]
    fn seven_byte_single_payload_frame_is_valid() {
        // Smallest frame the length gate accepts: one payload byte.
        let buf = frame_bytes(&[0x7E], 0);
        assert_eq!(buf.len(), 7);
        let (frame, error) = decode(&buf);
        assert_eq!(error, None);
        assert_eq!(frame.payload.as_slice(), &[0x7E]);
    }

    #[test]
    fn empty_frame_with_trailing_byte_decodes_as_double() {
        let empty = frame_bytes(&[], 0x33);
        let mut raw = empty.as_slice().to_vec();
        raw.push(0xAB);
        let buf = FrameBuffer::from_slice(&raw).unwrap();
        let (frame, error) = decode(&buf);
        assert_eq!(error, Some(LinkError::DoubleFrame));
        assert!(frame.payload.is_empty());
        assert_eq!(frame.key, 0x33);
        assert_eq!(frame.crc, empty.as_slice()[5]);
    }

    #[test]
    fn oversized_size_nibble_is_invalid_header() {
        // size nibble 12 with a short buffer: must fail cleanly without
        // touching payload or CRC.
        let raw = [0x01, 0x00, 0x00, (API_VERSION << 4) | 12, 0x00, 0x00, 0x00];
        let buf = FrameBuffer::from_slice(&raw).unwrap();
        let (frame, error) = decode(&buf);
        assert_eq!(error, Some(LinkError::InvalidHeader));
        assert_eq!(frame.size, 12);
        assert!(frame.payload.is_empty());
        assert_eq!(frame.crc, 0);
    }

    #[test]
    fn concatenated_frames_report_double_with_first_intact() {
        let first = frame_bytes(&[0x11], 0x05);
        let second = frame_bytes(&[0x22], 0x05);
        let mut raw = first.as_slice().to_vec();
        raw.extend_from_slice(second.as_slice());
        let buf = FrameBuffer::from_slice(&raw).unwrap();
        let (frame, error) = decode(&buf);
        assert_eq!(error, Some(LinkError::DoubleFrame));
        assert_eq!(frame.payload.as_slice(), &[0x11]);
        assert_eq!(frame.key, 0x05);
        assert_eq!(frame.crc, first.as_slice()[6]);
    }

    #[test]
    fn from_slice_rejects_overlong_buffers() {
        let raw = [0u8; MAX_FRAME_LEN + 1];
        assert!(FrameBuffer::from_slice(&raw).is_none());
    }
}
