//! # IBUS Frame Encoder
//!
//! Serializes channel values into the fixed 32-byte IBUS frame.

use super::channels::ChannelStore;
use super::checksum::checksum;
use super::protocol::*;

/// Encoder owning the persistent frame buffer
///
/// The 32-byte buffer is allocated once and mutated in place on every
/// [`encode`](FrameEncoder::encode) call rather than rebuilt, so listeners
/// holding the delivered bytes across ticks will observe later mutations.
/// Callers needing a stable snapshot must copy the buffer themselves.
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    buffer: FrameBuffer,
}

impl FrameEncoder {
    /// Create an encoder with header bytes written and all payload bytes zero
    ///
    /// Callers are expected to run a full encode before the first frame is
    /// handed out (the broadcaster does this at construction).
    pub fn new() -> Self {
        let mut buffer = [0u8; IBUS_FRAME_LENGTH];
        buffer[0] = IBUS_HEADER_1;
        buffer[1] = IBUS_HEADER_2;
        Self { buffer }
    }

    /// Encode the leading `limit` channels into the frame buffer
    ///
    /// Header bytes are rewritten unconditionally. Each channel `i < limit`
    /// is written little-endian at byte offset `2 + 2*i`; channels at
    /// `i >= limit` keep whatever bytes the previous encode left, which lets
    /// callers skip rewriting channels that did not change.
    ///
    /// The checksum starts from `0xFFFF − 0x20 − 0x40` and subtracts both
    /// bytes of every channel below `limit`, wrapping as u16. Note that a
    /// partial encode therefore produces a checksum that ignores the stale
    /// higher-index channel bytes still present in the buffer; this mirrors
    /// the behavior of existing IBUS transmitter implementations and is kept
    /// as-is rather than silently corrected.
    ///
    /// # Arguments
    ///
    /// * `store` - Source of the current channel values
    /// * `limit` - Number of leading channels to rewrite (capped at 14)
    ///
    /// # Returns
    ///
    /// * `&FrameBuffer` - The shared 32-byte frame buffer
    pub fn encode(&mut self, store: &ChannelStore, limit: usize) -> &FrameBuffer {
        // A limit of 0 means "everything", so an empty update still yields a
        // frame whose checksum covers all 14 channels
        let limit = match limit {
            0 => IBUS_NUM_CHANNELS,
            n => n.min(IBUS_NUM_CHANNELS),
        };

        self.buffer[0] = IBUS_HEADER_1;
        self.buffer[1] = IBUS_HEADER_2;

        for (i, &value) in store.values()[..limit].iter().enumerate() {
            let offset = IBUS_CHANNEL_OFFSET + i * 2;
            self.buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }

        // Checksum reads the bytes back out of the buffer, low byte first
        let payload_end = IBUS_CHANNEL_OFFSET + limit * 2;
        let sum = checksum(&self.buffer[IBUS_CHANNEL_OFFSET..payload_end]);
        self.buffer[IBUS_CHECKSUM_OFFSET..].copy_from_slice(&sum.to_le_bytes());

        &self.buffer
    }

    /// The current frame buffer, reflecting the last encode
    pub fn frame(&self) -> &FrameBuffer {
        &self.buffer
    }
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibus::checksum::CHECKSUM_INITIAL;

    fn decode_channel(frame: &FrameBuffer, i: usize) -> u16 {
        let offset = IBUS_CHANNEL_OFFSET + i * 2;
        u16::from_le_bytes([frame[offset], frame[offset + 1]])
    }

    fn expected_checksum(frame: &FrameBuffer, limit: usize) -> u16 {
        let mut sum = CHECKSUM_INITIAL;
        for &byte in &frame[IBUS_CHANNEL_OFFSET..IBUS_CHANNEL_OFFSET + limit * 2] {
            sum = sum.wrapping_sub(byte as u16);
        }
        sum
    }

    #[test]
    fn test_header_bytes() {
        let mut encoder = FrameEncoder::new();
        let store = ChannelStore::new(1000, 2000, 1500);
        let frame = encoder.encode(&store, IBUS_NUM_CHANNELS);
        assert_eq!(frame[0], 0x20);
        assert_eq!(frame[1], 0x40);
        assert_eq!(frame.len(), 32);
    }

    #[test]
    fn test_full_encode_round_trip() {
        let mut store = ChannelStore::new(1000, 2000, 1500);
        let input: Vec<u16> = (0..14).map(|i| 1000 + i * 70).collect();
        store.set_all(&input);

        let mut encoder = FrameEncoder::new();
        let frame = *encoder.encode(&store, IBUS_NUM_CHANNELS);

        for (i, &expected) in input.iter().enumerate() {
            assert_eq!(decode_channel(&frame, i), expected, "channel {}", i);
        }
    }

    #[test]
    fn test_checksum_formula() {
        let mut store = ChannelStore::new(1000, 2000, 1500);
        store.set_all(&[1000, 2000, 1234]);

        let mut encoder = FrameEncoder::new();
        let frame = *encoder.encode(&store, IBUS_NUM_CHANNELS);

        let stored = u16::from_le_bytes([frame[30], frame[31]]);
        assert_eq!(stored, expected_checksum(&frame, IBUS_NUM_CHANNELS));
    }

    #[test]
    fn test_partial_encode_leaves_higher_channels() {
        let mut store = ChannelStore::new(1000, 2000, 1500);
        store.set_all(&[1200u16; 14]);

        let mut encoder = FrameEncoder::new();
        encoder.encode(&store, IBUS_NUM_CHANNELS);

        // Only channel 0 changes; channels 1..14 must keep their prior bytes
        store.set_one(0, 1999).unwrap();
        store.set_one(5, 1001).unwrap(); // stored but not re-encoded below
        let frame = *encoder.encode(&store, 1);

        assert_eq!(decode_channel(&frame, 0), 1999);
        assert_eq!(decode_channel(&frame, 5), 1200);
        for i in 1..14 {
            if i != 5 {
                assert_eq!(decode_channel(&frame, i), 1200, "channel {}", i);
            }
        }
    }

    #[test]
    fn test_partial_encode_checksum_covers_only_limit() {
        let mut store = ChannelStore::new(1000, 2000, 1500);
        store.set_all(&[1500u16; 14]);

        let mut encoder = FrameEncoder::new();
        let frame = *encoder.encode(&store, 2);

        let stored = u16::from_le_bytes([frame[30], frame[31]]);
        assert_eq!(stored, expected_checksum(&frame, 2));
    }

    #[test]
    fn test_encode_limit_capped_at_channel_count() {
        let store = ChannelStore::new(1000, 2000, 1500);
        let mut encoder = FrameEncoder::new();
        // Must not panic or read past channel 13
        let frame = *encoder.encode(&store, 100);
        assert_eq!(decode_channel(&frame, 13), 1500);
    }

    #[test]
    fn test_encode_limit_zero_means_full() {
        let mut store = ChannelStore::new(1000, 2000, 1500);
        store.set_all(&[1800u16; 14]);

        let mut encoder = FrameEncoder::new();
        let frame = *encoder.encode(&store, 0);

        for i in 0..14 {
            assert_eq!(decode_channel(&frame, i), 1800);
        }
        let stored = u16::from_le_bytes([frame[30], frame[31]]);
        assert_eq!(stored, expected_checksum(&frame, IBUS_NUM_CHANNELS));
    }

    #[test]
    fn test_partial_update_against_defaults() {
        // update([1000, 2000, 1500]) against defaults: bytes 2-7 carry the
        // inputs, bytes 8-29 stay at the 1500 default, checksum matches
        let mut store = ChannelStore::new(1000, 2000, 1500);
        let written = store.set_all(&[1000, 2000, 1500]);

        let mut encoder = FrameEncoder::new();
        encoder.encode(&store, IBUS_NUM_CHANNELS);
        let frame = *encoder.encode(&store, written);

        assert_eq!(decode_channel(&frame, 0), 1000);
        assert_eq!(decode_channel(&frame, 1), 2000);
        assert_eq!(decode_channel(&frame, 2), 1500);
        for i in 3..14 {
            assert_eq!(decode_channel(&frame, i), 1500);
        }

        let stored = u16::from_le_bytes([frame[30], frame[31]]);
        assert_eq!(stored, expected_checksum(&frame, written));
    }
}
