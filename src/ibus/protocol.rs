//! # IBUS Protocol Constants and Types
//!
//! Core protocol definitions for the IBUS servo frame.

/// IBUS frame header, first byte (frame length marker, always 0x20)
pub const IBUS_HEADER_1: u8 = 0x20;

/// IBUS frame header, second byte (command marker, always 0x40)
pub const IBUS_HEADER_2: u8 = 0x40;

/// Total frame size in bytes
/// Frame structure: header(2) + channels(14 × 2) + checksum(2)
pub const IBUS_FRAME_LENGTH: usize = 32;

/// Number of RC channels carried per frame
pub const IBUS_NUM_CHANNELS: usize = 14;

/// Byte offset of the first channel value
pub const IBUS_CHANNEL_OFFSET: usize = 2;

/// Byte offset of the 16-bit checksum (last two bytes of the frame)
pub const IBUS_CHECKSUM_OFFSET: usize = IBUS_FRAME_LENGTH - 2;

/// Channel value range (standard RC servo pulse widths, microseconds)
pub const IBUS_CHANNEL_VALUE_MIN: u16 = 1000;
pub const IBUS_CHANNEL_VALUE_MAX: u16 = 2000;
pub const IBUS_CHANNEL_VALUE_CENTER: u16 = 1500;

/// Minimum broadcast period in milliseconds
///
/// IBUS receivers expect a frame roughly every 7ms; anything faster only
/// burns CPU without the far end keeping up.
pub const IBUS_MIN_INTERVAL_MS: u64 = 7;

/// Channel values array type (14 channels, microsecond values)
pub type ChannelValues = [u16; IBUS_NUM_CHANNELS];

/// IBUS frame buffer type (fixed 32 bytes)
pub type FrameBuffer = [u8; IBUS_FRAME_LENGTH];
