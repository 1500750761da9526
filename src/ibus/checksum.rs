//! # IBUS Checksum Implementation
//!
//! Running-subtraction checksum for IBUS frames.
//!
//! **Formula**: `0xFFFF − Σ(covered bytes)`, truncated to 16 bits with
//! unsigned wraparound. The two header bytes (0x20, 0x40) are always covered,
//! which is why the initial value starts below 0xFFFF.

use super::protocol::{IBUS_HEADER_1, IBUS_HEADER_2};

/// Checksum starting value with both header bytes already subtracted
pub const CHECKSUM_INITIAL: u16 = 0xFFFF - IBUS_HEADER_1 as u16 - IBUS_HEADER_2 as u16;

/// Calculate the IBUS checksum over a slice of channel payload bytes
///
/// Starts from [`CHECKSUM_INITIAL`] (header bytes pre-subtracted) and
/// subtracts every byte of `payload` with 16-bit wraparound. The subtraction
/// may conceptually go negative; it wraps rather than clamps.
///
/// # Arguments
///
/// * `payload` - Channel payload bytes to cover (low byte then high byte per channel)
///
/// # Returns
///
/// * `u16` - Checksum to be written little-endian into the last two frame bytes
pub fn checksum(payload: &[u8]) -> u16 {
    payload
        .iter()
        .fold(CHECKSUM_INITIAL, |sum, &byte| sum.wrapping_sub(byte as u16))
}
