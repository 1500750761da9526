//! # IBUS Protocol Module
//!
//! Implementation of the FlySky IBUS servo protocol (transmit side).
//!
//! This module handles:
//! - Channel value clamping and storage (14 channels, 1000-2000 µs range)
//! - Frame encoding into a fixed 32-byte buffer (header + LE16 channels)
//! - Running-subtraction checksum calculation
//!
//! Decoding incoming IBUS frames is out of scope; this crate only transmits.

pub mod protocol;
pub mod checksum;
pub mod channels;
pub mod encoder;
