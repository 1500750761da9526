//! # IBUS TX Library
//!
//! Encode and periodically broadcast FlySky IBUS RC channel frames.
//!
//! This library builds fixed 32-byte IBUS frames carrying up to 14 RC-servo
//! channel values (1000-2000 µs pulse-width convention) and fans them out to
//! registered listeners on a periodic timer. The physical transport (serial
//! port, radio module) is left to the caller: listeners receive the raw frame
//! bytes and decide where they go.

pub mod config;
pub mod error;
pub mod ibus;
pub mod broadcast;
