//! # Channel Storage
//!
//! Clamping and storage for the 14 IBUS channel values.

use super::protocol::{ChannelValues, IBUS_NUM_CHANNELS};
use crate::error::{IbusError, Result};

/// Clamp a raw channel value into the configured range
///
/// Values below `min` return `min`, values above `max` return `max`,
/// everything else passes through unchanged. Out-of-range input is a policy
/// decision, not an error: IBUS receivers expect protocol-safe pulse widths,
/// so the transmitter silently coerces rather than rejecting.
///
/// # Examples
///
/// ```
/// use ibus_tx::ibus::channels::clamp;
///
/// assert_eq!(clamp(500, 1000, 2000), 1000);
/// assert_eq!(clamp(1500, 1000, 2000), 1500);
/// assert_eq!(clamp(9000, 1000, 2000), 2000);
/// ```
pub fn clamp(value: u16, min: u16, max: u16) -> u16 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Current value of each of the 14 IBUS channels
///
/// All writes go through [`clamp`], so the stored values are always within
/// the configured `[min, max]` range.
#[derive(Debug, Clone)]
pub struct ChannelStore {
    /// Channel values, index is the channel identity (0-13)
    values: ChannelValues,
    /// Lower clamp bound (µs)
    min_value: u16,
    /// Upper clamp bound (µs)
    max_value: u16,
}

impl ChannelStore {
    /// Create a store with every channel at `default_value`
    pub fn new(min_value: u16, max_value: u16, default_value: u16) -> Self {
        Self {
            values: [clamp(default_value, min_value, max_value); IBUS_NUM_CHANNELS],
            min_value,
            max_value,
        }
    }

    /// Store clamped values for the leading channels
    ///
    /// Position `i` of `values` is clamped and written to channel `i`.
    /// Channels beyond the slice keep their previous value. Extra input past
    /// channel 13 is ignored.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of channels written, used by the encoder to limit
    ///   how much of the frame it rewrites
    pub fn set_all(&mut self, values: &[u16]) -> usize {
        let count = values.len().min(IBUS_NUM_CHANNELS);
        for (i, &value) in values[..count].iter().enumerate() {
            self.values[i] = clamp(value, self.min_value, self.max_value);
        }
        count
    }

    /// Store a clamped value for a single channel
    ///
    /// # Errors
    ///
    /// Returns [`IbusError::ChannelOutOfBounds`] for `index >= 14`; no
    /// channel is mutated on failure.
    pub fn set_one(&mut self, index: usize, value: u16) -> Result<()> {
        if index >= IBUS_NUM_CHANNELS {
            return Err(IbusError::ChannelOutOfBounds { index });
        }

        self.values[index] = clamp(value, self.min_value, self.max_value);
        Ok(())
    }

    /// Read-only snapshot of all 14 channel values
    pub fn values(&self) -> &ChannelValues {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ChannelStore {
        ChannelStore::new(1000, 2000, 1500)
    }

    #[test]
    fn test_clamp_in_range_passes_through() {
        for v in [1000, 1001, 1500, 1999, 2000] {
            assert_eq!(clamp(v, 1000, 2000), v);
        }
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp(0, 1000, 2000), 1000);
        assert_eq!(clamp(999, 1000, 2000), 1000);
        assert_eq!(clamp(2001, 1000, 2000), 2000);
        assert_eq!(clamp(u16::MAX, 1000, 2000), 2000);
    }

    #[test]
    fn test_new_initializes_to_default() {
        let store = store();
        assert_eq!(store.values(), &[1500u16; 14]);
    }

    #[test]
    fn test_set_all_partial_keeps_remaining() {
        let mut store = store();
        let written = store.set_all(&[1000, 2000, 1750]);
        assert_eq!(written, 3);
        assert_eq!(&store.values()[..3], &[1000, 2000, 1750]);
        assert_eq!(&store.values()[3..], &[1500u16; 11]);
    }

    #[test]
    fn test_set_all_clamps_inputs() {
        let mut store = store();
        store.set_all(&[0, 65535]);
        assert_eq!(store.values()[0], 1000);
        assert_eq!(store.values()[1], 2000);
    }

    #[test]
    fn test_set_all_ignores_extra_channels() {
        let mut store = store();
        let written = store.set_all(&[1200u16; 20]);
        assert_eq!(written, 14);
        assert_eq!(store.values(), &[1200u16; 14]);
    }

    #[test]
    fn test_set_one() {
        let mut store = store();
        store.set_one(13, 1800).unwrap();
        assert_eq!(store.values()[13], 1800);

        store.set_one(0, 100).unwrap();
        assert_eq!(store.values()[0], 1000); // clamped
    }

    #[test]
    fn test_set_one_out_of_bounds_no_mutation() {
        let mut store = store();
        let err = store.set_one(14, 1800).unwrap_err();
        assert!(matches!(err, IbusError::ChannelOutOfBounds { index: 14 }));
        assert_eq!(store.values(), &[1500u16; 14]);
    }
}
