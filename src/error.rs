//! # Error Types
//!
//! Custom error types for IBUS TX using `thiserror`.

use thiserror::Error;

/// Main error type for IBUS TX
#[derive(Debug, Error)]
pub enum IbusError {
    /// Channel index outside the 14-channel range
    #[error("channel index {index} out of bounds, must be between 0 and 13")]
    ChannelOutOfBounds {
        /// The rejected index
        index: usize,
    },

    /// Listener registration attempted while at capacity
    #[error("max listeners ({max}) reached on IBUS broadcaster, check for a listener leak")]
    MaxListenersExceeded {
        /// The configured listener capacity
        max: usize,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for IBUS TX
pub type Result<T> = std::result::Result<T, IbusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message_names_index() {
        let err = IbusError::ChannelOutOfBounds { index: 14 };
        let msg = err.to_string();
        assert!(msg.contains("14"));
        assert!(msg.contains("0 and 13"));
    }

    #[test]
    fn test_max_listeners_message_names_capacity() {
        let err = IbusError::MaxListenersExceeded { max: 10 };
        assert!(err.to_string().contains("10"));
    }
}
