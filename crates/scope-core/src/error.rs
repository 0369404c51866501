//! Error handling for the scope pipeline
//!
//! A producer fault must never crash the consumer side: acquisition
//! failures close the frame channel instead of propagating across it,
//! and a closed channel is ordinary end-of-stream, not an error.

use std::fmt;

/// Result type alias for scope pipeline operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Error type for all scope pipeline operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScopeError {
    /// Driver read failure; fatal to the acquisition task
    AcquisitionFault {
        /// Description of the hardware/link failure
        reason: String,
    },

    /// Configuration arithmetic that must be integral is not
    ConfigInvariant {
        /// Which derived quantity failed the check
        quantity: &'static str,
        /// The offending non-integer value
        value: f64,
    },

    /// Invalid pipeline configuration value
    InvalidConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// Filter design rejected at construction
    FilterDesign {
        /// Description of the design failure
        reason: String,
        /// Corner or notch frequency in Hz
        frequency: f32,
        /// Sampling rate the design was attempted for
        sample_rate: f32,
    },

    /// Frame shape does not match the configured channel layout
    ShapeMismatch {
        /// Expected channel count
        expected_channels: usize,
        /// Channel count found in the frame
        actual_channels: usize,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::AcquisitionFault { reason } => {
                write!(f, "Acquisition fault: {}", reason)
            }
            ScopeError::ConfigInvariant { quantity, value } => {
                write!(f, "Configuration invariant violated: {} = {} is not an integer",
                       quantity, value)
            }
            ScopeError::InvalidConfig { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
            ScopeError::FilterDesign { reason, frequency, sample_rate } => {
                write!(f, "Filter design failed at {}Hz (fs = {}Hz): {}",
                       frequency, sample_rate, reason)
            }
            ScopeError::ShapeMismatch { expected_channels, actual_channels } => {
                write!(f, "Frame shape mismatch: expected {} channels, got {}",
                       expected_channels, actual_channels)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ScopeError::ShapeMismatch {
            expected_channels: 2,
            actual_channels: 8,
        };
        let display = format!("{}", error);
        assert!(display.contains("Frame shape mismatch"));
        assert!(display.contains("2"));
        assert!(display.contains("8"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = ScopeError::ConfigInvariant {
            quantity: "window_len",
            value: 2800.5,
        };
        let error2 = ScopeError::ConfigInvariant {
            quantity: "window_len",
            value: 2800.5,
        };
        assert_eq!(error1, error2);
    }
}
