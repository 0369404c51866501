//! SampleFrame: one hardware-rate block of multi-channel samples

use crate::error::{ScopeError, ScopeResult};

/// One block of raw samples as read from the driver boundary.
///
/// Channel-major layout: all samples of channel 0, then channel 1, and
/// so on. Immutable after creation; ownership moves into the frame
/// channel on send.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFrame {
    /// Sample data, channel-major
    data: Vec<f32>,
    /// Number of channels in this frame
    channel_count: usize,
    /// Samples per channel in this frame
    samples_per_channel: usize,
    /// Monotonic arrival timestamp in microseconds
    pub timestamp_us: u64,
}

impl SampleFrame {
    /// Create a new frame, validating that the data length matches the
    /// declared channel layout.
    pub fn new(
        data: Vec<f32>,
        channel_count: usize,
        timestamp_us: u64,
    ) -> ScopeResult<Self> {
        if channel_count == 0 {
            return Err(ScopeError::InvalidConfig {
                reason: "frame must have at least one channel".to_string(),
            });
        }
        if data.is_empty() || data.len() % channel_count != 0 {
            return Err(ScopeError::InvalidConfig {
                reason: format!(
                    "data length {} is not a non-zero multiple of channel count {}",
                    data.len(),
                    channel_count
                ),
            });
        }

        let samples_per_channel = data.len() / channel_count;
        Ok(SampleFrame {
            data,
            channel_count,
            samples_per_channel,
            timestamp_us,
        })
    }

    /// Build a frame from per-channel vectors of equal length.
    pub fn from_channels(channels: Vec<Vec<f32>>, timestamp_us: u64) -> ScopeResult<Self> {
        let channel_count = channels.len();
        let first_len = channels.first().map(|c| c.len()).unwrap_or(0);
        if channels.iter().any(|c| c.len() != first_len) {
            return Err(ScopeError::InvalidConfig {
                reason: "all channels must carry the same number of samples".to_string(),
            });
        }

        let mut data = Vec::with_capacity(channel_count * first_len);
        for channel in channels {
            data.extend_from_slice(&channel);
        }
        SampleFrame::new(data, channel_count, timestamp_us)
    }

    /// Number of channels in this frame
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Samples per channel in this frame
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Samples of a single channel
    pub fn channel(&self, channel_index: usize) -> ScopeResult<&[f32]> {
        if channel_index >= self.channel_count {
            return Err(ScopeError::ShapeMismatch {
                expected_channels: self.channel_count,
                actual_channels: channel_index + 1,
            });
        }
        let start = channel_index * self.samples_per_channel;
        Ok(&self.data[start..start + self.samples_per_channel])
    }

    /// Check this frame against the channel count a consumer expects.
    pub fn check_shape(&self, expected_channels: usize) -> ScopeResult<()> {
        if self.channel_count != expected_channels {
            return Err(ScopeError::ShapeMismatch {
                expected_channels,
                actual_channels: self.channel_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = SampleFrame::new(vec![0.0; 200], 2, 0).unwrap();
        assert_eq!(frame.channel_count(), 2);
        assert_eq!(frame.samples_per_channel(), 100);
    }

    #[test]
    fn test_channel_major_layout() {
        let frame = SampleFrame::from_channels(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            42,
        )
        .unwrap();

        assert_eq!(frame.channel(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(frame.channel(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert_eq!(frame.timestamp_us, 42);
    }

    #[test]
    fn test_rejects_ragged_channels() {
        let result = SampleFrame::from_channels(vec![vec![1.0, 2.0], vec![3.0]], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_misaligned_data() {
        assert!(SampleFrame::new(vec![0.0; 7], 2, 0).is_err());
        assert!(SampleFrame::new(Vec::new(), 1, 0).is_err());
    }

    #[test]
    fn test_shape_check() {
        let frame = SampleFrame::new(vec![0.0; 100], 1, 0).unwrap();
        assert!(frame.check_shape(1).is_ok());
        assert!(matches!(
            frame.check_shape(2),
            Err(ScopeError::ShapeMismatch { .. })
        ));
    }
}
