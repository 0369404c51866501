//! Sliding per-channel history window feeding the filter stage

use scope_core::{PipelineConfig, SampleFrame, ScopeResult};
use std::collections::VecDeque;

/// Fixed-capacity ring of the most recent
/// `(display_seconds + pad_seconds) * sample_rate` samples per channel.
///
/// Zero-filled at construction so filtering always sees a full-length
/// window; before `window_len` real samples have arrived the output is
/// simply dominated by the zero fill (the warm-up phase).
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    channels: Vec<VecDeque<f32>>,
    window_len: usize,
    samples_seen: u64,
}

impl WindowBuffer {
    pub fn new(config: &PipelineConfig) -> Self {
        let window_len = config.window_len();
        WindowBuffer {
            channels: vec![
                VecDeque::from(vec![0.0f32; window_len]);
                config.channel_count
            ],
            window_len,
            samples_seen: 0,
        }
    }

    /// Append a frame's samples per channel, evicting the same count
    /// from the head. The length never deviates from `window_len`.
    pub fn append(&mut self, frame: &SampleFrame) -> ScopeResult<()> {
        frame.check_shape(self.channels.len())?;

        for (index, ring) in self.channels.iter_mut().enumerate() {
            let incoming = frame.channel(index)?;
            for &sample in incoming {
                ring.pop_front();
                ring.push_back(sample);
            }
        }

        self.samples_seen += frame.samples_per_channel() as u64;
        Ok(())
    }

    /// Contiguous ordered copy of the current window per channel.
    ///
    /// The copy is the cycle's consistent snapshot: later appends never
    /// show through a view already taken.
    pub fn view(&self) -> Vec<Vec<f32>> {
        self.channels
            .iter()
            .map(|ring| ring.iter().copied().collect())
            .collect()
    }

    /// Total samples appended per channel since construction
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// True once a full window of real samples has been appended
    pub fn is_warm(&self) -> bool {
        self.samples_seen >= self.window_len as u64
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
