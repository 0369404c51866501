//! Pipeline configuration and runtime-selectable display settings

use crate::error::{ScopeError, ScopeResult};
use serde::{Deserialize, Serialize};

/// Fixed pipeline configuration.
///
/// Set once at pipeline construction; the window length is derived from
/// it, so changing any field requires a full pipeline restart. Filter
/// selection and display range are runtime values and live in
/// [`FilterSelection`] / [`DisplayRange`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sampling rate in Hz
    pub sample_rate: f64,
    /// Number of acquired channels
    pub channel_count: usize,
    /// Seconds of signal shown on screen
    pub display_seconds: f64,
    /// Extra seconds of history kept to absorb filter edge artifacts,
    /// trimmed before display
    pub pad_seconds: f64,
    /// Downsampling factor; drives both render cadence and point thinning
    pub decimation_factor: usize,
}

impl PipelineConfig {
    /// Validate the integer arithmetic the pipeline depends on.
    ///
    /// Both `(display_seconds + pad_seconds) * sample_rate` and
    /// `display_seconds * sample_rate / decimation_factor` must be exact
    /// integers. Violations are rejected here, never at runtime.
    pub fn validate(&self) -> ScopeResult<()> {
        if self.sample_rate <= 0.0 {
            return Err(ScopeError::InvalidConfig {
                reason: format!("sample rate must be positive, got {}", self.sample_rate),
            });
        }
        if self.channel_count == 0 {
            return Err(ScopeError::InvalidConfig {
                reason: "channel count must be at least 1".to_string(),
            });
        }
        if self.display_seconds <= 0.0 || self.pad_seconds < 0.0 {
            return Err(ScopeError::InvalidConfig {
                reason: format!(
                    "display span must be positive and padding non-negative, got {}s + {}s",
                    self.display_seconds, self.pad_seconds
                ),
            });
        }
        if self.decimation_factor == 0 {
            return Err(ScopeError::InvalidConfig {
                reason: "decimation factor must be at least 1".to_string(),
            });
        }

        let window = (self.display_seconds + self.pad_seconds) * self.sample_rate;
        if window.fract() != 0.0 {
            return Err(ScopeError::ConfigInvariant {
                quantity: "(display_seconds + pad_seconds) * sample_rate",
                value: window,
            });
        }

        let points = self.display_seconds * self.sample_rate / self.decimation_factor as f64;
        if points.fract() != 0.0 {
            return Err(ScopeError::ConfigInvariant {
                quantity: "display_seconds * sample_rate / decimation_factor",
                value: points,
            });
        }

        Ok(())
    }

    /// Total retained samples per channel: display span plus padding
    pub fn window_len(&self) -> usize {
        ((self.display_seconds + self.pad_seconds) * self.sample_rate) as usize
    }

    /// Samples trimmed from the window head before display
    pub fn pad_len(&self) -> usize {
        (self.pad_seconds * self.sample_rate) as usize
    }

    /// Samples left per channel after trimming
    pub fn display_len(&self) -> usize {
        (self.display_seconds * self.sample_rate) as usize
    }

    /// Points per channel in the emitted display series
    pub fn display_points(&self) -> usize {
        self.display_len() / self.decimation_factor
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // Defaults of the Neuri V1 board profile
        Self {
            sample_rate: 200.0,
            channel_count: 2,
            display_seconds: 10.0,
            pad_seconds: 4.0,
            decimation_factor: 1,
        }
    }
}

/// Notch filter stage choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotchChoice {
    /// Passthrough
    Off,
    /// 50 Hz powerline rejection
    Hz50,
    /// 60 Hz powerline rejection
    Hz60,
}

/// Bandpass filter stage choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandpassChoice {
    /// Passthrough (raw signal)
    Raw,
    /// 0.1 Hz highpass to remove drift
    Detrend,
    /// 0.5 - 45 Hz
    Whole,
    /// 1 - 30 Hz
    Sleep,
    /// 4 - 8 Hz
    Theta,
}

/// Currently selected notch/bandpass pair.
///
/// Written by the control surface, read by the presentation loop as one
/// snapshot per processing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub notch: NotchChoice,
    pub bandpass: BandpassChoice,
}

impl FilterSelection {
    /// Both stages passthrough
    pub fn raw() -> Self {
        FilterSelection {
            notch: NotchChoice::Off,
            bandpass: BandpassChoice::Raw,
        }
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        // Startup default: notch off, detrend highpass only
        FilterSelection {
            notch: NotchChoice::Off,
            bandpass: BandpassChoice::Detrend,
        }
    }
}

/// Vertical display range selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayRange {
    /// Scale each cycle to the current per-channel absolute maximum
    Auto,
    /// Fixed symmetric range in signal units
    Fixed { low: f32, high: f32 },
}

impl Default for DisplayRange {
    fn default() -> Self {
        DisplayRange::Fixed {
            low: -1000.0,
            high: 1000.0,
        }
    }
}
