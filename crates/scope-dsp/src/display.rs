//! Trim, envelope and decimation: filtered window to display series

use num_complex::Complex;
use rustfft::FftPlanner;
use scope_core::{DisplayRange, PipelineConfig};

/// Ready-to-render output of one processing cycle.
///
/// Recomputed every emitted cycle; the renderer consumes it immediately
/// and may discard it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySeries {
    /// Per-channel amplitude values, `display_points` each
    pub channels: Vec<Vec<f32>>,
    /// Shared time axis in seconds, same length, right edge sliding
    pub time_axis: Vec<f64>,
    /// Per-channel applied vertical range `[lo, hi]` for axis labeling
    pub ranges: Vec<(f32, f32)>,
}

impl DisplaySeries {
    /// True when every value and range bound is finite
    pub fn is_finite(&self) -> bool {
        self.channels
            .iter()
            .all(|c| c.iter().all(|v| v.is_finite()))
            && self.ranges.iter().all(|r| r.0.is_finite() && r.1.is_finite())
    }
}

/// Turns a filtered window into a fixed-size display series.
///
/// Steps per channel: trim the padding margin, optionally replace the
/// series with its analytic-signal magnitude, subsample every
/// `decimation_factor`-th point, and compute the vertical range.
pub struct DisplayStage {
    config: PipelineConfig,
    planner: FftPlanner<f32>,
}

impl DisplayStage {
    pub fn new(config: PipelineConfig) -> Self {
        DisplayStage {
            config,
            planner: FftPlanner::new(),
        }
    }

    /// Render one cycle. `samples_seen` is the total per-channel sample
    /// count appended so far; it anchors the right edge of the time
    /// axis.
    pub fn render(
        &mut self,
        filtered: &[Vec<f32>],
        envelope: bool,
        range: DisplayRange,
        samples_seen: u64,
    ) -> DisplaySeries {
        let pad_len = self.config.pad_len();
        let factor = self.config.decimation_factor;

        let mut channels = Vec::with_capacity(filtered.len());
        let mut ranges = Vec::with_capacity(filtered.len());

        for window in filtered {
            // The padding margin absorbed the filter edge transients;
            // drop it before anything reaches the screen.
            let trimmed = &window[pad_len..];

            let series: Vec<f32> = if envelope {
                let magnitude = self.analytic_magnitude(trimmed);
                magnitude.into_iter().step_by(factor).collect()
            } else {
                trimmed.iter().copied().step_by(factor).collect()
            };

            ranges.push(applied_range(&series, range, envelope));
            channels.push(series);
        }

        DisplaySeries {
            channels,
            time_axis: self.time_axis(samples_seen),
            ranges,
        }
    }

    /// Sliding time axis: right edge at `samples_seen / sample_rate`,
    /// spacing `decimation_factor / sample_rate`.
    fn time_axis(&self, samples_seen: u64) -> Vec<f64> {
        let points = self.config.display_points();
        let dt = self.config.decimation_factor as f64 / self.config.sample_rate;
        let t_end = samples_seen as f64 / self.config.sample_rate;

        (0..points)
            .map(|k| t_end - (points - 1 - k) as f64 * dt)
            .collect()
    }

    /// Instantaneous amplitude via the analytic signal: FFT, zero the
    /// negative frequencies, inverse FFT, take the magnitude. Output is
    /// non-negative by construction.
    fn analytic_magnitude(&mut self, samples: &[f32]) -> Vec<f32> {
        let n = samples.len();
        if n == 0 {
            return Vec::new();
        }

        let forward = self.planner.plan_fft_forward(n);
        let inverse = self.planner.plan_fft_inverse(n);

        let mut spectrum: Vec<Complex<f32>> = samples
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        forward.process(&mut spectrum);

        // Analytic-signal weighting: DC and Nyquist stay, positive
        // frequencies double, negative frequencies vanish.
        let half = n / 2;
        for (k, bin) in spectrum.iter_mut().enumerate() {
            if k == 0 || (n % 2 == 0 && k == half) {
                continue;
            } else if k < half || (n % 2 == 1 && k == half) {
                *bin = *bin * 2.0;
            } else {
                *bin = Complex::new(0.0, 0.0);
            }
        }

        inverse.process(&mut spectrum);
        let scale = 1.0 / n as f32;
        spectrum.iter().map(|c| c.norm() * scale).collect()
    }
}

fn applied_range(series: &[f32], range: DisplayRange, envelope: bool) -> (f32, f32) {
    match range {
        DisplayRange::Auto => {
            let m = series.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
            if envelope {
                (0.0, m)
            } else {
                (-m, m)
            }
        }
        DisplayRange::Fixed { low, high } => {
            if envelope {
                (0.0, high)
            } else {
                (low, high)
            }
        }
    }
}
