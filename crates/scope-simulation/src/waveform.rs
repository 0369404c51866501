//! Pre-defined test waveforms, amplitudes in microvolts

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Deterministic component of the simulated signal. Noise, drift and
/// powerline interference are layered on top by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Waveform {
    /// Constant offset, useful for exercising detrend filters
    Flat { level_uv: f32 },
    /// Single sinusoid
    Tone { frequency: f64, amplitude_uv: f32 },
    /// Sum of sinusoids, `(frequency, amplitude_uv)` pairs
    Composite { tones: Vec<(f64, f32)> },
    /// Sinusoid whose amplitude waxes and wanes, mimicking spindle
    /// activity; good for eyeballing the envelope display
    Burst {
        frequency: f64,
        amplitude_uv: f32,
        cycle_seconds: f64,
    },
}

impl Waveform {
    /// Signal value at `time` seconds from acquisition start.
    pub fn value_at(&self, time: f64) -> f32 {
        match self {
            Waveform::Flat { level_uv } => *level_uv,

            Waveform::Tone {
                frequency,
                amplitude_uv,
            } => amplitude_uv * (2.0 * PI * frequency * time).sin() as f32,

            Waveform::Composite { tones } => tones
                .iter()
                .map(|(frequency, amplitude_uv)| {
                    amplitude_uv * (2.0 * PI * frequency * time).sin() as f32
                })
                .sum(),

            Waveform::Burst {
                frequency,
                amplitude_uv,
                cycle_seconds,
            } => {
                let gate = 0.5 * (1.0 - (2.0 * PI * time / cycle_seconds).cos());
                let carrier = (2.0 * PI * frequency * time).sin();
                amplitude_uv * (gate * carrier) as f32
            }
        }
    }

    /// Presets covering the filter menu's bands.
    pub fn presets() -> Vec<(&'static str, Waveform)> {
        vec![
            ("Flatline", Waveform::Flat { level_uv: 0.0 }),
            (
                "Alpha",
                Waveform::Tone {
                    frequency: 10.0,
                    amplitude_uv: 40.0,
                },
            ),
            (
                "Theta",
                Waveform::Tone {
                    frequency: 6.0,
                    amplitude_uv: 60.0,
                },
            ),
            (
                "Mixed rhythm",
                Waveform::Composite {
                    tones: vec![(6.0, 30.0), (10.0, 40.0), (22.0, 10.0)],
                },
            ),
            (
                "Spindles",
                Waveform::Burst {
                    frequency: 13.0,
                    amplitude_uv: 50.0,
                    cycle_seconds: 3.0,
                },
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_holds_level() {
        let w = Waveform::Flat { level_uv: 12.5 };
        assert_eq!(w.value_at(0.0), 12.5);
        assert_eq!(w.value_at(3.7), 12.5);
    }

    #[test]
    fn test_tone_peaks_at_quarter_period() {
        let w = Waveform::Tone {
            frequency: 10.0,
            amplitude_uv: 40.0,
        };
        assert!((w.value_at(0.025) - 40.0).abs() < 1e-3);
        assert!(w.value_at(0.0).abs() < 1e-3);
    }

    #[test]
    fn test_composite_sums_components() {
        let w = Waveform::Composite {
            tones: vec![(10.0, 40.0), (10.0, 20.0)],
        };
        let single = Waveform::Tone {
            frequency: 10.0,
            amplitude_uv: 60.0,
        };
        for i in 0..50 {
            let t = i as f64 * 0.013;
            assert!((w.value_at(t) - single.value_at(t)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_burst_gate_closes_at_cycle_start() {
        let w = Waveform::Burst {
            frequency: 13.0,
            amplitude_uv: 50.0,
            cycle_seconds: 3.0,
        };
        // Gate is zero at t = 0 and t = cycle, fully open halfway
        assert!(w.value_at(0.0).abs() < 1e-3);
        assert!(w.value_at(3.0).abs() < 1e-2);
        let mut peak = 0.0f32;
        for i in 0..300 {
            peak = peak.max(w.value_at(1.35 + i as f64 * 0.001).abs());
        }
        assert!(peak > 45.0);
    }
}
