//! Precomputed filter coefficient sets for the fixed display menu

use scope_core::{BandpassChoice, NotchChoice, ScopeError, ScopeResult};
use serde::{Deserialize, Serialize};

/// Single biquad section (2nd order), normalized so a0 = 1
///
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biquad {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Biquad {
    /// 2nd order Butterworth lowpass via bilinear transform
    pub fn lowpass(cutoff: f32, fs: f32) -> ScopeResult<Self> {
        check_corner(cutoff, fs)?;

        let omega_c = 2.0 * std::f32::consts::PI * cutoff / fs;
        let k = (omega_c / 2.0).tan();

        let sqrt2 = std::f32::consts::SQRT_2;
        let k2 = k * k;
        let norm = k2 + sqrt2 * k + 1.0;

        let b0 = k2 / norm;
        Ok(Biquad {
            b0,
            b1: 2.0 * b0,
            b2: b0,
            a1: (2.0 * (k2 - 1.0)) / norm,
            a2: (k2 - sqrt2 * k + 1.0) / norm,
        })
    }

    /// 2nd order Butterworth highpass via bilinear transform
    pub fn highpass(cutoff: f32, fs: f32) -> ScopeResult<Self> {
        check_corner(cutoff, fs)?;

        let omega_c = 2.0 * std::f32::consts::PI * cutoff / fs;
        let k = (omega_c / 2.0).tan();

        let sqrt2 = std::f32::consts::SQRT_2;
        let k2 = k * k;
        let norm = k2 + sqrt2 * k + 1.0;

        let b0 = 1.0 / norm;
        Ok(Biquad {
            b0,
            b1: -2.0 * b0,
            b2: b0,
            a1: (2.0 * (k2 - 1.0)) / norm,
            a2: (k2 - sqrt2 * k + 1.0) / norm,
        })
    }

    /// 2nd order notch at `freq` with quality factor `q`
    pub fn notch(freq: f32, q: f32, fs: f32) -> ScopeResult<Self> {
        check_corner(freq, fs)?;
        if q <= 0.0 {
            return Err(ScopeError::FilterDesign {
                reason: format!("quality factor must be positive, got {}", q),
                frequency: freq,
                sample_rate: fs,
            });
        }

        let omega = 2.0 * std::f32::consts::PI * freq / fs;
        let alpha = omega.sin() / (2.0 * q);
        let cos_omega = omega.cos();

        let a0 = 1.0 + alpha;
        Ok(Biquad {
            b0: 1.0 / a0,
            b1: -2.0 * cos_omega / a0,
            b2: 1.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        })
    }
}

fn check_corner(freq: f32, fs: f32) -> ScopeResult<()> {
    if !(freq > 0.0) || freq >= fs / 2.0 {
        return Err(ScopeError::FilterDesign {
            reason: "corner frequency must lie strictly between 0 and Nyquist".to_string(),
            frequency: freq,
            sample_rate: fs,
        });
    }
    Ok(())
}

/// Coefficient sets for every menu entry, designed once for a fixed
/// sampling rate.
///
/// Bandpass presets are highpass + lowpass cascades; `Raw` and `Off`
/// are passthrough sentinels represented as `None` on lookup.
#[derive(Debug, Clone)]
pub struct FilterBank {
    sample_rate: f32,
    notch_50: Vec<Biquad>,
    notch_60: Vec<Biquad>,
    detrend: Vec<Biquad>,
    whole: Vec<Biquad>,
    sleep: Vec<Biquad>,
    theta: Vec<Biquad>,
}

// Corner frequencies of the display filter menu
const DETREND_HZ: f32 = 0.1;
const WHOLE_HZ: (f32, f32) = (0.5, 45.0);
const SLEEP_HZ: (f32, f32) = (1.0, 30.0);
const THETA_HZ: (f32, f32) = (4.0, 8.0);
// 4 Hz stopband around the powerline frequency
const NOTCH_BANDWIDTH_HZ: f32 = 4.0;

impl FilterBank {
    /// Design all coefficient sets for `sample_rate`. Designs whose
    /// corners reach Nyquist are rejected here, before the pipeline
    /// starts.
    pub fn new(sample_rate: f64) -> ScopeResult<Self> {
        let fs = sample_rate as f32;

        let bandpass = |band: (f32, f32)| -> ScopeResult<Vec<Biquad>> {
            Ok(vec![Biquad::highpass(band.0, fs)?, Biquad::lowpass(band.1, fs)?])
        };

        Ok(FilterBank {
            sample_rate: fs,
            notch_50: vec![Biquad::notch(50.0, 50.0 / NOTCH_BANDWIDTH_HZ, fs)?],
            notch_60: vec![Biquad::notch(60.0, 60.0 / NOTCH_BANDWIDTH_HZ, fs)?],
            detrend: vec![Biquad::highpass(DETREND_HZ, fs)?],
            whole: bandpass(WHOLE_HZ)?,
            sleep: bandpass(SLEEP_HZ)?,
            theta: bandpass(THETA_HZ)?,
        })
    }

    /// Sampling rate the bank was designed for
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Coefficients for the notch stage; `None` is passthrough
    pub fn notch(&self, choice: NotchChoice) -> Option<&[Biquad]> {
        match choice {
            NotchChoice::Off => None,
            NotchChoice::Hz50 => Some(&self.notch_50),
            NotchChoice::Hz60 => Some(&self.notch_60),
        }
    }

    /// Coefficients for the bandpass stage; `None` is passthrough
    pub fn bandpass(&self, choice: BandpassChoice) -> Option<&[Biquad]> {
        match choice {
            BandpassChoice::Raw => None,
            BandpassChoice::Detrend => Some(&self.detrend),
            BandpassChoice::Whole => Some(&self.whole),
            BandpassChoice::Sleep => Some(&self.sleep),
            BandpassChoice::Theta => Some(&self.theta),
        }
    }
}
