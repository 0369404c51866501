//! Simulated driver behind the acquisition boundary

use crate::waveform::Waveform;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use scope_core::{ScopeError, ScopeResult};
use scope_stream::SampleSource;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Hard rails of the simulated front end, microvolts
const CLIP_UV: f32 = 4000.0;

/// Configuration for the simulated source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Native sampling rate in Hz
    pub sample_rate: f64,
    /// Number of simulated electrodes
    pub channel_count: usize,
    /// Samples per channel per block
    pub block_len: usize,
    /// Deterministic signal component
    pub waveform: Waveform,
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub noise_std_uv: f32,
    /// Slow 0.1 Hz baseline wander amplitude
    pub drift_uv: f32,
    /// Mains interference frequency, `None` for a clean signal
    pub powerline: Option<f64>,
    /// Mains interference amplitude
    pub powerline_uv: f32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Stop after this many blocks; `None` runs until dropped
    pub block_limit: Option<u64>,
    /// Sleep so blocks appear at the native cadence. Tests turn this
    /// off to run at full speed.
    pub paced: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            sample_rate: 200.0,
            channel_count: 2,
            block_len: 20,
            waveform: Waveform::Tone {
                frequency: 10.0,
                amplitude_uv: 40.0,
            },
            noise_std_uv: 5.0,
            drift_uv: 20.0,
            powerline: Some(50.0),
            powerline_uv: 10.0,
            seed: None,
            block_limit: None,
            paced: true,
        }
    }
}

/// Synthetic electrode front end implementing [`SampleSource`].
///
/// Time is driven by the sample count, not the wall clock, so the
/// generated signal is identical whether or not pacing is on.
pub struct SimulatedSource {
    config: SimulatorConfig,
    rng: rand::rngs::StdRng,
    noise: Normal<f32>,
    samples_emitted: u64,
    blocks_emitted: u64,
    started: Option<Instant>,
}

impl SimulatedSource {
    pub fn new(config: SimulatorConfig) -> ScopeResult<Self> {
        if config.sample_rate <= 0.0 || !config.sample_rate.is_finite() {
            return Err(ScopeError::InvalidConfig {
                reason: format!("sampling rate {} is not positive", config.sample_rate),
            });
        }
        if config.channel_count == 0 || config.block_len == 0 {
            return Err(ScopeError::InvalidConfig {
                reason: "channel count and block length must be nonzero".to_string(),
            });
        }

        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
        let rng = rand::rngs::StdRng::seed_from_u64(seed);

        let noise = Normal::new(0.0, config.noise_std_uv).map_err(|e| {
            ScopeError::InvalidConfig {
                reason: format!("noise distribution rejected: {}", e),
            }
        })?;

        Ok(SimulatedSource {
            config,
            rng,
            noise,
            samples_emitted: 0,
            blocks_emitted: 0,
            started: None,
        })
    }

    fn sample(&mut self, time: f64, channel: usize) -> f32 {
        // Small per-channel lag keeps the traces distinguishable on a
        // stacked display
        let lagged = time - channel as f64 * 0.005;
        let mut value = self.config.waveform.value_at(lagged);

        value += self.noise.sample(&mut self.rng);
        value += self.config.drift_uv
            * (2.0 * std::f64::consts::PI * 0.1 * time).sin() as f32;
        if let Some(mains) = self.config.powerline {
            value += self.config.powerline_uv
                * (2.0 * std::f64::consts::PI * mains * time).sin() as f32;
        }

        value.clamp(-CLIP_UV, CLIP_UV)
    }

    /// Sleep until the last sample of the upcoming block would have
    /// left a real converter.
    fn pace(&mut self) {
        let start = *self.started.get_or_insert_with(Instant::now);
        let block_end = self.samples_emitted + self.config.block_len as u64;
        let due = start
            + Duration::from_secs_f64(block_end as f64 / self.config.sample_rate);
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
    }
}

impl SampleSource for SimulatedSource {
    fn read_block(&mut self) -> ScopeResult<Option<Vec<Vec<f32>>>> {
        if let Some(limit) = self.config.block_limit {
            if self.blocks_emitted >= limit {
                info!(blocks = self.blocks_emitted, "simulated source exhausted");
                return Ok(None);
            }
        }
        if self.config.paced {
            self.pace();
        }

        let dt = 1.0 / self.config.sample_rate;
        let mut channels =
            vec![Vec::with_capacity(self.config.block_len); self.config.channel_count];
        for i in 0..self.config.block_len {
            let time = (self.samples_emitted + i as u64) as f64 * dt;
            for channel in 0..self.config.channel_count {
                let value = self.sample(time, channel);
                channels[channel].push(value);
            }
        }

        self.samples_emitted += self.config.block_len as u64;
        self.blocks_emitted += 1;
        Ok(Some(channels))
    }

    fn channel_count(&self) -> usize {
        self.config.channel_count
    }
}
