//! Presentation loop: frame channel to display series
//!
//! Single-threaded consumer that only ever suspends on the frame
//! channel. Every received frame is appended to the window; every
//! `decimation_factor` frames the window is refiltered zero-phase,
//! trimmed, decimated and emitted. The same factor therefore throttles
//! the render cadence and thins the rendered points, one knob for both.

use crate::channel::FrameReceiver;
use crate::settings::SettingsReceiver;
use scope_core::{PipelineConfig, ScopeResult};
use scope_dsp::{DisplaySeries, DisplayStage, FilterBank, FilterEngine, WindowBuffer};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Consumer-side lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Window not yet full; output is dominated by the zero fill
    Warming,
    /// Normal operation
    Streaming,
    /// User-paused: frames are drained and discarded, display frozen
    Stopped,
}

/// One emitted cycle, handed to the renderer boundary
#[derive(Debug, Clone)]
pub struct DisplayUpdate {
    pub series: DisplaySeries,
    pub state: LoopState,
    /// Frames evicted by the channel overflow policy so far
    pub dropped_frames: u64,
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopStats {
    pub frames_received: u64,
    pub frames_discarded: u64,
    pub dropped_frames: u64,
    pub cycles_emitted: u64,
}

/// Drains the frame channel and drives window, filter and display
/// stages until the producer closes the channel.
pub struct PresentationLoop {
    config: PipelineConfig,
    buffer: WindowBuffer,
    engine: FilterEngine,
    stage: DisplayStage,
    receiver: FrameReceiver,
    settings: SettingsReceiver,
    output: broadcast::Sender<DisplayUpdate>,
    last_series: Option<DisplaySeries>,
    cycle_count: usize,
    stats: LoopStats,
}

impl PresentationLoop {
    /// Validate the configuration and design the filter bank. Both
    /// reject bad setups here so the running loop never has to.
    pub fn new(
        config: PipelineConfig,
        receiver: FrameReceiver,
        settings: SettingsReceiver,
    ) -> ScopeResult<Self> {
        config.validate()?;
        let bank = FilterBank::new(config.sample_rate)?;

        let (output, _) = broadcast::channel(8);
        Ok(PresentationLoop {
            buffer: WindowBuffer::new(&config),
            engine: FilterEngine::new(bank),
            stage: DisplayStage::new(config.clone()),
            config,
            receiver,
            settings,
            output,
            last_series: None,
            cycle_count: 0,
            stats: LoopStats::default(),
        })
    }

    /// Receiver for the renderer boundary. Subscribe before calling
    /// [`run`] to see every update.
    ///
    /// [`run`]: PresentationLoop::run
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayUpdate> {
        self.output.subscribe()
    }

    /// Run until the frame channel reports closed, then return the
    /// final counters. A closed channel is normal termination, never
    /// an error.
    pub async fn run(mut self) -> ScopeResult<LoopStats> {
        info!(
            window_len = self.config.window_len(),
            display_points = self.config.display_points(),
            decimation = self.config.decimation_factor,
            "presentation loop started"
        );

        while let Some(frame) = self.receiver.recv().await {
            // One consistent snapshot per cycle; the control surface
            // may rewrite the value at any time in between.
            let settings = *self.settings.borrow();

            if !settings.streaming {
                // Drain-only: the producer must never be starved of
                // channel capacity while the display is frozen.
                self.stats.frames_discarded += 1;
                continue;
            }

            if let Err(e) = self.buffer.append(&frame) {
                warn!(error = %e, "discarding frame with unexpected shape");
                self.stats.frames_discarded += 1;
                continue;
            }
            self.stats.frames_received += 1;

            self.cycle_count += 1;
            if self.cycle_count < self.config.decimation_factor {
                continue;
            }
            self.cycle_count = 0;

            let filtered = self.engine.apply(&self.buffer.view(), settings.filter);
            let series = self.stage.render(
                &filtered,
                settings.envelope,
                settings.range,
                self.buffer.samples_seen(),
            );

            let series = if series.is_finite() {
                self.last_series = Some(series.clone());
                series
            } else {
                // Degenerate filter output: keep showing the previous
                // cycle instead of propagating garbage to the renderer.
                warn!("non-finite display series, re-emitting previous cycle");
                match self.last_series.clone() {
                    Some(previous) => previous,
                    None => continue,
                }
            };

            // State derives from the same snapshot the cycle was
            // computed with; this path only runs while streaming
            let state = if self.buffer.is_warm() {
                LoopState::Streaming
            } else {
                LoopState::Warming
            };
            let update = DisplayUpdate {
                series,
                state,
                dropped_frames: self.receiver.dropped_frames(),
            };
            let _ = self.output.send(update);
            self.stats.cycles_emitted += 1;
        }

        self.stats.dropped_frames = self.receiver.dropped_frames();
        info!(
            frames = self.stats.frames_received,
            cycles = self.stats.cycles_emitted,
            dropped = self.stats.dropped_frames,
            "frame channel closed, presentation loop finished"
        );
        Ok(self.stats)
    }
}
