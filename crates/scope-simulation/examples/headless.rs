//! Headless pipeline demo: simulated electrodes to logged display series
//!
//! Runs the full acquisition/presentation pipeline for thirty seconds
//! of simulated signal and logs one summary line per rendered cycle.
//! Useful for watching the pipeline behave without any GUI attached.

use anyhow::Result;
use scope_core::{BandpassChoice, FilterSelection, NotchChoice, PipelineConfig};
use scope_simulation::{SimulatedSource, SimulatorConfig, Waveform};
use scope_stream::{
    frame_channel, spawn_acquisition, view_settings, PresentationLoop, ViewSettings,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = PipelineConfig::default();

    let source = SimulatedSource::new(SimulatorConfig {
        sample_rate: config.sample_rate,
        channel_count: config.channel_count,
        waveform: Waveform::Burst {
            frequency: 13.0,
            amplitude_uv: 50.0,
            cycle_seconds: 3.0,
        },
        block_limit: Some(300), // 30 seconds at 20 samples per block
        ..SimulatorConfig::default()
    })?;

    let (sender, receiver) = frame_channel(64);
    let (_settings, settings_rx) = view_settings(ViewSettings {
        filter: FilterSelection {
            notch: NotchChoice::Hz50,
            bandpass: BandpassChoice::Whole,
        },
        ..ViewSettings::default()
    });

    let pipeline = PresentationLoop::new(config, receiver, settings_rx)?;
    let mut updates = pipeline.subscribe();

    let acquisition = spawn_acquisition(Box::new(source), sender);
    let presentation = tokio::spawn(pipeline.run());

    while let Ok(update) = updates.recv().await {
        let series = &update.series;
        let (low, high) = series.ranges[0];
        info!(
            state = ?update.state,
            right_edge_s = format!("{:.1}", series.time_axis.last().copied().unwrap_or(0.0)),
            range_uv = format!("[{:.1}, {:.1}]", low, high),
            dropped = update.dropped_frames,
            "cycle"
        );
    }

    acquisition.await??;
    let stats = presentation.await??;
    info!(
        frames = stats.frames_received,
        cycles = stats.cycles_emitted,
        dropped = stats.dropped_frames,
        "pipeline finished"
    );
    Ok(())
}
