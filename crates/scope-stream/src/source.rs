//! Driver boundary consumed by the acquisition task

use scope_core::ScopeResult;

/// One hardware-rate read per call, at the cadence fixed by the
/// device's sampling rate.
///
/// Implementations block inside `read_block` until a block is
/// available; the acquisition task runs them on a blocking worker.
/// Board discovery and the wire protocol live behind this trait, not
/// in the pipeline.
pub trait SampleSource: Send {
    /// Read the next block, per-channel vectors of equal length.
    ///
    /// `Ok(None)` means the source is exhausted (clean end-of-stream).
    /// A returned error is a hardware/link fault and is fatal to
    /// acquisition.
    fn read_block(&mut self) -> ScopeResult<Option<Vec<Vec<f32>>>>;

    /// Number of channels every block carries
    fn channel_count(&self) -> usize;
}
