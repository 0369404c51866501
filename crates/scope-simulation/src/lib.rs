//! Scope-Simulation: synthetic biosignal source
//!
//! Generates EEG-like test signals behind the [`SampleSource`] driver
//! boundary, for development without hardware and for end-to-end
//! tests.
//!
//! [`SampleSource`]: scope_stream::SampleSource

pub mod source;
pub mod waveform;

pub use source::{SimulatedSource, SimulatorConfig};
pub use waveform::Waveform;
