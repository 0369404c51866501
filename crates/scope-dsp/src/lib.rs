//! Scope-DSP: Signal path from raw window to display-ready series
//!
//! Pure, synchronous processing: precomputed filter coefficients,
//! zero-phase filtering over the full window, trimming, envelope
//! extraction and decimation.

pub mod display;
pub mod filter_bank;
pub mod window;
pub mod zero_phase;

pub use display::{DisplaySeries, DisplayStage};
pub use filter_bank::{Biquad, FilterBank};
pub use window::WindowBuffer;
pub use zero_phase::FilterEngine;
