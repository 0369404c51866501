//! Scope-Stream: Acquisition and presentation execution contexts
//!
//! Two independently paced tasks, connected only by a bounded frame
//! channel: the acquisition side reads blocks from the driver boundary
//! at the hardware cadence and never waits for the consumer; the
//! presentation side drains frames, maintains the sliding window and
//! emits display series at a bounded rate.

pub mod acquisition;
pub mod channel;
pub mod presentation;
pub mod settings;
pub mod source;

pub use acquisition::spawn_acquisition;
pub use channel::{frame_channel, FrameReceiver, FrameSender};
pub use presentation::{DisplayUpdate, LoopState, LoopStats, PresentationLoop};
pub use settings::{view_settings, SettingsReceiver, SettingsSender, ViewSettings};
pub use source::SampleSource;
