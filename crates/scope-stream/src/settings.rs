//! Runtime display settings written by the control surface

use scope_core::{DisplayRange, FilterSelection};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Everything the user can change without restarting the pipeline.
///
/// Published through a watch channel: the control surface writes whole
/// values, the presentation loop takes one consistent snapshot per
/// cycle. Partial updates can never tear mid-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Selected notch/bandpass pair
    pub filter: FilterSelection,
    /// Vertical display range
    pub range: DisplayRange,
    /// Replace the raw trace with its amplitude envelope
    pub envelope: bool,
    /// False freezes the display; frames are still drained
    pub streaming: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            filter: FilterSelection::default(),
            range: DisplayRange::default(),
            envelope: false,
            streaming: true,
        }
    }
}

/// Control-surface write handle
pub type SettingsSender = watch::Sender<ViewSettings>;
/// Presentation-loop read handle
pub type SettingsReceiver = watch::Receiver<ViewSettings>;

/// Create the settings pair with the given initial value.
pub fn view_settings(initial: ViewSettings) -> (SettingsSender, SettingsReceiver) {
    watch::channel(initial)
}
