//! Root configuration

use serde::{Deserialize, Serialize};

/// Which focus registers are cleared when the modal panel changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalPolicy {
    /// Clear key, cursor, mouse and scroll focus
    #[default]
    ClearAll,
    /// Clear only key and cursor focus
    KeyAndCursor,
}

/// Settings for a [`Root`](crate::root::Root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Horizontal window scale applied to raw cursor coordinates
    pub scale_x: f32,
    /// Vertical window scale applied to raw cursor coordinates
    pub scale_y: f32,
    pub modal_policy: ModalPolicy,
    /// Clear key focus when a mouse button goes down over no panel
    pub clear_focus_on_empty_click: bool,
    /// Edit caret blink period in milliseconds
    pub caret_blink_ms: u64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            modal_policy: ModalPolicy::ClearAll,
            clear_focus_on_empty_click: true,
            caret_blink_ms: 500,
        }
    }
}

impl RootConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Use the same scale on both axes
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }
}
