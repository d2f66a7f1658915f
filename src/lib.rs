// Core module of the Orbit GUI event system
pub mod config;
pub mod events;
pub mod layout;
pub mod panel;
pub mod root;
pub mod timer;

pub mod kit; // OrbitKit widgets

#[cfg(feature = "winit")]
pub mod platform;

/// Version of the Orbit GUI core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::{ModalPolicy, RootConfig};
    pub use crate::events::{
        Bounds, Event, EventData, InputEvent, Key, Modifiers, MouseButton, PropagationMode, Routing, Stop,
        SubscriptionId,
    };
    pub use crate::kit::prelude::*;
    pub use crate::layout::{EdgeValues, Point, Rect, Size};
    pub use crate::panel::{PanelId, TreeError};
    pub use crate::root::Root;
    pub use crate::timer::TimerId;
}

/// Errors that can occur in the Orbit GUI core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Panel tree error: {0}")]
    Tree(#[from] panel::TreeError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
