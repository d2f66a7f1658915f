//! Event system of the Orbit GUI core
//!
//! The event system provides:
//! - Named events with typed payloads delivered to panel handlers
//! - A per-panel dispatcher keeping handlers in registration order
//! - Ancestor propagation with first-subscribed and broadcast modes
//! - Z-ordered hit testing of screen points
//! - Raw host input and the routing verdict handed back to the host

pub mod dispatcher;
pub mod event;
pub mod hit_testing;
pub mod input;
pub mod propagation;

pub use dispatcher::{Dispatcher, Handler, SubscriptionId};
pub use event::*;
pub use hit_testing::{HitResult, HitTestStats, HitTester};
pub use input::{InputEvent, Routing};
pub use propagation::{propagate_to_ancestors, walk_ancestors, Bounds, PropagationMode};
