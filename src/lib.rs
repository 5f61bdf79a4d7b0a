//! Classifies absolute pointer streams from trackpad-style sensors into
//! grid-cell gestures (tap or four-way flick) and continuously-tracked
//! active regions, and dispatches the configured action exactly once per
//! completed touch session.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod direction;
pub mod event;
pub mod geometry;
pub mod processor;
pub mod region;
mod session;
pub mod sink;
pub mod tasks;
pub mod telemetry;
pub mod watchdog;

pub use config::{Action, CellBindings, ConfigError, Domain, GridConfig, MAX_CELLS};
pub use direction::FlickDirection;
pub use event::{Axis, InputEvent, ProcessOutcome, RELEASE_VALUE};
pub use processor::{GridProcessor, ACTION_RELEASE_DELAY_MS};
pub use region::RegionProcessor;
pub use session::Gesture;
pub use sink::{ActionSink, RegionSink};
pub use watchdog::{TimeoutTarget, Watchdog, WatchdogVerdict};
