//! Gesture-variant processor: classifies each touch session into a
//! (cell, direction) gesture on release and dispatches the bound action
//! exactly once.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use crate::config::{ConfigError, GridConfig};
use crate::event::{Axis, InputEvent, ProcessOutcome, RELEASE_VALUE};
use crate::geometry::GridGeometry;
use crate::session::{Gesture, SessionMachine};
use crate::sink::ActionSink;
use crate::telemetry;
use crate::watchdog::{TimeoutTarget, Watchdog, WatchdogVerdict};

/// Delay between the press and release halves of a dispatched action, so
/// downstream consumers observe a realistic key press.
pub const ACTION_RELEASE_DELAY_MS: u32 = 20;

pub struct GridProcessor<S: ActionSink> {
    config: GridConfig,
    session: Mutex<CriticalSectionRawMutex, SessionMachine>,
    sink: S,
    watchdog: Watchdog,
}

impl<S: ActionSink> GridProcessor<S> {
    pub fn new(config: GridConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate_geometry()?;
        config.validate_bindings()?;
        let geometry = GridGeometry::new(config.rows, config.cols, config.domain);
        log::info!(
            "grid processor ready: {}x{} cells over {:?}",
            config.rows,
            config.cols,
            config.domain,
        );
        Ok(Self {
            config,
            session: Mutex::new(SessionMachine::new(geometry, config.flick_threshold)),
            sink,
            watchdog: Watchdog::new(config.idle_timeout),
        })
    }

    /// The watchdog driving this instance's idle timeout; hand it to
    /// [`crate::watchdog::run_watchdog`] together with the processor.
    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Feed one event from the pointer stream. The session lock is held
    /// only while mutating session state; action dispatch happens after it
    /// is released.
    pub async fn handle_event(&self, event: InputEvent) -> ProcessOutcome {
        match event {
            InputEvent::Absolute { axis, value } => {
                if value == RELEASE_VALUE {
                    let gesture = self.session.lock().await.release();
                    self.dispatch_release(gesture);
                } else {
                    self.session.lock().await.axis_update(axis, value);
                    self.watchdog.rearm();
                }
                self.outcome()
            }
            InputEvent::Touch { pressed } => {
                if !pressed {
                    let gesture = self.session.lock().await.release();
                    self.dispatch_release(gesture);
                }
                // Touch-down carries no coordinate; the session opens on
                // the first full coordinate pair instead.
                self.outcome()
            }
            InputEvent::Other => ProcessOutcome::Continue,
        }
    }

    fn outcome(&self) -> ProcessOutcome {
        if self.config.suppress_input {
            ProcessOutcome::Consume
        } else {
            ProcessOutcome::Continue
        }
    }

    fn dispatch_release(&self, gesture: Option<Gesture>) {
        let Some(gesture) = gesture else {
            telemetry::incr_stray_releases();
            return;
        };
        self.dispatch(gesture);
    }

    fn dispatch(&self, gesture: Gesture) {
        let bindings = &self.config.bindings[gesture.cell as usize];
        match bindings[gesture.direction.index()] {
            Some(action) => {
                self.sink.enqueue(action, true, 0);
                self.sink.enqueue(action, false, ACTION_RELEASE_DELAY_MS);
                telemetry::incr_gestures_dispatched();
                log::debug!(
                    "dispatched cell={} direction={:?} behavior={}",
                    gesture.cell,
                    gesture.direction,
                    action.behavior,
                );
            }
            None => {
                telemetry::incr_unbound_gestures();
                log::debug!(
                    "no binding for cell={} direction={:?}",
                    gesture.cell,
                    gesture.direction,
                );
            }
        }
    }
}

impl<S: ActionSink> TimeoutTarget for GridProcessor<S> {
    fn try_notify_timeout(&self) -> WatchdogVerdict {
        let gesture = match self.session.try_lock() {
            Ok(mut session) => session.release(),
            Err(_) => return WatchdogVerdict::Retry,
        };
        match gesture {
            Some(gesture) => {
                log::debug!("idle timeout finalized session in cell {}", gesture.cell);
                self.dispatch(gesture);
                WatchdogVerdict::Finalized
            }
            None => WatchdogVerdict::Idle,
        }
    }
}
