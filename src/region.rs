//! Region-variant processor: continuously maps the tracked position to a
//! grid cell and keeps exactly one region active while the pointer moves.
//! There is no explicit release; the idle watchdog is the only closer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use crate::config::{ConfigError, GridConfig};
use crate::event::{Axis, InputEvent, ProcessOutcome, RELEASE_VALUE};
use crate::geometry::GridGeometry;
use crate::sink::RegionSink;
use crate::telemetry;
use crate::watchdog::{TimeoutTarget, Watchdog, WatchdogVerdict};

struct RegionState {
    last_x: u16,
    last_y: u16,
    active: Option<u8>,
}

/// Ordered pair of edges produced by one position update. At most one
/// deactivate and one activate, in that order.
#[derive(Clone, Copy, Default)]
struct Transition {
    deactivate: Option<u8>,
    activate: Option<u8>,
}

pub struct RegionProcessor<S: RegionSink> {
    geometry: GridGeometry,
    suppress_input: bool,
    state: Mutex<CriticalSectionRawMutex, RegionState>,
    sink: S,
    watchdog: Watchdog,
}

impl<S: RegionSink> RegionProcessor<S> {
    /// Region instances carry no binding table; only the grid shape and
    /// domain are validated.
    pub fn new(config: GridConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate_geometry()?;
        let geometry = GridGeometry::new(config.rows, config.cols, config.domain);
        // Until the first real sample arrives, track from the domain
        // midpoint so a single-axis update still lands in a sane cell.
        let (center_x, center_y) = config.domain.center();
        log::info!(
            "region processor ready: {}x{} regions over {:?}",
            config.rows,
            config.cols,
            config.domain,
        );
        Ok(Self {
            geometry,
            suppress_input: config.suppress_input,
            state: Mutex::new(RegionState {
                last_x: center_x,
                last_y: center_y,
                active: None,
            }),
            sink,
            watchdog: Watchdog::new(config.idle_timeout),
        })
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    pub async fn handle_event(&self, event: InputEvent) -> ProcessOutcome {
        match event {
            InputEvent::Absolute { axis, value } => {
                // The release sentinel is not a coordinate; region
                // lifetimes end on idle timeout only.
                if value != RELEASE_VALUE {
                    let transition = {
                        let mut state = self.state.lock().await;
                        match axis {
                            Axis::X => state.last_x = value,
                            Axis::Y => state.last_y = value,
                        }
                        let cell = self.geometry.cell_of(state.last_x, state.last_y);
                        state.update_active(cell)
                    };
                    self.apply(transition);
                    self.watchdog.rearm();
                }
                self.outcome()
            }
            InputEvent::Touch { .. } | InputEvent::Other => ProcessOutcome::Continue,
        }
    }

    fn outcome(&self) -> ProcessOutcome {
        if self.suppress_input {
            ProcessOutcome::Consume
        } else {
            ProcessOutcome::Continue
        }
    }

    fn apply(&self, transition: Transition) {
        if let Some(region) = transition.deactivate {
            self.sink.deactivate(region);
            telemetry::incr_region_deactivations();
        }
        if let Some(region) = transition.activate {
            self.sink.activate(region);
            telemetry::incr_region_activations();
            log::debug!("region {region} active");
        }
    }
}

impl RegionState {
    fn update_active(&mut self, cell: u8) -> Transition {
        if self.active == Some(cell) {
            return Transition::default();
        }
        Transition {
            deactivate: self.active.replace(cell),
            activate: Some(cell),
        }
    }
}

impl<S: RegionSink> TimeoutTarget for RegionProcessor<S> {
    fn try_notify_timeout(&self) -> WatchdogVerdict {
        let active = match self.state.try_lock() {
            Ok(mut state) => state.active.take(),
            Err(_) => return WatchdogVerdict::Retry,
        };
        match active {
            Some(region) => {
                self.sink.deactivate(region);
                telemetry::incr_region_deactivations();
                log::debug!("region {region} released on idle timeout");
                WatchdogVerdict::Finalized
            }
            None => WatchdogVerdict::Idle,
        }
    }
}
