use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::direction::{classify, FlickDirection};
use crate::event::Axis;
use crate::geometry::GridGeometry;

/// Result of one completed session: the cell under the session start
/// position and the classified flick direction. Produced at most once per
/// session and consumed immediately by dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gesture {
    pub cell: u8,
    pub direction: FlickDirection,
}

#[derive(Clone, Copy, Debug)]
enum SessionEvent {
    Axis { axis: Axis, value: u16 },
    Release,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    gesture: Option<Gesture>,
}

impl DispatchContext {
    fn emit(&mut self, gesture: Gesture) {
        if self.gesture.is_none() {
            self.gesture = Some(gesture);
        }
    }
}

/// Session lifecycle tracker. Latches the first sample of each axis
/// independently, opens the session once both axes have a start value,
/// and emits exactly one gesture when the session terminates.
pub(crate) struct SessionMachine {
    machine: statig::blocking::StateMachine<SessionHsm>,
}

impl SessionMachine {
    pub(crate) fn new(geometry: GridGeometry, flick_threshold: u16) -> Self {
        Self {
            machine: SessionHsm::new(geometry, flick_threshold).state_machine(),
        }
    }

    pub(crate) fn axis_update(&mut self, axis: Axis, value: u16) -> Option<Gesture> {
        self.handle(SessionEvent::Axis { axis, value })
    }

    /// Terminate the session, whatever the trigger: axis sentinel, touch-up
    /// button event, or a watchdog forcing finalization. Returns `None`
    /// when no session was open, so a duplicate release dispatches nothing.
    pub(crate) fn release(&mut self) -> Option<Gesture> {
        self.handle(SessionEvent::Release)
    }

    fn handle(&mut self, event: SessionEvent) -> Option<Gesture> {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.gesture
    }
}

struct SessionHsm {
    geometry: GridGeometry,
    flick_threshold: u16,
    start_x: Option<u16>,
    start_y: Option<u16>,
    last_x: u16,
    last_y: u16,
}

impl SessionHsm {
    fn new(geometry: GridGeometry, flick_threshold: u16) -> Self {
        Self {
            geometry,
            flick_threshold,
            start_x: None,
            start_y: None,
            last_x: 0,
            last_y: 0,
        }
    }

    fn observe_axis(&mut self, axis: Axis, value: u16) {
        match axis {
            Axis::X => {
                if self.start_x.is_none() {
                    self.start_x = Some(value);
                }
                self.last_x = value;
            }
            Axis::Y => {
                if self.start_y.is_none() {
                    self.start_y = Some(value);
                }
                self.last_y = value;
            }
        }
    }

    fn reset_latches(&mut self) {
        self.start_x = None;
        self.start_y = None;
    }

    fn finalize(&mut self, context: &mut DispatchContext) {
        if let Some((start_x, start_y)) = self.start_x.zip(self.start_y) {
            let dx = self.last_x as i32 - start_x as i32;
            let dy = self.last_y as i32 - start_y as i32;
            let direction = classify(dx, dy, self.flick_threshold);
            let cell = self.geometry.cell_of(start_x, start_y);
            log::debug!("session end: cell={cell} direction={direction:?} dx={dx} dy={dy}");
            context.emit(Gesture { cell, direction });
        }
        self.reset_latches();
    }
}

#[state_machine(initial = "State::idle()")]
impl SessionHsm {
    #[state]
    fn idle(&mut self, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::Axis { axis, value } => {
                self.observe_axis(*axis, *value);
                // X and Y arrive as separate events at different moments;
                // the session opens only once both axes have latched.
                if self.start_x.is_some() && self.start_y.is_some() {
                    Transition(State::active())
                } else {
                    Handled
                }
            }
            SessionEvent::Release => {
                // No session open. Drop any half-latched axis so a partial
                // sync cannot leak into the next session.
                self.reset_latches();
                Handled
            }
        }
    }

    #[state]
    fn active(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::Axis { axis, value } => {
                self.observe_axis(*axis, *value);
                Handled
            }
            SessionEvent::Release => {
                self.finalize(context);
                Transition(State::idle())
            }
        }
    }
}
