/// Reserved coordinate value on an absolute axis meaning "touch ended".
/// Kept for wire compatibility with sensors that cannot report a separate
/// button event; it is never stored as a coordinate.
pub const RELEASE_VALUE: u16 = 0xFFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One event from the pointer-event source. X and Y updates for the same
/// physical contact may arrive as separate events in either order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Absolute { axis: Axis, value: u16 },
    Touch { pressed: bool },
    Other,
}

/// What the caller should do with the raw event after the processor has
/// seen it. `Consume` suppresses propagation to downstream consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Consume,
    Continue,
}
