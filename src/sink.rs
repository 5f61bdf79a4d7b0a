use crate::config::Action;

/// Destination for resolved gesture actions. Implementations must not
/// block; the processor calls this from the input event path.
pub trait ActionSink {
    /// Queue one half of a press/release pair. `delay_ms` is how long the
    /// executor should wait before applying the state change.
    fn enqueue(&self, action: Action, pressed: bool, delay_ms: u32);
}

/// Destination for region activation edges. Calls arrive strictly
/// ordered: the old region is deactivated before the new one activates.
pub trait RegionSink {
    fn activate(&self, region: u8);
    fn deactivate(&self, region: u8);
}
