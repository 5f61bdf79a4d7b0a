//! Lock-free counters for observing processor behavior from outside the
//! event path. Relaxed ordering is sufficient; readers only need eventual
//! visibility, not ordering against the counted event.

use core::sync::atomic::{AtomicU32, Ordering};

static GESTURES_DISPATCHED: AtomicU32 = AtomicU32::new(0);
static STRAY_RELEASES: AtomicU32 = AtomicU32::new(0);
static UNBOUND_GESTURES: AtomicU32 = AtomicU32::new(0);
static WATCHDOG_FIRES: AtomicU32 = AtomicU32::new(0);
static WATCHDOG_LOCK_RETRIES: AtomicU32 = AtomicU32::new(0);
static REGION_ACTIVATIONS: AtomicU32 = AtomicU32::new(0);
static REGION_DEACTIVATIONS: AtomicU32 = AtomicU32::new(0);
static ACTIONS_DROPPED: AtomicU32 = AtomicU32::new(0);

pub(crate) fn incr_gestures_dispatched() {
    GESTURES_DISPATCHED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_stray_releases() {
    STRAY_RELEASES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_unbound_gestures() {
    UNBOUND_GESTURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_watchdog_fires() {
    WATCHDOG_FIRES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_watchdog_lock_retries() {
    WATCHDOG_LOCK_RETRIES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_region_activations() {
    REGION_ACTIVATIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_region_deactivations() {
    REGION_DEACTIVATIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn incr_actions_dropped() {
    ACTIONS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub gestures_dispatched: u32,
    pub stray_releases: u32,
    pub unbound_gestures: u32,
    pub watchdog_fires: u32,
    pub watchdog_lock_retries: u32,
    pub region_activations: u32,
    pub region_deactivations: u32,
    pub actions_dropped: u32,
}

pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        gestures_dispatched: GESTURES_DISPATCHED.load(Ordering::Relaxed),
        stray_releases: STRAY_RELEASES.load(Ordering::Relaxed),
        unbound_gestures: UNBOUND_GESTURES.load(Ordering::Relaxed),
        watchdog_fires: WATCHDOG_FIRES.load(Ordering::Relaxed),
        watchdog_lock_retries: WATCHDOG_LOCK_RETRIES.load(Ordering::Relaxed),
        region_activations: REGION_ACTIVATIONS.load(Ordering::Relaxed),
        region_deactivations: REGION_DEACTIVATIONS.load(Ordering::Relaxed),
        actions_dropped: ACTIONS_DROPPED.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counters are process-global and tests run in parallel, so only
    // delta assertions are safe here.
    #[test]
    fn increments_are_visible_in_snapshots() {
        let before = snapshot();
        incr_gestures_dispatched();
        incr_watchdog_fires();
        let after = snapshot();
        assert!(after.gestures_dispatched >= before.gestures_dispatched + 1);
        assert!(after.watchdog_fires >= before.watchdog_fires + 1);
    }
}
