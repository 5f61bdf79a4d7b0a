//! Idle-timeout supervision for processor instances. The event path rearms
//! a deadline on every coordinate update; a dedicated task sleeps until the
//! deadline passes with no rearm, then forces session finalization.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use crate::telemetry;

/// Backoff before re-attempting finalization when the processor lock is
/// held by the event path at the moment the deadline expires.
pub(crate) const WATCHDOG_LOCK_RETRY_MS: u64 = 2;

/// Outcome of a single timeout-delivery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogVerdict {
    /// No session or region was active; nothing to finalize.
    Idle,
    /// A session or region was finalized by this attempt.
    Finalized,
    /// The processor state was locked; try again shortly.
    Retry,
}

/// Implemented by processor types that can be finalized on idle timeout.
/// Must never block: a contended lock reports [`WatchdogVerdict::Retry`]
/// instead of waiting.
pub trait TimeoutTarget {
    fn try_notify_timeout(&self) -> WatchdogVerdict;
}

/// Rearmable single-deadline timer. `Signal` keeps only the latest value,
/// so a burst of coordinate updates collapses into one pending deadline.
pub struct Watchdog {
    timeout: Duration,
    deadline: Signal<CriticalSectionRawMutex, Instant>,
}

impl Watchdog {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Signal::new(),
        }
    }

    /// Push the deadline out to `timeout` from now. Called by the event
    /// path on every accepted coordinate update.
    pub fn rearm(&self) {
        self.deadline.signal(Instant::now() + self.timeout);
    }

    async fn armed(&self) -> Instant {
        self.deadline.wait().await
    }

    fn try_rearmed(&self) -> Option<Instant> {
        self.deadline.try_take()
    }
}

/// Drive one watchdog against one processor instance. Never returns; spawn
/// it once per instance next to the event pump.
pub async fn run_watchdog<P: TimeoutTarget>(watchdog: &Watchdog, target: &P) -> ! {
    loop {
        let mut deadline = watchdog.armed().await;

        loop {
            match select(Timer::at(deadline), watchdog.armed()).await {
                Either::Second(new_deadline) => {
                    deadline = new_deadline;
                }
                Either::First(()) => match target.try_notify_timeout() {
                    WatchdogVerdict::Finalized => {
                        telemetry::incr_watchdog_fires();
                        break;
                    }
                    WatchdogVerdict::Idle => break,
                    WatchdogVerdict::Retry => {
                        telemetry::incr_watchdog_lock_retries();
                        Timer::after(Duration::from_millis(WATCHDOG_LOCK_RETRY_MS)).await;
                        // A rearm that landed while we backed off supersedes
                        // the expired deadline.
                        if let Some(new_deadline) = watchdog.try_rearmed() {
                            deadline = new_deadline;
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use embassy_futures::block_on;

    use super::*;

    struct ScriptedTarget<'a> {
        watchdog: &'a Watchdog,
        rearm_on_first_fire: bool,
        calls: RefCell<Vec<(Instant, WatchdogVerdict)>>,
    }

    impl<'a> ScriptedTarget<'a> {
        fn new(watchdog: &'a Watchdog, rearm_on_first_fire: bool) -> Self {
            Self {
                watchdog,
                rearm_on_first_fire,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TimeoutTarget for ScriptedTarget<'_> {
        fn try_notify_timeout(&self) -> WatchdogVerdict {
            let mut calls = self.calls.borrow_mut();
            let verdict = if calls.is_empty() && self.rearm_on_first_fire {
                // Models the event path accepting a coordinate update at
                // the moment the deadline expires.
                self.watchdog.rearm();
                WatchdogVerdict::Retry
            } else {
                WatchdogVerdict::Finalized
            };
            calls.push((Instant::now(), verdict));
            verdict
        }
    }

    async fn drive<'a>(watchdog: &Watchdog, target: &ScriptedTarget<'a>, window: Duration) {
        select(run_watchdog(watchdog, target), Timer::after(window)).await;
    }

    #[test]
    fn expiry_fires_once_and_no_earlier_than_the_timeout() {
        block_on(async {
            let watchdog = Watchdog::new(Duration::from_millis(20));
            let target = ScriptedTarget::new(&watchdog, false);

            let armed_at = Instant::now();
            watchdog.rearm();
            drive(&watchdog, &target, Duration::from_millis(100)).await;

            let calls = target.calls.borrow();
            assert_eq!(calls.len(), 1);
            let (fired_at, verdict) = calls[0];
            assert_eq!(verdict, WatchdogVerdict::Finalized);
            assert!(fired_at >= armed_at + Duration::from_millis(20));
        });
    }

    #[test]
    fn rearm_during_retry_backoff_supersedes_the_stale_expiry() {
        block_on(async {
            let watchdog = Watchdog::new(Duration::from_millis(20));
            let target = ScriptedTarget::new(&watchdog, true);

            watchdog.rearm();
            drive(&watchdog, &target, Duration::from_millis(120)).await;

            let calls = target.calls.borrow();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].1, WatchdogVerdict::Retry);
            assert_eq!(calls[1].1, WatchdogVerdict::Finalized);
            // The rearm that landed during the backoff restarts the full
            // timeout; a stale expiry would re-fire right after the 2 ms
            // backoff instead.
            assert!(calls[1].0 >= calls[0].0 + Duration::from_millis(10));
        });
    }

    #[test]
    fn rearm_pushes_the_deadline_past_the_timeout() {
        let watchdog = Watchdog::new(Duration::from_millis(80));
        assert!(watchdog.try_rearmed().is_none());

        let before = Instant::now();
        watchdog.rearm();
        let deadline = watchdog.try_rearmed().unwrap();
        assert!(deadline >= before + Duration::from_millis(80));
        assert!(deadline <= Instant::now() + Duration::from_millis(80));
    }

    #[test]
    fn only_the_latest_rearm_survives() {
        let watchdog = Watchdog::new(Duration::from_millis(10));
        watchdog.rearm();
        let first = watchdog.try_rearmed().unwrap();
        watchdog.rearm();
        watchdog.rearm();
        let last = watchdog.try_rearmed().unwrap();
        assert!(last >= first);
        assert!(watchdog.try_rearmed().is_none());
    }
}
