//! Executor wiring: bounded queues between the processors and their
//! consumers, queue-backed sink implementations, and the spawnable task
//! functions for the event pumps and watchdogs.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use static_cell::StaticCell;

use crate::config::{Action, ConfigError, GridConfig};
use crate::event::InputEvent;
use crate::processor::GridProcessor;
use crate::region::RegionProcessor;
use crate::sink::{ActionSink, RegionSink};
use crate::telemetry;
use crate::watchdog::run_watchdog;

pub const INPUT_QUEUE_DEPTH: usize = 16;
pub const ACTION_QUEUE_DEPTH: usize = 8;
pub const REGION_QUEUE_DEPTH: usize = 8;

/// Raw events from the sensor driver, one queue per processor instance.
pub type InputQueue = Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>;

/// One half of a press/release pair, ready for the behavior executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionQueueEntry {
    pub action: Action,
    pub pressed: bool,
    pub delay_ms: u32,
}

pub type ActionQueue = Channel<CriticalSectionRawMutex, ActionQueueEntry, ACTION_QUEUE_DEPTH>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionCommand {
    Activate(u8),
    Deactivate(u8),
}

pub type RegionQueue = Channel<CriticalSectionRawMutex, RegionCommand, REGION_QUEUE_DEPTH>;

/// Sink that forwards actions into a bounded queue. A full queue drops the
/// entry rather than blocking the input path; the consumer is expected to
/// drain far faster than gestures arrive.
pub struct QueueActionSink {
    queue: &'static ActionQueue,
}

impl QueueActionSink {
    pub const fn new(queue: &'static ActionQueue) -> Self {
        Self { queue }
    }
}

impl ActionSink for QueueActionSink {
    fn enqueue(&self, action: Action, pressed: bool, delay_ms: u32) {
        let entry = ActionQueueEntry {
            action,
            pressed,
            delay_ms,
        };
        if self.queue.try_send(entry).is_err() {
            telemetry::incr_actions_dropped();
            log::warn!("action queue full, dropping behavior {}", action.behavior);
        }
    }
}

pub struct QueueRegionSink {
    queue: &'static RegionQueue,
}

impl QueueRegionSink {
    pub const fn new(queue: &'static RegionQueue) -> Self {
        Self { queue }
    }
}

impl RegionSink for QueueRegionSink {
    fn activate(&self, region: u8) {
        if self.queue.try_send(RegionCommand::Activate(region)).is_err() {
            telemetry::incr_actions_dropped();
            log::warn!("region queue full, dropping activate {region}");
        }
    }

    fn deactivate(&self, region: u8) {
        if self.queue.try_send(RegionCommand::Deactivate(region)).is_err() {
            telemetry::incr_actions_dropped();
            log::warn!("region queue full, dropping deactivate {region}");
        }
    }
}

/// Construct a gesture processor in a static cell so its tasks can borrow
/// it for `'static`. Fails fast on a bad configuration.
pub fn init_grid(
    slot: &'static StaticCell<GridProcessor<QueueActionSink>>,
    config: GridConfig,
    actions: &'static ActionQueue,
) -> Result<&'static GridProcessor<QueueActionSink>, ConfigError> {
    let processor = GridProcessor::new(config, QueueActionSink::new(actions))?;
    Ok(slot.init(processor))
}

pub fn init_region(
    slot: &'static StaticCell<RegionProcessor<QueueRegionSink>>,
    config: GridConfig,
    regions: &'static RegionQueue,
) -> Result<&'static RegionProcessor<QueueRegionSink>, ConfigError> {
    let processor = RegionProcessor::new(config, QueueRegionSink::new(regions))?;
    Ok(slot.init(processor))
}

#[embassy_executor::task]
pub async fn grid_event_task(
    events: &'static InputQueue,
    processor: &'static GridProcessor<QueueActionSink>,
) -> ! {
    loop {
        let event = events.receive().await;
        // The pump owns this end of the stream, so the consume/continue
        // outcome has no one left to propagate to.
        let _ = processor.handle_event(event).await;
    }
}

#[embassy_executor::task]
pub async fn grid_watchdog_task(processor: &'static GridProcessor<QueueActionSink>) -> ! {
    run_watchdog(processor.watchdog(), processor).await
}

#[embassy_executor::task]
pub async fn region_event_task(
    events: &'static InputQueue,
    processor: &'static RegionProcessor<QueueRegionSink>,
) -> ! {
    loop {
        let event = events.receive().await;
        let _ = processor.handle_event(event).await;
    }
}

#[embassy_executor::task]
pub async fn region_watchdog_task(processor: &'static RegionProcessor<QueueRegionSink>) -> ! {
    run_watchdog(processor.watchdog(), processor).await
}
