//! Recurring tick scheduling
//!
//! The clock never sleeps on its own. It asks a [`TickScheduler`] for a
//! recurring one-second tick and keeps the returned handle so it can cancel
//! it. Every tick carries the [`TickId`] of the schedule that produced it, which
//! lets the clock drop ticks that were already queued when their schedule was
//! cancelled.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Identifies one recurring tick schedule
pub type TickId = u64;

/// Period between ticks of a running clock
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable handle to an outstanding schedule
pub trait TickHandle {
    fn cancel(self);
}

/// Capability to start a recurring tick stream
pub trait TickScheduler {
    type Handle: TickHandle;

    /// Start delivering `id` every `period`, first delivery one period from now
    fn schedule(&mut self, id: TickId, period: Duration) -> Self::Handle;
}

/// Tokio-backed scheduler that sends tick ids over an mpsc channel
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    tx: mpsc::UnboundedSender<TickId>,
}

impl IntervalScheduler {
    /// Create a scheduler and the receiver the tick driver reads from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TickId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TickScheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn schedule(&mut self, id: TickId, period: Duration) -> Self::Handle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    debug!("Tick receiver closed, stopping schedule {}", id);
                    break;
                }
            }
        });

        IntervalHandle { id, task }
    }
}

/// Handle to a spawned interval task
#[derive(Debug)]
pub struct IntervalHandle {
    id: TickId,
    task: JoinHandle<()>,
}

impl TickHandle for IntervalHandle {
    fn cancel(self) {
        debug!("Cancelling tick schedule {}", self.id);
        self.task.abort();
    }
}

/// Record of what a [`ManualScheduler`] was asked to do
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScheduleLog {
    pub scheduled: Vec<TickId>,
    pub cancelled: Vec<TickId>,
}

impl ScheduleLog {
    /// Schedules that were started and not yet cancelled
    pub fn outstanding(&self) -> Vec<TickId> {
        self.scheduled
            .iter()
            .copied()
            .filter(|id| !self.cancelled.contains(id))
            .collect()
    }
}

/// Scheduler that never fires on its own; ticks are driven by hand
///
/// Clones share the same log, so a test can keep one clone and hand the other
/// to the clock.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    log: Arc<Mutex<ScheduleLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> ScheduleLog {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl TickScheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, id: TickId, _period: Duration) -> Self::Handle {
        if let Ok(mut log) = self.log.lock() {
            log.scheduled.push(id);
        }
        ManualHandle {
            id,
            log: Arc::clone(&self.log),
        }
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    id: TickId,
    log: Arc<Mutex<ScheduleLog>>,
}

impl TickHandle for ManualHandle {
    fn cancel(self) {
        if let Ok(mut log) = self.log.lock() {
            log.cancelled.push(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_tracks_outstanding() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule(1, TICK_PERIOD);
        let _second = scheduler.schedule(2, TICK_PERIOD);
        first.cancel();

        let log = scheduler.log();
        assert_eq!(log.scheduled, vec![1, 2]);
        assert_eq!(log.cancelled, vec![1]);
        assert_eq!(log.outstanding(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_delivers_id_each_period() {
        let (mut scheduler, mut rx) = IntervalScheduler::channel();
        let handle = scheduler.schedule(7, TICK_PERIOD);

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(rx.recv().await, Some(7));

        handle.cancel();
        tokio::time::sleep(TICK_PERIOD * 5).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_waits_one_period_before_first_tick() {
        let (mut scheduler, mut rx) = IntervalScheduler::channel();
        let _handle = scheduler.schedule(1, TICK_PERIOD);

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
