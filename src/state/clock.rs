//! Phase-cycling countdown engine
//!
//! [`SessionClock`] owns the durations, the current phase, the remaining
//! seconds and the run flag. It is driven from outside: control operations
//! come from the API, ticks come from whatever [`TickScheduler`] it was built
//! with. When a phase runs out the clock flips to the other phase and keeps
//! running without waiting for anyone.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ClockError,
    scheduler::{TickHandle, TickId, TickScheduler, TICK_PERIOD},
};

use super::{phase::parse_minutes, Durations, Phase, Snapshot};

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
}

/// Display-ready projection of the clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadModel {
    pub display_minutes: String,
    pub display_seconds: String,
    pub progress_fraction: f64,
}

impl ReadModel {
    /// Compute the read model for `remaining_seconds` out of `duration_seconds`
    pub fn compute(remaining_seconds: u64, duration_seconds: u64) -> Self {
        let progress_fraction = if duration_seconds == 0 {
            1.0
        } else {
            (1.0 - remaining_seconds as f64 / duration_seconds as f64).clamp(0.0, 1.0)
        };

        Self {
            display_minutes: format!("{:02}", remaining_seconds / 60),
            display_seconds: format!("{:02}", remaining_seconds % 60),
            progress_fraction,
        }
    }

    /// `MM:SS` readout
    pub fn label(&self) -> String {
        format!("{}:{}", self.display_minutes, self.display_seconds)
    }
}

/// Everything a presentation layer needs after a state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockView {
    #[serde(flatten)]
    pub state: ClockState,
    pub durations: Durations,
    pub read_model: ReadModel,
    pub label: String,
}

/// What a delivered tick did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was paused or the tick came from a cancelled schedule
    Ignored,
    /// One second was counted down within the current phase
    Counted,
    /// The phase expired and the clock moved on to the given phase
    PhaseChanged(Phase),
}

/// The session clock state machine
pub struct SessionClock<S: TickScheduler> {
    durations: Durations,
    state: ClockState,
    scheduler: S,
    ticker: Option<(TickId, S::Handle)>,
    next_tick_id: TickId,
}

impl<S: TickScheduler> SessionClock<S> {
    /// A paused clock at the start of a work phase
    pub fn new(durations: Durations, scheduler: S) -> Self {
        Self::restore(durations, None, scheduler)
    }

    /// A paused clock resumed from `snapshot`, or fresh when there is none
    ///
    /// Restored remaining time never exceeds the phase's configured duration.
    pub fn restore(durations: Durations, snapshot: Option<Snapshot>, scheduler: S) -> Self {
        let state = match snapshot {
            Some(snapshot) => ClockState {
                phase: snapshot.phase,
                remaining_seconds: snapshot
                    .remaining_seconds
                    .min(durations.get(snapshot.phase)),
                running: false,
            },
            None => ClockState {
                phase: Phase::Work,
                remaining_seconds: durations.get(Phase::Work),
                running: false,
            },
        };

        Self {
            durations,
            state,
            scheduler,
            ticker: None,
            next_tick_id: 1,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Id of the outstanding tick schedule, if any
    pub fn active_tick(&self) -> Option<TickId> {
        self.ticker.as_ref().map(|(id, _)| *id)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Begin counting down; a no-op while already running
    pub fn start(&mut self) {
        if self.state.running {
            debug!("Start ignored, clock already running");
            return;
        }

        self.cancel_ticker();
        self.state.running = true;

        let id = self.next_tick_id;
        self.next_tick_id += 1;
        let handle = self.scheduler.schedule(id, TICK_PERIOD);
        self.ticker = Some((id, handle));

        debug!(
            "Clock started in {} phase with {}s remaining (schedule {})",
            self.state.phase, self.state.remaining_seconds, id
        );
    }

    /// Stop counting down, keeping the remaining time; a no-op while paused
    pub fn pause(&mut self) {
        if !self.state.running {
            debug!("Pause ignored, clock not running");
            return;
        }

        self.cancel_ticker();
        self.state.running = false;
        debug!("Clock paused with {}s remaining", self.state.remaining_seconds);
    }

    /// Return to a paused work phase at full length, discarding all progress
    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.state = ClockState {
            phase: Phase::Work,
            remaining_seconds: self.durations.get(Phase::Work),
            running: false,
        };
        debug!("Clock reset to {}s of work", self.state.remaining_seconds);
    }

    /// Retune a phase from a user-entered minute count
    ///
    /// Invalid input leaves every duration untouched.
    pub fn set_duration(&mut self, phase: Phase, minutes: &str) -> Result<(), ClockError> {
        let seconds = parse_minutes(minutes)?;
        self.apply_duration(phase, seconds);
        Ok(())
    }

    /// Retune a phase from a typed minute count
    pub fn set_duration_minutes(&mut self, phase: Phase, minutes: u64) -> Result<(), ClockError> {
        let seconds = minutes
            .checked_mul(60)
            .filter(|seconds| *seconds > 0)
            .ok_or_else(|| ClockError::invalid_duration(minutes.to_string()))?;
        self.apply_duration(phase, seconds);
        Ok(())
    }

    fn apply_duration(&mut self, phase: Phase, seconds: u64) {
        self.durations.set(phase, seconds);

        // Only a paused clock sitting in the retuned phase picks up the new
        // length now; everything else waits for that phase's next start.
        if !self.state.running && self.state.phase == phase {
            self.state.remaining_seconds = seconds;
        }

        info!("{} duration set to {}s", phase, seconds);
    }

    /// Deliver a tick produced by schedule `id`
    ///
    /// Ticks from any schedule other than the outstanding one are dropped.
    pub fn deliver(&mut self, id: TickId) -> TickOutcome {
        if self.active_tick() != Some(id) {
            debug!("Dropping stale tick from schedule {}", id);
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Count down one second, flipping phase when time runs out
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Ignored;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return TickOutcome::Counted;
        }

        self.cancel_ticker();
        self.state.running = false;

        let next = self.state.phase.opposite();
        self.state.phase = next;
        self.state.remaining_seconds = self.durations.get(next);
        info!("Phase complete, switching to {} for {}s", next, self.state.remaining_seconds);

        self.start();
        TickOutcome::PhaseChanged(next)
    }

    pub fn read_model(&self) -> ReadModel {
        ReadModel::compute(
            self.state.remaining_seconds,
            self.durations.get(self.state.phase),
        )
    }

    pub fn view(&self) -> ClockView {
        let read_model = self.read_model();
        ClockView {
            state: self.state,
            durations: self.durations,
            label: read_model.label(),
            read_model,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state.phase, self.state.remaining_seconds)
    }

    fn cancel_ticker(&mut self) {
        if let Some((_, handle)) = self.ticker.take() {
            handle.cancel();
        }
    }
}

impl<S: TickScheduler> fmt::Debug for SessionClock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClock")
            .field("state", &self.state)
            .field("durations", &self.durations)
            .field("active_tick", &self.active_tick())
            .finish()
    }
}

impl<S: TickScheduler> Drop for SessionClock<S> {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
