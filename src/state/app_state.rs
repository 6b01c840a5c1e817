//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    error::{ClockError, Result},
    scheduler::{IntervalScheduler, TickId},
};
use super::{ClockView, Phase, SessionClock, Snapshot, TickOutcome};

/// The clock type hosted by the server
pub type HostedClock = SessionClock<IntervalScheduler>;

/// Main application state that hosts the session clock
#[derive(Debug)]
pub struct AppState {
    /// The one clock for this process
    clock: Mutex<HostedClock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel carrying the latest clock view to presentation listeners
    pub view_tx: watch::Sender<ClockView>,
    /// Keep the receiver alive to prevent channel closure
    pub _view_rx: watch::Receiver<ClockView>,
}

impl AppState {
    /// Host `clock` behind the HTTP surface
    pub fn new(port: u16, host: String, clock: HostedClock) -> Self {
        let (view_tx, view_rx) = watch::channel(clock.view());

        Self {
            clock: Mutex::new(clock),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            view_tx,
            _view_rx: view_rx,
        }
    }

    fn lock_clock(&self) -> Result<MutexGuard<'_, HostedClock>> {
        self.clock
            .lock()
            .map_err(|e| ClockError::StateLock(e.to_string()))
    }

    /// Apply a control operation and publish the resulting view
    pub fn update_clock<F>(&self, action: &str, updater: F) -> Result<ClockView>
    where
        F: FnOnce(&mut HostedClock) -> Result<()>,
    {
        let mut clock = self.lock_clock()?;
        updater(&mut *clock)?;
        let view = clock.view();
        drop(clock); // Release the lock early

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(view.clone());
        Ok(view)
    }

    pub fn start(&self) -> Result<ClockView> {
        info!("Starting clock");
        self.update_clock("start", |clock| {
            clock.start();
            Ok(())
        })
    }

    pub fn pause(&self) -> Result<ClockView> {
        info!("Pausing clock");
        self.update_clock("pause", |clock| {
            clock.pause();
            Ok(())
        })
    }

    pub fn reset(&self) -> Result<ClockView> {
        info!("Resetting clock");
        self.update_clock("reset", |clock| {
            clock.reset();
            Ok(())
        })
    }

    /// Retune `phase` from user-entered minutes
    pub fn set_duration(&self, phase: Phase, minutes: &str) -> Result<ClockView> {
        self.update_clock(&format!("duration-{}", phase), |clock| {
            clock.set_duration(phase, minutes)
        })
    }

    /// Deliver a scheduled tick and publish the view if anything changed
    pub fn deliver_tick(&self, id: TickId) -> Result<TickOutcome> {
        let mut clock = self.lock_clock()?;
        let outcome = clock.deliver(id);
        if outcome == TickOutcome::Ignored {
            return Ok(outcome);
        }
        let view = clock.view();
        drop(clock);

        self.publish(view);
        Ok(outcome)
    }

    /// Get the current clock view
    pub fn clock_view(&self) -> Result<ClockView> {
        Ok(self.lock_clock()?.view())
    }

    /// Id of the outstanding tick schedule, if the clock is running
    pub fn active_tick(&self) -> Result<Option<TickId>> {
        Ok(self.lock_clock()?.active_tick())
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.lock_clock()?.snapshot())
    }

    /// Subscribe to published clock views
    pub fn subscribe(&self) -> watch::Receiver<ClockView> {
        self.view_tx.subscribe()
    }

    fn publish(&self, view: ClockView) {
        if let Err(e) = self.view_tx.send(view) {
            warn!("Failed to publish clock view: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
