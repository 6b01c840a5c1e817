//! Tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    scheduler::TickId,
    state::{AppState, TickOutcome},
};

/// Background task that feeds scheduled ticks into the clock
///
/// Runs until every tick sender is gone, which happens once the clock (and
/// with it the scheduler) has been dropped.
pub async fn tick_driver_task(state: Arc<AppState>, mut ticks: mpsc::UnboundedReceiver<TickId>) {
    info!("Starting tick driver task");

    while let Some(id) = ticks.recv().await {
        match state.deliver_tick(id) {
            Ok(TickOutcome::Ignored) => {
                debug!("Tick from schedule {} ignored", id);
            }
            Ok(TickOutcome::Counted) => {}
            Ok(TickOutcome::PhaseChanged(phase)) => {
                debug!("Tick from schedule {} moved clock into {} phase", id, phase);
            }
            Err(e) => {
                error!("Failed to deliver tick: {}", e);
            }
        }
    }

    info!("Tick channel closed, tick driver stopping");
}
