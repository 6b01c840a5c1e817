//! Display background task

use std::sync::Arc;
use tracing::{debug, info};

use crate::{render::Ring, state::AppState};

/// Background task that renders every published clock view to the log
pub async fn display_task(state: Arc<AppState>) {
    info!("Starting display task");

    let mut views = state.subscribe();
    let mut last_phase = views.borrow().state.phase;

    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        let ring = Ring::from(&view.read_model);

        if view.state.phase != last_phase {
            info!("Now in {} phase ({})", view.state.phase, view.label);
            last_phase = view.state.phase;
        }

        debug!(
            "{} {} [{}] progress={:.3} offset={:.1}",
            view.state.phase,
            view.label,
            if view.state.running { "running" } else { "paused" },
            view.read_model.progress_fraction,
            ring.dash_offset,
        );
    }
}
