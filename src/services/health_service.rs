use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload, logging where the match stands.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let snapshot = state.snapshot();
    debug!(phase = ?snapshot.phase, epoch = snapshot.epoch, "health check");
    HealthResponse::ok()
}
