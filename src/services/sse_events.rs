use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::MatchSnapshot,
        sse::{PhaseChangedEvent, ServerEvent},
    },
    state::{AppState, match_state::MatchState, state_machine::MatchPhase},
};

const EVENT_SNAPSHOT: &str = "match.snapshot";
const EVENT_PHASE_CHANGED: &str = "phase_changed";

/// Broadcast a freshly published snapshot.
pub fn broadcast_snapshot(state: &AppState, snapshot: &MatchState) {
    send_public_event(state, EVENT_SNAPSHOT, &MatchSnapshot::from(snapshot));
}

/// Broadcast a match phase change notification.
pub fn broadcast_phase_changed(state: &AppState, from: MatchPhase, to: MatchPhase, epoch: u64) {
    let payload = PhaseChangedEvent { from, to, epoch };
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
}

fn send_public_event(state: &AppState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
