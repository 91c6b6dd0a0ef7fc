use tracing::info;

use crate::{
    error::ServiceError,
    services::{
        sse_events::broadcast_phase_changed,
        timer_service::{TimerKind, spawn_ticker},
    },
    state::{
        MatchCore, SharedState,
        match_state::{DETONATION_SECONDS, MatchState},
        state_machine::{MatchEvent, MatchPhase},
    },
};

/// Apply `event` to the state machine and publish `next` under the resulting phase.
///
/// Every timer is cancelled first; the one serving the new phase, if any, is
/// spawned for the current epoch. Entering a terminal phase locks the admin
/// session. On an invalid transition nothing is published.
///
/// Never awaits, so a caller that is dropped cannot leave the machine ahead of
/// the published snapshot.
pub fn run_transition(
    state: &SharedState,
    core: &mut MatchCore,
    event: MatchEvent,
    mut next: MatchState,
) -> Result<MatchPhase, ServiceError> {
    let from = core.machine.phase();
    let phase = core.machine.apply(event)?;
    let epoch = core.machine.epoch();
    next.phase = phase;
    next.epoch = epoch;

    core.timers.cancel_all();
    match phase {
        MatchPhase::Running => {
            let handle = spawn_ticker(state, epoch, TimerKind::Match);
            core.timers.set(TimerKind::Match, handle);
        }
        MatchPhase::BombArmed => {
            next.detonation_remaining_seconds = DETONATION_SECONDS;
            let handle = spawn_ticker(state, epoch, TimerKind::Detonation);
            core.timers.set(TimerKind::Detonation, handle);
        }
        _ => {}
    }

    if phase.is_terminal() {
        state.admin_token().take();
    }

    info!(?from, to = ?phase, ?event, epoch, "match phase changed");
    state.publish(core, next);
    broadcast_phase_changed(state, from, phase, epoch);
    Ok(phase)
}
