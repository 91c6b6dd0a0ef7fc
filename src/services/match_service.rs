//! Operator control surface: start, return to setup, abort and side selection.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::ServiceError,
    state::{
        SharedState,
        match_config::GameMode,
        match_state::{MatchState, Side},
        state_machine::{MatchEvent, MatchPhase},
        transitions::run_transition,
    },
};

const ABORT_MESSAGE: &str = "Mission aborted by the operator.";

/// Latest published snapshot.
pub fn current_snapshot(state: &SharedState) -> MatchState {
    state.snapshot()
}

/// Freeze the setup configuration and start a new match.
pub async fn start_match(state: &SharedState) -> Result<MatchState, ServiceError> {
    let mut core = state.lock_core().await;
    let frozen = Arc::new(core.setup.clone());
    let next = MatchState::kickoff(&frozen);

    run_transition(state, &mut core, MatchEvent::StartMatch, next)?;
    core.live = frozen;
    info!(mode = ?core.live.mode, epoch = core.machine.epoch(), "match started");
    Ok(core.state.clone())
}

/// Leave a finished match and show the setup preview again.
pub async fn return_to_setup(state: &SharedState) -> Result<MatchState, ServiceError> {
    let mut core = state.lock_core().await;
    let next = MatchState::setup_view(&core.setup, core.machine.epoch());
    run_transition(state, &mut core, MatchEvent::ReturnToSetup, next)?;
    Ok(core.state.clone())
}

/// Abort the live match immediately.
pub async fn abort_match(state: &SharedState) -> Result<MatchState, ServiceError> {
    let mut core = state.lock_core().await;
    let mut next = core.state.clone();
    next.message = ABORT_MESSAGE.into();
    run_transition(state, &mut core, MatchEvent::Abort, next)?;
    Ok(core.state.clone())
}

/// Abort only if the match started as `epoch` is still the current one.
///
/// Returns `Ok(None)` when a newer match has started since.
pub async fn abort_match_if_current(
    state: &SharedState,
    epoch: u64,
) -> Result<Option<MatchState>, ServiceError> {
    let mut core = state.lock_core().await;
    if core.machine.epoch() != epoch {
        debug!(epoch, current = core.machine.epoch(), "stale abort ignored");
        return Ok(None);
    }

    let mut next = core.state.clone();
    next.message = ABORT_MESSAGE.into();
    run_transition(state, &mut core, MatchEvent::Abort, next)?;
    Ok(Some(core.state.clone()))
}

/// Choose the side this device scans for in an area-control match.
pub async fn select_side(state: &SharedState, side: Side) -> Result<MatchState, ServiceError> {
    let mut core = state.lock_core().await;
    if core.machine.phase() != MatchPhase::Running {
        return Err(ServiceError::InvalidState(
            "a side can only be selected while the match is running".into(),
        ));
    }
    if core.live.mode != GameMode::AreaControl {
        return Err(ServiceError::InvalidState(
            "side selection only applies to area-control matches".into(),
        ));
    }

    let mut next = core.state.clone();
    next.selected_side = Some(side);
    next.message = format!("Active side: {side}");
    state.publish(&mut core, next);
    Ok(core.state.clone())
}
