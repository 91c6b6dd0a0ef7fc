//! Per-mode scan resolution.
//!
//! A resolver is a pure decision: given the frozen configuration, the current
//! snapshot and a normalized scan, it returns the next snapshot and at most one
//! phase transition request. Timers, publishing and the state machine are the
//! caller's business.

mod area_control;
mod n_of_set;
mod sequence;
mod single_target;

use crate::state::{
    match_config::{GameMode, MatchConfig},
    match_state::MatchState,
    state_machine::{MatchEvent, MatchPhase},
};

pub use self::{
    area_control::AreaControl, n_of_set::NOfSet, sequence::Sequence, single_target::SingleTarget,
};

/// Outcome of resolving one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Snapshot to publish.
    pub next: MatchState,
    /// Transition the scan asks the state machine for.
    pub request: Option<MatchEvent>,
}

impl Resolution {
    /// Publish `next` without changing phase.
    pub fn stay(next: MatchState) -> Self {
        Self {
            next,
            request: None,
        }
    }

    /// Publish `next` and request `event`.
    pub fn transition(next: MatchState, event: MatchEvent) -> Self {
        Self {
            next,
            request: Some(event),
        }
    }

    /// Rejected scan: only the status message changes.
    pub fn reject(current: &MatchState, message: impl Into<String>) -> Self {
        let mut next = current.clone();
        next.message = message.into();
        Self::stay(next)
    }
}

/// Decision logic for one game mode.
pub trait ModeResolver: Send + Sync {
    /// Resolve `scan` against `config` and `state`.
    fn resolve(&self, config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution;
}

/// Resolver for `mode`.
pub fn resolver_for(mode: GameMode) -> &'static dyn ModeResolver {
    match mode {
        GameMode::SingleTarget => &SingleTarget,
        GameMode::NOfSet => &NOfSet,
        GameMode::Sequence => &Sequence,
        GameMode::AreaControl => &AreaControl,
    }
}

/// Resolve through the resolver for `config.mode`; inert outside the running phase.
pub fn resolve(config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution {
    if state.phase != MatchPhase::Running {
        return Resolution::stay(state.clone());
    }
    resolver_for(config.mode).resolve(config, state, scan)
}


#[cfg(test)]
mod tests {
    use super::{test_support::running, *};

    #[test]
    fn resolution_is_inert_outside_running() {
        let (config, mut state) = running(GameMode::SingleTarget);
        state.phase = MatchPhase::BombArmed;
        let resolution = resolve(&config, &state, &config.target_code);
        assert_eq!(resolution, Resolution::stay(state));
    }

    #[test]
    fn dispatches_on_configured_mode() {
        let (config, state) = running(GameMode::NOfSet);
        let resolution = resolve(&config, &state, "A");
        assert!(resolution.next.found[0]);
    }
}
