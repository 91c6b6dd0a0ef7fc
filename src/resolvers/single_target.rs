use crate::{
    resolvers::{ModeResolver, Resolution},
    state::{
        match_config::MatchConfig,
        match_state::{DETONATION_SECONDS, MatchState},
        state_machine::MatchEvent,
    },
};

/// Arm the objective when its code is scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleTarget;

impl ModeResolver for SingleTarget {
    fn resolve(&self, config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution {
        if scan != config.target_code {
            return Resolution::reject(state, format!("Invalid code: {scan}"));
        }

        let mut next = state.clone();
        next.scan_success_count += 1;
        next.message = format!("Bomb armed. Detonation in {DETONATION_SECONDS} seconds.");
        Resolution::transition(next, MatchEvent::ArmBomb)
    }
}
