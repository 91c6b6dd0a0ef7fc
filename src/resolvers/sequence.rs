use crate::{
    resolvers::{ModeResolver, Resolution},
    state::{match_config::MatchConfig, match_state::MatchState, state_machine::MatchEvent},
};

/// Scan the codes in play in their configured order; a wrong code restarts the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequence;

impl ModeResolver for Sequence {
    fn resolve(&self, config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution {
        let codes = config.active_codes();
        let target = codes.len();
        let expected = usize::from(state.sequence_progress);

        if expected >= target {
            return Resolution::stay(state.clone());
        }

        if codes[..expected].iter().any(|code| code == scan) {
            return Resolution::reject(state, "Code already confirmed in the sequence.");
        }

        let mut next = state.clone();
        if scan != codes[expected] {
            next.sequence_progress = 0;
            next.found = Default::default();
            next.message = "Wrong order. Sequence restarted.".into();
            return Resolution::stay(next);
        }

        let progress = expected + 1;
        next.sequence_progress = progress as u8;
        for (index, found) in next.found.iter_mut().enumerate() {
            *found = index < progress;
        }
        next.scan_success_count += 1;

        if progress >= target {
            next.message = format!("Sequence complete ({target}/{target}).");
            return Resolution::transition(next, MatchEvent::CodesCompleted);
        }

        next.message = format!("Correct sequence ({progress}/{target}).");
        Resolution::stay(next)
    }
}
