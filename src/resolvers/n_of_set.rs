use crate::{
    resolvers::{ModeResolver, Resolution},
    state::{match_config::MatchConfig, match_state::MatchState, state_machine::MatchEvent},
};

/// Find every code in play, in any order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NOfSet;

impl ModeResolver for NOfSet {
    fn resolve(&self, config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution {
        let target = usize::from(config.target_count);
        let slot = config
            .active_codes()
            .iter()
            .position(|code| code == scan)
            .filter(|index| !state.found[*index]);
        let Some(index) = slot else {
            return Resolution::reject(state, "Code not valid or already found.");
        };

        let mut next = state.clone();
        next.found[index] = true;
        next.scan_success_count += 1;
        let count = next.found_count();

        if count >= target {
            next.message = format!("Objective complete: {count}/{target} codes found.");
            return Resolution::transition(next, MatchEvent::CodesCompleted);
        }

        next.message = format!("Code found ({count}/{target}).");
        Resolution::stay(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolvers::test_support::running, state::match_config::GameMode};

    #[test]
    fn codes_found_in_any_order_complete_the_set() {
        let (config, state) = running(GameMode::NOfSet);

        let first = NOfSet.resolve(&config, &state, "C");
        assert_eq!(first.next.found, [false, false, true, false, false]);
        assert_eq!(first.next.message, "Code found (1/3).");
        assert_eq!(first.request, None);

        let second = NOfSet.resolve(&config, &first.next, "A");
        let third = NOfSet.resolve(&config, &second.next, "B");
        assert_eq!(third.request, Some(MatchEvent::CodesCompleted));
        assert_eq!(third.next.message, "Objective complete: 3/3 codes found.");
        assert_eq!(third.next.scan_success_count, 3);
    }

    #[test]
    fn rescanning_a_found_code_is_idempotent() {
        let (config, state) = running(GameMode::NOfSet);
        let first = NOfSet.resolve(&config, &state, "B");
        let again = NOfSet.resolve(&config, &first.next, "B");

        assert_eq!(again.next.scan_success_count, 1);
        assert_eq!(again.next.found_count(), 1);
        assert_eq!(again.next.message, "Code not valid or already found.");
    }

    #[test]
    fn codes_outside_target_count_are_rejected() {
        let (config, state) = running(GameMode::NOfSet);
        let resolution = NOfSet.resolve(&config, &state, "D");
        assert_eq!(resolution.next.found_count(), 0);
        assert_eq!(resolution.request, None);
    }

    #[test]
    fn single_code_target_completes_immediately() {
        let (mut config, _) = running(GameMode::NOfSet);
        config.target_count = 1;
        let state = crate::state::match_state::MatchState::kickoff(&config);

        let resolution = NOfSet.resolve(&config, &state, "A");
        assert_eq!(resolution.request, Some(MatchEvent::CodesCompleted));
    }
}
