use crate::{
    resolvers::{ModeResolver, Resolution},
    state::{match_config::MatchConfig, match_state::MatchState},
};

/// Capture the control point for the side selected on this device.
///
/// Never requests a transition; control time is settled when the clock runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaControl;

impl ModeResolver for AreaControl {
    fn resolve(&self, config: &MatchConfig, state: &MatchState, scan: &str) -> Resolution {
        let Some(side) = state.selected_side else {
            return Resolution::reject(state, "Select a side (RED or GREEN) before scanning.");
        };

        if scan != config.control_code {
            return Resolution::reject(state, format!("Invalid control point code: {scan}"));
        }

        if state.holder == Some(side) {
            return Resolution::reject(state, format!("Control point already held by {side}."));
        }

        let mut next = state.clone();
        next.holder = Some(side);
        next.scan_success_count += 1;
        next.message = format!("Control point captured by {side}.");
        Resolution::stay(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resolvers::test_support::running,
        state::{match_config::GameMode, match_state::Side},
    };

    #[test]
    fn scanning_without_side_is_rejected() {
        let (config, state) = running(GameMode::AreaControl);
        let resolution = AreaControl.resolve(&config, &state, "KING-POINT-01");
        assert_eq!(resolution.next.holder, None);
        assert_eq!(
            resolution.next.message,
            "Select a side (RED or GREEN) before scanning."
        );
    }

    #[test]
    fn capture_recapture_and_transfer() {
        let (config, mut state) = running(GameMode::AreaControl);
        state.selected_side = Some(Side::Red);

        let captured = AreaControl.resolve(&config, &state, "KING-POINT-01");
        assert_eq!(captured.next.holder, Some(Side::Red));
        assert_eq!(captured.next.scan_success_count, 1);
        assert_eq!(captured.request, None);

        let again = AreaControl.resolve(&config, &captured.next, "KING-POINT-01");
        assert_eq!(again.next.scan_success_count, 1);
        assert_eq!(again.next.message, "Control point already held by RED.");

        let mut green = again.next.clone();
        green.selected_side = Some(Side::Green);
        let transferred = AreaControl.resolve(&config, &green, "KING-POINT-01");
        assert_eq!(transferred.next.holder, Some(Side::Green));
        assert_eq!(transferred.next.scan_success_count, 2);
    }

    #[test]
    fn wrong_marker_is_rejected() {
        let (config, mut state) = running(GameMode::AreaControl);
        state.selected_side = Some(Side::Green);
        let resolution = AreaControl.resolve(&config, &state, "KING-POINT-02");
        assert_eq!(resolution.next.holder, None);
        assert_eq!(
            resolution.next.message,
            "Invalid control point code: KING-POINT-02"
        );
    }
}
