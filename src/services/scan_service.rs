//! Event gateway: every scan payload enters the engine here.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    resolvers,
    state::{
        MatchCore, SharedState,
        match_config::{AdminScanTarget, normalize_code},
        match_state::MatchState,
        state_machine::{MatchEvent, MatchPhase},
        transitions::run_transition,
    },
};

/// Rolling window enforced between two gate-passing scans.
#[derive(Debug, Clone)]
pub struct ScanDebounce {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl ScanDebounce {
    /// Debounce with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Admit a scan arriving at `now`, recording it as the last accepted one.
    ///
    /// A refused scan leaves the timestamp untouched.
    pub fn admit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Why the gateway dropped a scan before resolving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The match is not running.
    PhaseClosed,
    /// Arrived inside the debounce window.
    Debounced,
}

/// Gateway decision for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Recorded as last scan only.
    Ignored(IgnoredReason),
    /// Dispatched to the mode resolver.
    Resolved {
        /// Phase entered because of the scan, if any.
        transition: Option<MatchPhase>,
    },
}

/// Gateway decision together with the snapshot it produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// What happened to the scan.
    pub outcome: ScanOutcome,
    /// Snapshot published for the scan.
    pub snapshot: MatchState,
}

/// Feed one raw scan payload into the running match.
///
/// The normalized text always becomes the last scan. Outside the running phase,
/// or inside the debounce window, nothing else changes.
pub async fn submit_scan(state: &SharedState, raw: &str) -> ScanReport {
    let scan = normalize_code(raw);
    let now = state.clock().now();
    let mut core = state.lock_core().await;

    let mut recorded = core.state.clone();
    recorded.last_scan = scan.clone();

    let phase = core.machine.phase();
    if !phase.accepts_scans() {
        debug!(scan = %scan, ?phase, "scan outside a running match dropped");
        state.publish(&mut core, recorded.clone());
        return ScanReport {
            outcome: ScanOutcome::Ignored(IgnoredReason::PhaseClosed),
            snapshot: recorded,
        };
    }

    if !core.debounce.admit(now) {
        debug!(scan = %scan, "scan debounced");
        state.publish(&mut core, recorded.clone());
        return ScanReport {
            outcome: ScanOutcome::Ignored(IgnoredReason::Debounced),
            snapshot: recorded,
        };
    }

    let live = Arc::clone(&core.live);
    info!(scan = %scan, mode = ?live.mode, "scan accepted");
    let resolution = resolvers::resolve(&live, &recorded, &scan);

    let transition = match resolution.request {
        None => {
            state.publish(&mut core, resolution.next);
            None
        }
        Some(event) => resolve_transition(state, &mut core, event, resolution.next, recorded),
    };

    ScanReport {
        outcome: ScanOutcome::Resolved { transition },
        snapshot: core.state.clone(),
    }
}

fn resolve_transition(
    state: &SharedState,
    core: &mut MatchCore,
    event: MatchEvent,
    next: MatchState,
    recorded: MatchState,
) -> Option<MatchPhase> {
    match run_transition(state, core, event, next) {
        Ok(phase) => Some(phase),
        Err(err) => {
            warn!(error = %err, ?event, "scan requested an impossible transition");
            state.publish(core, recorded);
            None
        }
    }
}

/// Write a camera-read code into the setup configuration.
///
/// Works in every phase and bypasses the gate and the debounce. Blank input is
/// discarded and returns `None`.
pub async fn submit_admin_scan(
    state: &SharedState,
    target: AdminScanTarget,
    raw: &str,
) -> Option<MatchState> {
    let code = normalize_code(raw);
    if code.is_empty() {
        debug!(?target, "blank admin scan discarded");
        return None;
    }

    let mut core = state.lock_core().await;
    info!(?target, code = %code, "admin scan stored in setup configuration");
    let message = core.setup.apply_admin_scan(target, code);

    let mut next = core.state.clone();
    next.message = message;
    if core.machine.phase() == MatchPhase::Setup {
        next.sync_with_setup(&core.setup);
    }
    state.publish(&mut core, next.clone());
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, services::match_service, state::AppState};

    #[test]
    fn debounce_window_is_measured_from_last_accepted_scan() {
        let start = Instant::now();
        let mut debounce = ScanDebounce::new(Duration::from_millis(1200));

        assert!(debounce.admit(start));
        assert!(!debounce.admit(start + Duration::from_millis(600)));
        assert!(!debounce.admit(start + Duration::from_millis(1199)));
        assert!(debounce.admit(start + Duration::from_millis(1200)));
    }

    #[tokio::test(start_paused = true)]
    async fn setup_scan_only_touches_last_scan() {
        let state = AppState::new(AppConfig::default());
        let before = state.snapshot();

        let report = submit_scan(&state, "  airsoft-alpha-01 ").await;
        assert_eq!(
            report.outcome,
            ScanOutcome::Ignored(IgnoredReason::PhaseClosed)
        );

        let mut expected = before;
        expected.last_scan = "AIRSOFT-ALPHA-01".into();
        assert_eq!(state.snapshot(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_scan_is_inert() {
        let state = AppState::new(AppConfig::default());
        match_service::start_match(&state).await.unwrap();

        let first = submit_scan(&state, "wrong").await;
        assert_eq!(first.outcome, ScanOutcome::Resolved { transition: None });
        assert_eq!(first.snapshot.message, "Invalid code: WRONG");

        tokio::time::advance(Duration::from_millis(300)).await;
        let second = submit_scan(&state, "airsoft-alpha-01").await;
        assert_eq!(
            second.outcome,
            ScanOutcome::Ignored(IgnoredReason::Debounced)
        );
        assert_eq!(second.snapshot.phase, MatchPhase::Running);
        assert_eq!(second.snapshot.message, "Invalid code: WRONG");
        assert_eq!(second.snapshot.last_scan, "AIRSOFT-ALPHA-01");
    }

    #[tokio::test(start_paused = true)]
    async fn admin_scan_discards_blank_and_writes_setup() {
        let state = AppState::new(AppConfig::default());

        assert!(
            submit_admin_scan(&state, AdminScanTarget::Code2, "   ")
                .await
                .is_none()
        );

        let snapshot = submit_admin_scan(&state, AdminScanTarget::Code2, " bunker-7 ")
            .await
            .unwrap();
        assert_eq!(snapshot.message, "Code 2 loaded: BUNKER-7");
        assert_eq!(state.lock_core().await.setup.codes[1], "BUNKER-7");
    }

    #[tokio::test(start_paused = true)]
    async fn admin_scan_mid_match_leaves_live_config_alone() {
        let state = AppState::new(AppConfig::default());
        match_service::start_match(&state).await.unwrap();

        submit_admin_scan(&state, AdminScanTarget::TargetCode, "new-target")
            .await
            .unwrap();

        let core = state.lock_core().await;
        assert_eq!(core.setup.target_code, "NEW-TARGET");
        assert_eq!(core.live.target_code, "AIRSOFT-ALPHA-01");
    }
}
