//! Match snapshot and control payloads shared by the REST routes and SSE events.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    services::{
        abort_hold::HoldStarted,
        scan_service::{IgnoredReason, ScanOutcome, ScanReport},
    },
    state::{
        match_config::GameMode,
        match_state::{ControlSeconds, MatchState, Side, format_clock},
        state_machine::MatchPhase,
    },
};

/// Full match snapshot as published to collaborators.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub mode: GameMode,
    pub target_count: u8,
    pub match_remaining_seconds: u32,
    /// `match_remaining_seconds` as `MM:SS`.
    pub match_clock: String,
    pub detonation_remaining_seconds: u32,
    /// Found marker per code slot, all five slots included.
    pub found: Vec<bool>,
    pub found_count: usize,
    pub sequence_progress: u8,
    pub holder: Option<Side>,
    pub control_seconds: ControlSeconds,
    pub selected_side: Option<Side>,
    pub last_scan: String,
    pub message: String,
    /// Bumped on every successful scan; diff it to trigger feedback.
    pub scan_success_count: u32,
    pub epoch: u64,
}

impl From<&MatchState> for MatchSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            phase: state.phase,
            mode: state.mode,
            target_count: state.target_count,
            match_remaining_seconds: state.match_remaining_seconds,
            match_clock: format_clock(state.match_remaining_seconds),
            detonation_remaining_seconds: state.detonation_remaining_seconds,
            found: state.found.to_vec(),
            found_count: state.found_count(),
            sequence_progress: state.sequence_progress,
            holder: state.holder,
            control_seconds: state.control_seconds,
            selected_side: state.selected_side,
            last_scan: state.last_scan.clone(),
            message: state.message.clone(),
            scan_success_count: state.scan_success_count,
            epoch: state.epoch,
        }
    }
}

/// Raw scan payload read by the optical collaborator.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScanRequest {
    #[validate(length(max = 256))]
    pub text: String,
}

/// How the gateway handled a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanDecision {
    /// Dropped because the match is not running.
    PhaseClosed,
    /// Dropped inside the debounce window.
    Debounced,
    /// Handed to the mode resolver.
    Resolved,
}

/// Gateway decision returned to the scanner.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    pub decision: ScanDecision,
    /// Phase entered because of this scan.
    pub transition: Option<MatchPhase>,
    pub snapshot: MatchSnapshot,
}

impl From<ScanOutcome> for ScanDecision {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Ignored(IgnoredReason::PhaseClosed) => ScanDecision::PhaseClosed,
            ScanOutcome::Ignored(IgnoredReason::Debounced) => ScanDecision::Debounced,
            ScanOutcome::Resolved { .. } => ScanDecision::Resolved,
        }
    }
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        let transition = match report.outcome {
            ScanOutcome::Resolved { transition } => transition,
            ScanOutcome::Ignored(_) => None,
        };
        Self {
            decision: report.outcome.into(),
            transition,
            snapshot: MatchSnapshot::from(&report.snapshot),
        }
    }
}

/// Side this device scans for.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectSideRequest {
    pub side: Side,
}

/// Issued when an abort hold starts.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoldTicket {
    pub id: Uuid,
    /// Seconds the hold must last before the abort fires.
    pub confirm_after_secs: u64,
}

impl From<HoldStarted> for HoldTicket {
    fn from(started: HoldStarted) -> Self {
        Self {
            id: started.id,
            confirm_after_secs: started.confirm_after.as_secs(),
        }
    }
}

/// Release a pending abort hold.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReleaseHoldRequest {
    pub id: Uuid,
}

/// Whether a pending hold was actually cancelled.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReleaseHoldResponse {
    pub released: bool,
}
