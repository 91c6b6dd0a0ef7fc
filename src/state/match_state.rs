//! The single mutable snapshot of where the match currently is.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{
    match_config::{GameMode, MAX_CODES, MatchConfig},
    state_machine::MatchPhase,
};

/// Seconds on the detonation countdown once the objective is armed.
pub const DETONATION_SECONDS: u32 = 10;

const SETUP_MESSAGE: &str = "Configure the match and press Start.";

/// Team affiliation in area-control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Red team.
    Red,
    /// Green team.
    Green,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => f.write_str("RED"),
            Side::Green => f.write_str("GREEN"),
        }
    }
}

/// Seconds each side has held the control point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ControlSeconds {
    /// Seconds credited to red.
    pub red: u32,
    /// Seconds credited to green.
    pub green: u32,
}

impl ControlSeconds {
    /// Credit one tick of control to `side`.
    pub fn credit(&mut self, side: Side) {
        match side {
            Side::Red => self.red += 1,
            Side::Green => self.green += 1,
        }
    }

    /// Side with strictly more control time, `None` on a tie.
    pub fn leader(&self) -> Option<Side> {
        match self.red.cmp(&self.green) {
            Ordering::Greater => Some(Side::Red),
            Ordering::Less => Some(Side::Green),
            Ordering::Equal => None,
        }
    }
}

/// Published match snapshot. Every mutation replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    /// Current phase.
    pub phase: MatchPhase,
    /// Mode the snapshot was built for.
    pub mode: GameMode,
    /// Codes in play for set and sequence modes.
    pub target_count: u8,
    /// Seconds left on the match countdown.
    pub match_remaining_seconds: u32,
    /// Seconds left on the detonation countdown.
    pub detonation_remaining_seconds: u32,
    /// Found marker per code slot.
    pub found: [bool; MAX_CODES],
    /// Index of the next expected code in sequence mode.
    pub sequence_progress: u8,
    /// Side currently holding the control point.
    pub holder: Option<Side>,
    /// Accumulated control time per side.
    pub control_seconds: ControlSeconds,
    /// Side this device scans for in area-control mode.
    pub selected_side: Option<Side>,
    /// Last normalized scan text, rejected scans included.
    pub last_scan: String,
    /// Human-readable status line.
    pub message: String,
    /// Bumped on every successful scan so collaborators can play feedback.
    pub scan_success_count: u32,
    /// Generation of the match this snapshot belongs to.
    pub epoch: u64,
}

impl MatchState {
    /// Idle snapshot previewing the setup configuration.
    pub fn setup_view(config: &MatchConfig, epoch: u64) -> Self {
        Self {
            phase: MatchPhase::Setup,
            mode: config.mode,
            target_count: config.target_count,
            match_remaining_seconds: config.duration_seconds(),
            detonation_remaining_seconds: DETONATION_SECONDS,
            found: [false; MAX_CODES],
            sequence_progress: 0,
            holder: None,
            control_seconds: ControlSeconds::default(),
            selected_side: None,
            last_scan: String::new(),
            message: SETUP_MESSAGE.into(),
            scan_success_count: 0,
            epoch,
        }
    }

    /// Fresh snapshot for a match about to start with `config`.
    pub fn kickoff(config: &MatchConfig) -> Self {
        let message = match config.mode {
            GameMode::SingleTarget => "Match started. Scan the objective code.".to_string(),
            GameMode::NOfSet => format!("Match started. Find {} codes.", config.target_count),
            GameMode::Sequence => "Match started. Scan the codes in order.".to_string(),
            GameMode::AreaControl => {
                "Match started. Scan the control point to capture it and earn time.".to_string()
            }
        };

        Self {
            phase: MatchPhase::Running,
            message,
            ..Self::setup_view(config, 0)
        }
    }

    /// Refresh the setup preview after the configuration changed.
    pub fn sync_with_setup(&mut self, config: &MatchConfig) {
        self.mode = config.mode;
        self.target_count = config.target_count;
        self.match_remaining_seconds = config.duration_seconds();
    }

    /// Found markers set among the slots in play.
    pub fn found_count(&self) -> usize {
        self.found
            .iter()
            .take(usize::from(self.target_count))
            .filter(|found| **found)
            .count()
    }
}

/// Format seconds as `MM:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
