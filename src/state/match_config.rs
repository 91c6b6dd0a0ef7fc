//! Static per-mode setup entered before a match starts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of code slots available to the set and sequence modes.
pub const MAX_CODES: usize = 5;

const TARGET_COUNT_RANGE: (i64, i64) = (1, MAX_CODES as i64);
const WIN_SCORE_RANGE: (i64, i64) = (5, 200);
const DURATION_RANGE: (i64, i64) = (1, 240);

/// Ruleset deciding what a successful scan means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Scan one objective code to arm a bomb.
    SingleTarget,
    /// Find the first `target_count` codes in any order.
    NOfSet,
    /// Scan the first `target_count` codes in the configured order.
    Sequence,
    /// Hold a control point; time held is compared when the clock runs out.
    AreaControl,
}

impl GameMode {
    fn selected_message(self) -> &'static str {
        match self {
            GameMode::SingleTarget => "Single-target mode selected.",
            GameMode::NOfSet => "Find-N-codes mode selected.",
            GameMode::Sequence => "Sequence mode selected.",
            GameMode::AreaControl => "Area-control mode selected.",
        }
    }
}

/// Configuration field an admin scan writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminScanTarget {
    /// The single-target objective code.
    TargetCode,
    /// Code slot 1.
    Code1,
    /// Code slot 2.
    Code2,
    /// Code slot 3.
    Code3,
    /// Code slot 4.
    Code4,
    /// Code slot 5.
    Code5,
    /// The area-control marker.
    ControlPoint,
}

impl AdminScanTarget {
    fn code_index(self) -> Option<usize> {
        match self {
            AdminScanTarget::Code1 => Some(0),
            AdminScanTarget::Code2 => Some(1),
            AdminScanTarget::Code3 => Some(2),
            AdminScanTarget::Code4 => Some(3),
            AdminScanTarget::Code5 => Some(4),
            AdminScanTarget::TargetCode | AdminScanTarget::ControlPoint => None,
        }
    }
}

/// A single edit requested through the configuration surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChange {
    /// Switch the game mode.
    Mode(GameMode),
    /// Replace the single-target objective code.
    TargetCode(String),
    /// Replace the code stored in slot `index` (0-based).
    Code {
        /// Slot index, `0..MAX_CODES`.
        index: usize,
        /// Raw code text.
        text: String,
    },
    /// How many slots are in play (clamped 1–5).
    TargetCount(i64),
    /// Replace the area-control marker code.
    ControlCode(String),
    /// Area-control score threshold (clamped 5–200).
    WinScore(i64),
    /// Match length in minutes (clamped 1–240).
    DurationMinutes(i64),
}

/// Match configuration. Editable during setup and copied into the live match at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// Active ruleset.
    pub mode: GameMode,
    /// Objective for [`GameMode::SingleTarget`].
    pub target_code: String,
    /// Ordered code slots for [`GameMode::NOfSet`] and [`GameMode::Sequence`].
    pub codes: [String; MAX_CODES],
    /// Number of leading slots in play.
    pub target_count: u8,
    /// Marker for [`GameMode::AreaControl`].
    pub control_code: String,
    /// Area-control score threshold. Stored and published, not evaluated.
    pub win_score: u16,
    /// Match duration in minutes.
    pub duration_minutes: u16,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::SingleTarget,
            target_code: "AIRSOFT-ALPHA-01".into(),
            codes: [
                "CODE-ALPHA".into(),
                "CODE-BRAVO".into(),
                "CODE-CHARLIE".into(),
                "CODE-DELTA".into(),
                "CODE-ECHO".into(),
            ],
            target_count: 3,
            control_code: "KING-POINT-01".into(),
            win_score: 20,
            duration_minutes: 30,
        }
    }
}

impl MatchConfig {
    /// Slots in play for the set and sequence modes.
    pub fn active_codes(&self) -> &[String] {
        let count = usize::from(self.target_count).clamp(1, MAX_CODES);
        &self.codes[..count]
    }

    /// Match length in seconds.
    pub fn duration_seconds(&self) -> u32 {
        u32::from(self.duration_minutes) * 60
    }

    /// Apply `change`, clamping or normalizing its value, and return the status message.
    ///
    /// Blank code text leaves the stored code untouched.
    pub fn apply(&mut self, change: ConfigChange) -> String {
        match change {
            ConfigChange::Mode(mode) => {
                self.mode = mode;
                mode.selected_message().to_string()
            }
            ConfigChange::TargetCode(text) => {
                store_code(&mut self.target_code, &text, "Objective code")
            }
            ConfigChange::Code { index, text } => match self.codes.get_mut(index) {
                Some(slot) => store_code(slot, &text, &format!("Code {}", index + 1)),
                None => format!("No code slot {}.", index + 1),
            },
            ConfigChange::TargetCount(value) => {
                self.target_count = clamp(value, TARGET_COUNT_RANGE) as u8;
                format!("Codes in play: {}.", self.target_count)
            }
            ConfigChange::ControlCode(text) => {
                store_code(&mut self.control_code, &text, "Control point code")
            }
            ConfigChange::WinScore(value) => {
                self.win_score = clamp(value, WIN_SCORE_RANGE) as u16;
                format!("Control win score: {}.", self.win_score)
            }
            ConfigChange::DurationMinutes(value) => {
                self.duration_minutes = clamp(value, DURATION_RANGE) as u16;
                format!("Match duration: {} min.", self.duration_minutes)
            }
        }
    }

    /// Store an already-normalized, non-blank code read by the admin camera.
    pub fn apply_admin_scan(&mut self, target: AdminScanTarget, code: String) -> String {
        let (slot, label) = match (target, target.code_index()) {
            (_, Some(index)) => (&mut self.codes[index], format!("Code {}", index + 1)),
            (AdminScanTarget::TargetCode, None) => (&mut self.target_code, "Objective code".into()),
            (_, None) => (&mut self.control_code, "Control point code".into()),
        };
        let message = format!("{label} loaded: {code}");
        *slot = code;
        message
    }
}

/// Trim and uppercase raw scan or code text.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn store_code(slot: &mut String, raw: &str, label: &str) -> String {
    let code = normalize_code(raw);
    if code.is_empty() {
        return format!("{label} cannot be blank; keeping {slot}.");
    }
    *slot = code;
    format!("{label} set: {slot}")
}

fn clamp(value: i64, (min, max): (i64, i64)) -> i64 {
    value.clamp(min, max)
}
