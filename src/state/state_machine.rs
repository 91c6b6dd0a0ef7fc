use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a match can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Configuration is editable; no match is live.
    Setup,
    /// The match countdown runs and scans are resolved.
    Running,
    /// Single-target objective armed; the detonation countdown runs.
    BombArmed,
    /// The detonation countdown reached zero.
    Detonated,
    /// Every required code of a set or sequence match was found.
    CodesCompleted,
    /// Area-control win by score. Declared for clients, never entered by the engine.
    AreaControlCompleted,
    /// The operator aborted the match.
    Aborted,
    /// The match countdown reached zero while running.
    TimeOver,
}

impl MatchPhase {
    /// Terminal phases freeze the match until the operator returns to setup.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MatchPhase::Detonated
                | MatchPhase::CodesCompleted
                | MatchPhase::AreaControlCompleted
                | MatchPhase::Aborted
                | MatchPhase::TimeOver
        )
    }

    /// Only a running match lets scans reach the mode resolvers.
    pub fn accepts_scans(self) -> bool {
        self == MatchPhase::Running
    }

    /// Phases the operator may abort from.
    pub fn is_abortable(self) -> bool {
        matches!(self, MatchPhase::Running | MatchPhase::BombArmed)
    }
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// Operator starts a match from setup.
    StartMatch,
    /// Correct single-target scan arms the objective.
    ArmBomb,
    /// Detonation countdown expired.
    Detonate,
    /// Set or sequence mode reached its target count.
    CodesCompleted,
    /// Match countdown expired while running.
    TimeExpired,
    /// Operator confirmed an abort.
    Abort,
    /// Operator leaves a finished match and goes back to configuration.
    ReturnToSetup,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: MatchPhase,
    /// The event that cannot be applied from this phase.
    pub event: MatchEvent,
}

/// Phase state machine for a single controller.
///
/// `version` counts applied transitions; `epoch` counts started matches and is
/// what timer tasks compare against before touching state.
#[derive(Debug, Clone)]
pub struct MatchStateMachine {
    phase: MatchPhase,
    version: u64,
    epoch: u64,
}

impl Default for MatchStateMachine {
    fn default() -> Self {
        Self {
            phase: MatchPhase::Setup,
            version: 0,
            epoch: 0,
        }
    }
}

impl MatchStateMachine {
    /// Create a new state machine in the setup phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Generation of the current (or last) match.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: MatchEvent) -> Result<MatchPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        if event == MatchEvent::StartMatch {
            self.epoch += 1;
        }
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    fn compute_transition(&self, event: MatchEvent) -> Result<MatchPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (MatchPhase::Setup, MatchEvent::StartMatch) => MatchPhase::Running,
            (MatchPhase::Running, MatchEvent::ArmBomb) => MatchPhase::BombArmed,
            (MatchPhase::BombArmed, MatchEvent::Detonate) => MatchPhase::Detonated,
            (MatchPhase::Running, MatchEvent::CodesCompleted) => MatchPhase::CodesCompleted,
            (MatchPhase::Running, MatchEvent::TimeExpired) => MatchPhase::TimeOver,
            (MatchPhase::Running | MatchPhase::BombArmed, MatchEvent::Abort) => {
                MatchPhase::Aborted
            }
            (from, MatchEvent::ReturnToSetup) if from.is_terminal() => MatchPhase::Setup,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
