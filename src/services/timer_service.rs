//! Match and detonation countdowns.
//!
//! Each countdown is a tokio task ticking once per second. A task only holds a
//! weak handle to the state and the epoch it was spawned for; every tick
//! re-enters the match core and stops as soon as the epoch or phase it serves
//! is gone.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, warn};

use crate::state::{
    AppState, MatchCore, SharedState,
    match_config::GameMode,
    match_state::{MatchState, format_clock},
    state_machine::{MatchEvent, MatchPhase},
    transitions::run_transition,
};

const TICK: Duration = Duration::from_secs(1);

/// Which countdown a task drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Match clock, active while running.
    Match,
    /// Detonation clock, active while the bomb is armed.
    Detonation,
}

/// Handles of the scheduled countdown tasks. At most one is live at a time.
#[derive(Debug, Default)]
pub struct TimerSlots {
    match_clock: Option<JoinHandle<()>>,
    detonation: Option<JoinHandle<()>>,
}

impl TimerSlots {
    /// Store `handle` for `kind`, aborting whatever occupied the slot.
    pub fn set(&mut self, kind: TimerKind, handle: JoinHandle<()>) {
        if let Some(previous) = self.slot(kind).replace(handle) {
            previous.abort();
        }
    }

    /// Abort every scheduled countdown.
    pub fn cancel_all(&mut self) {
        for handle in [self.match_clock.take(), self.detonation.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }

    /// Forget the handle for `kind` without aborting it.
    ///
    /// Used by a task that is about to finish on its own and must not be
    /// cancelled by the transition it triggers.
    pub fn detach(&mut self, kind: TimerKind) {
        self.slot(kind).take();
    }

    /// No countdown is scheduled.
    pub fn is_idle(&self) -> bool {
        self.match_clock.is_none() && self.detonation.is_none()
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<JoinHandle<()>> {
        match kind {
            TimerKind::Match => &mut self.match_clock,
            TimerKind::Detonation => &mut self.detonation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickFlow {
    Continue,
    Stop,
}

/// Spawn the countdown task for `kind`, bound to `epoch`.
pub fn spawn_ticker(state: &SharedState, epoch: u64, kind: TimerKind) -> JoinHandle<()> {
    let weak: Weak<AppState> = Arc::downgrade(state);
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(state) = weak.upgrade() else {
                break;
            };

            let mut core = state.lock_core().await;
            let flow = match kind {
                TimerKind::Match => match_tick(&state, &mut core, epoch),
                TimerKind::Detonation => detonation_tick(&state, &mut core, epoch),
            };
            if flow == TickFlow::Stop {
                break;
            }
        }
    })
}

fn match_tick(state: &SharedState, core: &mut MatchCore, epoch: u64) -> TickFlow {
    if !serves(core, epoch, MatchPhase::Running) {
        debug!(epoch, "match countdown outlived its match; stopping");
        return TickFlow::Stop;
    }

    let mut next = core.state.clone();
    next.match_remaining_seconds = next.match_remaining_seconds.saturating_sub(1);
    if next.mode == GameMode::AreaControl {
        if let Some(holder) = next.holder {
            next.control_seconds.credit(holder);
        }
    }

    if next.match_remaining_seconds > 0 {
        state.publish(core, next);
        return TickFlow::Continue;
    }

    next.message = time_over_message(&next);
    core.timers.detach(TimerKind::Match);
    if let Err(err) = run_transition(state, core, MatchEvent::TimeExpired, next) {
        warn!(error = %err, epoch, "match countdown could not end the match");
    }
    TickFlow::Stop
}

fn detonation_tick(state: &SharedState, core: &mut MatchCore, epoch: u64) -> TickFlow {
    if !serves(core, epoch, MatchPhase::BombArmed) {
        debug!(epoch, "detonation countdown outlived its match; stopping");
        return TickFlow::Stop;
    }

    let mut next = core.state.clone();
    next.detonation_remaining_seconds = next.detonation_remaining_seconds.saturating_sub(1);

    if next.detonation_remaining_seconds > 0 {
        state.publish(core, next);
        return TickFlow::Continue;
    }

    next.message = "BOOM. Objective detonated.".into();
    core.timers.detach(TimerKind::Detonation);
    if let Err(err) = run_transition(state, core, MatchEvent::Detonate, next) {
        warn!(error = %err, epoch, "detonation countdown could not detonate");
    }
    TickFlow::Stop
}

fn serves(core: &MatchCore, epoch: u64, phase: MatchPhase) -> bool {
    core.machine.epoch() == epoch && core.machine.phase() == phase
}

fn time_over_message(state: &MatchState) -> String {
    if state.mode != GameMode::AreaControl {
        return "Match time is over.".into();
    }

    let red = state.control_seconds.red;
    let green = state.control_seconds.green;
    match state.control_seconds.leader() {
        Some(side) => {
            let (winner, loser) = if red > green { (red, green) } else { (green, red) };
            format!(
                "Time over. {side} wins by control ({} vs {}).",
                format_clock(winner),
                format_clock(loser)
            )
        }
        None => format!("Time over. Tie on control ({}).", format_clock(red)),
    }
}
