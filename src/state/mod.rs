pub mod match_config;
pub mod match_state;
mod sse;
pub mod state_machine;
pub mod transitions;

use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, MutexGuard, watch};

use crate::{
    clock::{Clock, TokioClock},
    config::AppConfig,
    services::{
        abort_hold::PendingHold, scan_service::ScanDebounce, sse_events::broadcast_snapshot,
        timer_service::TimerSlots,
    },
    state::{match_config::MatchConfig, match_state::MatchState, state_machine::MatchStateMachine},
};

pub use self::sse::SseHub;

/// Cheaply clonable handle to the engine.
pub type SharedState = Arc<AppState>;

/// Everything that must change together, guarded by one lock.
///
/// Scans, timer ticks, lifecycle commands and configuration edits all go
/// through [`AppState::lock_core`], so each runs to completion before the next.
pub struct MatchCore {
    pub(crate) machine: MatchStateMachine,
    /// Configuration edited during setup.
    pub(crate) setup: MatchConfig,
    /// Copy of `setup` frozen when the current match started.
    pub(crate) live: Arc<MatchConfig>,
    pub(crate) state: MatchState,
    pub(crate) debounce: ScanDebounce,
    pub(crate) timers: TimerSlots,
}

impl MatchCore {
    fn new(config: &AppConfig) -> Self {
        let machine = MatchStateMachine::new();
        let setup = MatchConfig::default();
        let state = MatchState::setup_view(&setup, machine.epoch());
        Self {
            machine,
            live: Arc::new(setup.clone()),
            setup,
            state,
            debounce: ScanDebounce::new(config.scan_debounce),
            timers: TimerSlots::default(),
        }
    }
}

/// Central application state: the match core, its published snapshot and the collaborator hubs.
pub struct AppState {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    core: Mutex<MatchCore>,
    snapshots: watch::Sender<MatchState>,
    sse: SseHub,
    admin_token: std::sync::Mutex<Option<String>>,
    abort_hold: Mutex<Option<PendingHold>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Same as [`AppState::new`] with an explicit time source.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> SharedState {
        let core = MatchCore::new(&config);
        let (snapshots, _rx) = watch::channel(core.state.clone());
        Arc::new(Self {
            sse: SseHub::new(config.sse_capacity),
            config,
            clock,
            core: Mutex::new(core),
            snapshots,
            admin_token: std::sync::Mutex::new(None),
            abort_hold: Mutex::new(None),
        })
    }

    /// Runtime configuration the engine was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Time source used for debouncing.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> MatchState {
        self.snapshots.borrow().clone()
    }

    /// Receive every published snapshot from now on.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<MatchState> {
        self.snapshots.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Admin session token issued by a successful PIN unlock.
    ///
    /// Synchronous lock: it is taken inside phase transitions, which must not
    /// yield between the machine moving and the snapshot being published.
    pub fn admin_token(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.admin_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Abort hold waiting for its confirmation delay.
    pub fn abort_hold(&self) -> &Mutex<Option<PendingHold>> {
        &self.abort_hold
    }

    /// Enter the critical section shared by every match mutation.
    pub async fn lock_core(&self) -> MutexGuard<'_, MatchCore> {
        self.core.lock().await
    }

    /// Replace the snapshot as a whole and notify observers.
    pub(crate) fn publish(&self, core: &mut MatchCore, next: MatchState) {
        core.state = next.clone();
        broadcast_snapshot(self, &next);
        self.snapshots.send_replace(next);
    }

    /// Whether no countdown task is currently scheduled.
    pub async fn timers_idle(&self) -> bool {
        self.core.lock().await.timers.is_idle()
    }
}
