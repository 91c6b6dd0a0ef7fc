use std::time::Duration;

use airsoft_qr_back::{
    config::AppConfig,
    services::{
        admin_service, match_service,
        scan_service::{self, IgnoredReason, ScanOutcome},
    },
    state::{
        AppState, SharedState,
        match_config::{ConfigChange, GameMode},
        match_state::Side,
        state_machine::MatchPhase,
    },
};
use tokio::time::sleep;

const PAST_DEBOUNCE: Duration = Duration::from_millis(1300);

async fn configure(state: &SharedState, changes: Vec<ConfigChange>) {
    for change in changes {
        admin_service::update_config(state, change).await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn n_of_set_scenario_completes_and_freezes_clock() {
    let state = AppState::new(AppConfig::default());
    configure(
        &state,
        vec![
            ConfigChange::Mode(GameMode::NOfSet),
            ConfigChange::Code {
                index: 0,
                text: "A".into(),
            },
            ConfigChange::Code {
                index: 1,
                text: "B".into(),
            },
            ConfigChange::Code {
                index: 2,
                text: "C".into(),
            },
            ConfigChange::TargetCount(3),
            ConfigChange::DurationMinutes(1),
        ],
    )
    .await;
    match_service::start_match(&state).await.unwrap();

    let first = scan_service::submit_scan(&state, "a").await;
    assert_eq!(first.snapshot.last_scan, "A");
    assert_eq!(first.snapshot.found, [true, false, false, false, false]);
    assert_eq!(first.snapshot.message, "Code found (1/3).");

    sleep(PAST_DEBOUNCE).await;
    let second = scan_service::submit_scan(&state, "B").await;
    assert_eq!(second.snapshot.message, "Code found (2/3).");

    sleep(PAST_DEBOUNCE).await;
    let repeat = scan_service::submit_scan(&state, "B").await;
    assert_eq!(repeat.snapshot.found, second.snapshot.found);
    assert_eq!(repeat.snapshot.scan_success_count, 2);

    sleep(PAST_DEBOUNCE).await;
    let last = scan_service::submit_scan(&state, "c").await;
    assert_eq!(
        last.outcome,
        ScanOutcome::Resolved {
            transition: Some(MatchPhase::CodesCompleted)
        }
    );
    assert_eq!(last.snapshot.phase, MatchPhase::CodesCompleted);
    assert_eq!(last.snapshot.found_count(), 3);
    assert!(state.timers_idle().await);

    let frozen = last.snapshot.match_remaining_seconds;
    assert_eq!(frozen, 57);
    sleep(Duration::from_secs(5)).await;
    assert_eq!(state.snapshot().match_remaining_seconds, frozen);
    assert_eq!(state.snapshot().phase, MatchPhase::CodesCompleted);
}

#[tokio::test(start_paused = true)]
async fn armed_bomb_detonates_after_ten_ticks() {
    let state = AppState::new(AppConfig::default());
    let mut events = state.sse().subscribe();
    match_service::start_match(&state).await.unwrap();

    sleep(Duration::from_millis(2500)).await;
    let armed = scan_service::submit_scan(&state, " airsoft-alpha-01").await;
    assert_eq!(armed.snapshot.phase, MatchPhase::BombArmed);
    assert_eq!(armed.snapshot.detonation_remaining_seconds, 10);
    let clock_at_arming = armed.snapshot.match_remaining_seconds;

    sleep(Duration::from_millis(9500)).await;
    let counting = state.snapshot();
    assert_eq!(counting.phase, MatchPhase::BombArmed);
    assert_eq!(counting.detonation_remaining_seconds, 1);
    assert_eq!(counting.match_remaining_seconds, clock_at_arming);

    sleep(Duration::from_secs(1)).await;
    let detonated = state.snapshot();
    assert_eq!(detonated.phase, MatchPhase::Detonated);
    assert_eq!(detonated.detonation_remaining_seconds, 0);
    assert_eq!(detonated.message, "BOOM. Objective detonated.");
    assert!(state.timers_idle().await);

    sleep(Duration::from_secs(5)).await;
    let mut detonations = 0;
    while let Ok(event) = events.try_recv() {
        if event.event.as_deref() == Some("phase_changed") && event.data.contains("\"detonated\"")
        {
            detonations += 1;
        }
    }
    assert_eq!(detonations, 1);
}

#[tokio::test(start_paused = true)]
async fn match_countdown_ends_in_a_single_time_over() {
    let state = AppState::new(AppConfig {
        sse_capacity: 256,
        ..AppConfig::default()
    });
    configure(
        &state,
        vec![
            ConfigChange::Mode(GameMode::NOfSet),
            ConfigChange::DurationMinutes(1),
        ],
    )
    .await;
    let mut events = state.sse().subscribe();
    match_service::start_match(&state).await.unwrap();

    sleep(Duration::from_millis(59_500)).await;
    assert_eq!(state.snapshot().phase, MatchPhase::Running);
    assert_eq!(state.snapshot().match_remaining_seconds, 1);

    sleep(Duration::from_secs(1)).await;
    let over = state.snapshot();
    assert_eq!(over.phase, MatchPhase::TimeOver);
    assert_eq!(over.match_remaining_seconds, 0);
    assert_eq!(over.message, "Match time is over.");
    assert!(state.timers_idle().await);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(state.snapshot(), over);
    let mut time_overs = 0;
    while let Ok(event) = events.try_recv() {
        if event.event.as_deref() == Some("phase_changed") && event.data.contains("\"time_over\"")
        {
            time_overs += 1;
        }
    }
    assert_eq!(time_overs, 1);
}

#[tokio::test(start_paused = true)]
async fn area_control_time_over_compares_control_time() {
    let state = AppState::new(AppConfig::default());
    configure(
        &state,
        vec![
            ConfigChange::Mode(GameMode::AreaControl),
            ConfigChange::DurationMinutes(0),
        ],
    )
    .await;
    let started = match_service::start_match(&state).await.unwrap();
    assert_eq!(started.match_remaining_seconds, 60);

    match_service::select_side(&state, Side::Red).await.unwrap();
    let captured = scan_service::submit_scan(&state, "king-point-01").await;
    assert_eq!(captured.snapshot.holder, Some(Side::Red));

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(state.snapshot().control_seconds.red, 10);

    match_service::select_side(&state, Side::Green).await.unwrap();
    let transferred = scan_service::submit_scan(&state, "KING-POINT-01").await;
    assert_eq!(transferred.snapshot.holder, Some(Side::Green));

    sleep(Duration::from_secs(50)).await;
    let over = state.snapshot();
    assert_eq!(over.phase, MatchPhase::TimeOver);
    assert_eq!(over.match_remaining_seconds, 0);
    assert_eq!(over.control_seconds.red, 10);
    assert_eq!(over.control_seconds.green, 50);
    assert_eq!(
        over.message,
        "Time over. GREEN wins by control (00:50 vs 00:10)."
    );
    assert!(state.timers_idle().await);
}

#[tokio::test(start_paused = true)]
async fn restarted_match_runs_a_single_countdown() {
    let state = AppState::new(AppConfig::default());
    match_service::start_match(&state).await.unwrap();
    match_service::abort_match(&state).await.unwrap();
    match_service::return_to_setup(&state).await.unwrap();
    let restarted = match_service::start_match(&state).await.unwrap();
    assert_eq!(restarted.epoch, 2);

    sleep(Duration::from_millis(3500)).await;
    let snapshot = state.snapshot();
    assert_eq!(snapshot.phase, MatchPhase::Running);
    assert_eq!(snapshot.match_remaining_seconds, 30 * 60 - 3);
}

#[tokio::test(start_paused = true)]
async fn sequence_restarts_on_wrong_order() {
    let state = AppState::new(AppConfig::default());
    configure(&state, vec![ConfigChange::Mode(GameMode::Sequence)]).await;
    match_service::start_match(&state).await.unwrap();

    let skipped = scan_service::submit_scan(&state, "code-bravo").await;
    assert_eq!(skipped.snapshot.sequence_progress, 0);
    assert_eq!(skipped.snapshot.message, "Wrong order. Sequence restarted.");

    for (code, progress) in [("code-alpha", 1), ("code-bravo", 2)] {
        sleep(PAST_DEBOUNCE).await;
        let report = scan_service::submit_scan(&state, code).await;
        assert_eq!(report.snapshot.sequence_progress, progress);
    }

    sleep(PAST_DEBOUNCE).await;
    let done = scan_service::submit_scan(&state, "code-charlie").await;
    assert_eq!(done.snapshot.phase, MatchPhase::CodesCompleted);
    assert_eq!(done.snapshot.sequence_progress, 3);
}

#[tokio::test(start_paused = true)]
async fn terminal_phase_only_records_last_scan() {
    let state = AppState::new(AppConfig::default());
    match_service::start_match(&state).await.unwrap();
    match_service::abort_match(&state).await.unwrap();
    let before = state.snapshot();

    sleep(PAST_DEBOUNCE).await;
    let report = scan_service::submit_scan(&state, "airsoft-alpha-01").await;
    assert_eq!(
        report.outcome,
        ScanOutcome::Ignored(IgnoredReason::PhaseClosed)
    );

    let mut expected = before;
    expected.last_scan = "AIRSOFT-ALPHA-01".into();
    assert_eq!(state.snapshot(), expected);
}

#[tokio::test(start_paused = true)]
async fn observers_see_every_published_snapshot() {
    let state = AppState::new(AppConfig::default());
    let mut snapshots = state.subscribe_snapshots();

    match_service::start_match(&state).await.unwrap();
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().phase, MatchPhase::Running);

    sleep(Duration::from_millis(1500)).await;
    snapshots.changed().await.unwrap();
    assert_eq!(
        snapshots.borrow_and_update().match_remaining_seconds,
        30 * 60 - 1
    );
}
