//! Session start: landing, returning players, name validation.

mod common;

use std::sync::Arc;

use academy_core::clock::Clock;
use academy_core::error::GameError;
use academy_orchestrator::{OrchestratorConfig, Screen};
use academy_test_support::{FailingProgressStore, FixedClock};
use common::{harness, harness_with, orchestrator_with_store, record, registry, t0};

#[tokio::test]
async fn test_fresh_start_shows_landing_with_defaults() {
    // Arrange
    let mut h = harness(None, registry(&[1, 2, 3, 4]));

    // Act
    h.orchestrator.start().await;

    // Assert
    let surface = h.orchestrator.surface();
    assert_eq!(surface.visible(), Screen::Landing);
    assert_eq!(
        surface.landing().map(|l| l.title.as_str()),
        Some("Welcome, recruit")
    );
    assert_eq!(surface.header().title, "Cadet Academy");
    assert!(!surface.header().progress_visible);
    assert_eq!(h.orchestrator.state().current_level(), 1);
    assert_eq!(h.orchestrator.state().max_unlocked_level(), 1);
    assert_eq!(h.orchestrator.state().score(), 0);
    assert!(!h.orchestrator.timer().is_running());
    assert!(h.store.saved_records().is_empty());
}

#[tokio::test]
async fn test_returning_player_resumes_at_highest_unlocked_level() {
    // Arrange
    let mut saved = record("Cadet", 4);
    saved.score = 1200;
    saved.experience_points = 800;
    let mut h = harness(Some(saved), registry(&[1, 2, 3, 4]));

    // Act
    h.orchestrator.start().await;

    // Assert
    let state = h.orchestrator.state();
    assert_eq!(state.current_level(), 4);
    assert_eq!(state.score(), 1200);
    assert_eq!(h.orchestrator.mounted_level(), Some(4));
    assert_eq!(h.orchestrator.surface().visible(), Screen::Game);
    let header = h.orchestrator.surface().header();
    assert_eq!(header.title, "Mission 4: Final Transmission");
    assert!(header.progress_visible);
    assert_eq!(header.player, "Cadet");
    assert_eq!(header.xp, 800);
    assert!(h.orchestrator.timer().is_running());
}

#[tokio::test]
async fn test_finished_campaign_resumes_on_final_level() {
    let mut h = harness(Some(record("Cadet", 5)), registry(&[1, 2, 3, 4]));

    h.orchestrator.start().await;

    assert_eq!(h.orchestrator.state().max_unlocked_level(), 5);
    assert_eq!(h.orchestrator.mounted_level(), Some(4));
}

#[tokio::test]
async fn test_record_without_player_shows_landing_in_saved_language() {
    let mut saved = record("", 1);
    saved.language_code = "es".into();
    let mut h = harness(Some(saved), registry(&[1]));

    h.orchestrator.start().await;

    assert_eq!(h.orchestrator.surface().visible(), Screen::Landing);
    assert_eq!(h.orchestrator.surface().header().title, "Academia de Cadetes");
}

#[tokio::test]
async fn test_unreadable_record_falls_back_to_landing() {
    // Arrange
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(t0()));
    let mut orchestrator = orchestrator_with_store(
        Arc::new(FailingProgressStore),
        clock,
        registry(&[1]),
        OrchestratorConfig::default(),
    );

    // Act
    orchestrator.start().await;

    // Assert
    assert_eq!(orchestrator.surface().visible(), Screen::Landing);
    assert!(!orchestrator.state().has_player());
}

#[tokio::test]
async fn test_blank_name_raises_dialog_and_changes_nothing() {
    // Arrange
    let mut h = harness(None, registry(&[1]));
    h.orchestrator.start().await;

    // Act
    let result = h.orchestrator.begin_session("   ", false).await;

    // Assert
    assert!(matches!(result, Err(GameError::Validation(_))));
    let dialog = h.orchestrator.surface().active_dialog().unwrap();
    assert_eq!(dialog.message, "Please enter a cadet name.");
    assert_eq!(h.orchestrator.surface().visible(), Screen::Landing);
    assert!(h.store.saved_records().is_empty());
}

#[tokio::test]
async fn test_begin_session_persists_player_and_loads_first_level() {
    // Arrange
    let mut h = harness(None, registry(&[1, 2]));
    h.orchestrator.start().await;

    // Act
    h.orchestrator.begin_session("  Ada ", false).await.unwrap();

    // Assert
    assert_eq!(h.orchestrator.state().player_identifier(), "Ada");
    assert_eq!(h.orchestrator.mounted_level(), Some(1));
    let saved = h.store.last_saved().unwrap();
    assert_eq!(saved.player_identifier, "Ada");
    assert_eq!(saved.max_unlocked_level, 1);
    assert!(h.orchestrator.surface().landing().is_none());
}

#[tokio::test]
async fn test_reserved_name_unlocks_every_level() {
    let mut h = harness(None, registry(&[1, 2, 3, 4]));
    h.orchestrator.start().await;

    h.orchestrator.begin_session("ADMIN", false).await.unwrap();

    assert_eq!(h.orchestrator.state().max_unlocked_level(), 4);
    assert_eq!(h.orchestrator.mounted_level(), Some(4));
}

#[tokio::test]
async fn test_reserved_name_never_lowers_progress() {
    let mut h = harness(Some(record("", 6)), registry(&[1, 2, 3, 4]));
    h.orchestrator.start().await;

    h.orchestrator.begin_session("admin", false).await.unwrap();

    assert_eq!(h.orchestrator.state().max_unlocked_level(), 6);
}

#[tokio::test]
async fn test_reserved_name_can_be_disabled() {
    let config = OrchestratorConfig {
        reserved_name: None,
    };
    let mut h = harness_with(None, registry(&[1, 2, 3, 4]), config);
    h.orchestrator.start().await;

    h.orchestrator.begin_session("admin", false).await.unwrap();

    assert_eq!(h.orchestrator.state().max_unlocked_level(), 1);
}

#[tokio::test]
async fn test_skip_validation_keeps_existing_player() {
    // Arrange
    let mut h = harness(Some(record("Cadet", 2)), registry(&[1, 2]));
    h.orchestrator.start().await;
    h.orchestrator.show_landing();

    // Act
    h.orchestrator.begin_session("", true).await.unwrap();

    // Assert
    assert_eq!(h.orchestrator.state().player_identifier(), "Cadet");
    assert_eq!(h.orchestrator.mounted_level(), Some(2));
}

#[tokio::test]
async fn test_persistence_failure_does_not_stop_the_session() {
    // Arrange
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(t0()));
    let mut orchestrator = orchestrator_with_store(
        Arc::new(FailingProgressStore),
        clock,
        registry(&[1, 2]),
        OrchestratorConfig::default(),
    );
    orchestrator.start().await;

    // Act
    orchestrator.begin_session("Ada", false).await.unwrap();
    orchestrator.dispatch_input("win").await;

    // Assert
    assert_eq!(orchestrator.state().max_unlocked_level(), 2);
    assert_eq!(orchestrator.surface().visible(), Screen::Results);
}

#[tokio::test]
async fn test_intro_and_back_to_landing() {
    // Arrange
    let mut h = harness(None, registry(&[1]));
    h.orchestrator.start().await;

    // Act
    h.orchestrator.show_intro();
    let intro_title = h.orchestrator.surface().intro().map(|i| i.title.clone());
    h.orchestrator.show_landing();

    // Assert
    assert_eq!(intro_title.as_deref(), Some("Mission briefing"));
    assert_eq!(h.orchestrator.surface().visible(), Screen::Landing);
    assert!(h.orchestrator.surface().intro().is_none());
}
