//! Per-context session tests: load, triggers, autosave timer, shortcuts

mod common;

use common::{memory_store, FakeMedia};
use reprise_core::{
    KeyValueStore, ResourceKey, VideoSettings, VisibilityUpdate, USER_PREFERRED_SPEED,
};
use reprise_playback::{
    KeyInput, MediaElement, PlaybackError, PlaybackSession, PreferenceStore, SaveOutcome,
    ShortcutAction, SkipReason,
};
use serde_json::json;
use std::time::Duration;

const MOVIE: &str = "file:///movie.mp4";

#[tokio::test]
async fn test_load_restores_position_and_speed() {
    let (raw, store) = memory_store();
    raw.set(MOVIE, json!(42.0)).await.unwrap();
    raw.set(USER_PREFERRED_SPEED, json!(1.5)).await.unwrap();
    PreferenceStore::new(store.clone())
        .set_visibility(VisibilityUpdate {
            show_rewind: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    let snapshot = session.load().await;

    assert_eq!(snapshot.restored_position, Some(42.0));
    assert_eq!(snapshot.preferences.speed, 1.5);
    assert!(!snapshot.preferences.visibility.show_rewind);
    assert_eq!(media.current_time_value(), 42.0);
    assert_eq!(media.rate(), 1.5);
}

#[tokio::test]
async fn test_load_without_record_starts_at_zero() {
    let (_, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    let snapshot = session.load().await;

    assert_eq!(snapshot.restored_position, None);
    assert_eq!(snapshot.preferences.speed, 1.0);
    assert_eq!(media.current_time_value(), 0.0);
}

#[tokio::test]
async fn test_pause_and_unload_save() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    media.set_time(12.0);
    assert_eq!(session.on_pause().await, SaveOutcome::Saved(12.0));

    media.set_time(30.0);
    assert_eq!(session.on_unload().await, SaveOutcome::Saved(30.0));
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(30.0)));
}

#[tokio::test]
async fn test_duration_not_loaded_skips() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(f64::NAN);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    media.set_time(12.0);
    assert_eq!(
        session.save_now().await,
        SaveOutcome::Skipped(SkipReason::DurationUnknown)
    );

    media.set_duration(100.0);
    assert_eq!(session.save_now().await, SaveOutcome::Saved(12.0));
    assert_eq!(raw.len().await, 1);
}

#[tokio::test]
async fn test_incognito_suppresses_and_resets_on_load() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    assert!(session.toggle_incognito());
    media.set_time(20.0);
    assert_eq!(
        session.on_pause().await,
        SaveOutcome::Skipped(SkipReason::Incognito)
    );
    assert!(raw.is_empty().await);

    session.load().await;
    assert!(!session.is_incognito());
    assert_eq!(session.on_pause().await, SaveOutcome::Saved(20.0));
}

#[tokio::test]
async fn test_seek_buttons_save_and_clamp() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    media.set_time(25.0);
    assert_eq!(session.forward().await, SaveOutcome::Saved(35.0));
    assert_eq!(session.rewind().await, SaveOutcome::Saved(25.0));

    media.set_time(4.0);
    assert_eq!(
        session.rewind().await,
        SaveOutcome::Skipped(SkipReason::NotStarted)
    );
    assert_eq!(media.current_time_value(), 0.0);
    // Record from the last real save is still there
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(25.0)));

    media.set_time(95.0);
    assert_eq!(session.forward().await, SaveOutcome::Cleared);
    assert_eq!(media.current_time_value(), 100.0);
    assert!(raw.is_empty().await);
}

#[tokio::test]
async fn test_set_speed_clamps_and_persists() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();

    assert_eq!(session.set_speed(5.0).await.unwrap(), 3.0);
    assert_eq!(media.rate(), 3.0);
    assert_eq!(raw.get(USER_PREFERRED_SPEED).await.unwrap(), Some(json!(3.0)));

    assert_eq!(session.set_speed(1.3).await.unwrap(), 1.25);
    assert!(session.set_speed(f64::INFINITY).await.is_err());
    assert_eq!(media.rate(), 1.25);
}

#[tokio::test]
async fn test_keyboard_shortcuts() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let session = PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
        .unwrap();
    media.set_time(50.0);

    assert_eq!(
        session.handle_key(&KeyInput::new("KeyL")).await,
        Some(ShortcutAction::Seek(5.0))
    );
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(55.0)));

    session.handle_key(&KeyInput::new("ArrowLeft")).await;
    assert_eq!(media.current_time_value(), 50.0);

    session.handle_key(&KeyInput::new("Space")).await;
    assert!(!media.paused());
    session.handle_key(&KeyInput::new("KeyK")).await;
    assert!(media.paused());

    assert_eq!(
        session.handle_key(&KeyInput::new("KeyF")).await,
        Some(ShortcutAction::ToggleFullscreen)
    );

    session.handle_key(&KeyInput::new("KeyI")).await;
    assert!(session.is_incognito());

    // Modified keys belong to the browser
    assert_eq!(session.handle_key(&KeyInput::new("KeyL").with_alt()).await, None);
    assert_eq!(media.current_time_value(), 50.0);
}

#[tokio::test(start_paused = true)]
async fn test_autosave_only_while_playing() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let mut session =
        PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
            .unwrap();

    session.start_autosave();
    assert!(session.is_autosaving());

    // Paused: ticks pass without writes
    media.set_time(10.0);
    tokio::time::sleep(Duration::from_millis(4100)).await;
    assert!(raw.is_empty().await);

    // Playing: next tick saves
    media.play();
    media.set_time(15.0);
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(15.0)));

    media.set_time(22.0);
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(22.0)));
}

#[tokio::test(start_paused = true)]
async fn test_autosave_respects_incognito_toggle() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let mut session =
        PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
            .unwrap();
    media.play();
    media.set_time(10.0);

    session.toggle_incognito();
    session.start_autosave();
    tokio::time::sleep(Duration::from_millis(6100)).await;

    assert!(raw.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_saves_and_stops_timer() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let mut session =
        PlaybackSession::new(MOVIE.into(), media.clone(), store, VideoSettings::default())
            .unwrap();
    media.play();
    media.set_time(33.0);
    session.start_autosave();

    assert_eq!(session.teardown().await, SaveOutcome::Saved(33.0));

    // No timer left to write later positions
    media.set_time(40.0);
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(raw.get(MOVIE).await.unwrap(), Some(json!(33.0)));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_stops_timer() {
    let (raw, store) = memory_store();
    let media = FakeMedia::new(100.0);
    let mut session = PlaybackSession::new(
        ResourceKey::new(MOVIE),
        media.clone(),
        store,
        VideoSettings::default(),
    )
    .unwrap();
    media.play();
    media.set_time(8.0);
    session.start_autosave();
    drop(session);

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert!(raw.is_empty().await);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let (_, store) = memory_store();
    let media = FakeMedia::new(100.0);

    let no_interval = VideoSettings {
        save_interval_ms: 0,
        ..Default::default()
    };
    let err = PlaybackSession::new(MOVIE.into(), media.clone(), store.clone(), no_interval)
        .err()
        .unwrap();
    assert!(matches!(err, PlaybackError::InvalidSettings(_)));

    let inverted = VideoSettings {
        min_speed: 3.0,
        max_speed: 0.5,
        ..Default::default()
    };
    let err = PlaybackSession::new(MOVIE.into(), media, store, inverted)
        .err()
        .unwrap();
    assert!(matches!(err, PlaybackError::InvalidSettings(_)));
}
