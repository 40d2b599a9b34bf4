use std::time::Duration;

use glimpse_capture::{HotkeyBindings, parse_hotkeys};
use glimpse_types::{AppEvent, BoundingBox, SelectionResult};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::support::{FakeVision, harness, wait_for};
use crate::controller::AppController;
use crate::events::event_loop;
use crate::io::spawn_hotkey_listener;

fn crop_reply() -> Result<Option<SelectionResult>, String> {
    Ok(Some(SelectionResult::Crop(BoundingBox::new(0, 0, 80, 40))))
}

#[tokio::test]
async fn test_shutdown_event_stops_loop() {
    let h = harness(FakeVision::answering("[A]"), crop_reply(), false);
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    let task = tokio::spawn(event_loop(h.context.clone(), rx, CancellationToken::new()));
    tx.send(AppEvent::Shutdown).await.expect("send failed");

    let result = timeout(Duration::from_secs(2), task)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cancel_token_stops_loop() {
    let h = harness(FakeVision::answering("[A]"), crop_reply(), false);
    let (_tx, rx) = kanal::unbounded_async::<AppEvent>();
    let cancel = CancellationToken::new();

    let task = tokio::spawn(event_loop(h.context.clone(), rx, cancel.clone()));
    cancel.cancel();

    let result = timeout(Duration::from_secs(2), task)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_closed_channel_ends_loop_with_error() {
    let h = harness(FakeVision::answering("[A]"), crop_reply(), false);
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    drop(tx);

    let result = timeout(
        Duration::from_secs(2),
        event_loop(h.context.clone(), rx, CancellationToken::new()),
    )
    .await
    .expect("event loop did not stop");
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unknown_profile_is_ignored() {
    let h = harness(FakeVision::answering("[A]"), crop_reply(), false);
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    let task = tokio::spawn(event_loop(h.context.clone(), rx, CancellationToken::new()));
    tx.send(AppEvent::HotkeyPressed { profile: 99 })
        .await
        .expect("send failed");
    tx.send(AppEvent::Shutdown).await.expect("send failed");

    timeout(Duration::from_secs(2), task)
        .await
        .expect("event loop did not stop")
        .expect("event loop panicked")
        .expect("event loop failed");

    assert!(h.ui.selections.lock().unwrap().is_empty());
    assert_eq!(h.vision.calls(), 0);
}

#[tokio::test]
async fn test_hotkey_press_runs_activation() {
    let h = harness(FakeVision::answering("Option [B]"), crop_reply(), false);
    let controller = AppController::new(h.context.clone());
    let mut tasks = controller.spawn_tasks();

    controller
        .event_sender()
        .send(AppEvent::HotkeyPressed { profile: 0 })
        .await
        .expect("send failed");

    let toaster = h.toaster.clone();
    assert!(
        wait_for(|| !toaster.shown.lock().unwrap().is_empty()).await,
        "activation never notified"
    );
    assert_eq!(
        toaster.shown.lock().unwrap()[0],
        ("Answer question".to_string(), "B".to_string())
    );
    assert_eq!(h.ui.selections.lock().unwrap().len(), 1);

    controller.shutdown();
    let joined = timeout(Duration::from_secs(2), tasks.join_next())
        .await
        .expect("tasks did not stop");
    assert!(matches!(joined, Some(Ok(Ok(())))));
}

#[tokio::test]
async fn test_presses_from_sync_thread_reach_async_loop() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(8);
    let sync_tx = tx.clone_sync();

    std::thread::spawn(move || {
        for profile in 0..3 {
            sync_tx
                .send(AppEvent::HotkeyPressed { profile })
                .expect("send failed");
        }
    });

    for expected in 0..3 {
        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for press")
            .expect("channel closed");
        assert_eq!(event, AppEvent::HotkeyPressed { profile: expected });
    }
}

#[tokio::test]
async fn test_hotkey_listener_stops_when_cancelled() {
    let hotkeys = parse_hotkeys(["ctrl+shift+7"]).expect("valid hotkey");
    let bindings = HotkeyBindings::from_hotkeys(&hotkeys);
    let (tx, _rx) = kanal::unbounded_async::<AppEvent>();
    let cancel = CancellationToken::new();

    let listener = spawn_hotkey_listener(
        bindings,
        Duration::from_millis(20),
        tx.clone_sync(),
        cancel.clone(),
    )
    .expect("failed to spawn listener");

    cancel.cancel();
    let joined = timeout(
        Duration::from_secs(2),
        tokio::task::spawn_blocking(move || listener.join()),
    )
    .await
    .expect("listener did not stop")
    .expect("join task panicked");
    assert!(joined.is_ok());
}
