// tests/runtime_shutdown.rs

use std::time::Duration;

use tokio::sync::mpsc;

use ffchat::actions::ActionContext;
use ffchat::engine::{DrainBudget, OverlayTask, OwnerRequest, Runtime, TaskKind, TaskPacket};
use ffchat::keys::Key;
use ffchat::types::ExitReason;
use ffchat::workers::Coordinator;
use ffchat_test_utils::harness::{Harness, TARGET_ID};
use ffchat_test_utils::{init_tracing, with_timeout};

fn build_runtime(h: Harness) -> (Runtime<ActionContext>, mpsc::UnboundedSender<OwnerRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let gestures = h.settings.gestures.clone();
    (Runtime::new(h.dispatcher, h.ctx, rx, gestures), tx)
}

#[tokio::test]
async fn interrupt_then_control_stop_tears_everything_down() {
    init_tracing();
    let h = Harness::new();
    let state = h.state.clone();
    let overlay = h.overlay.clone();
    let (runtime, tx) = build_runtime(h);

    tx.send(OwnerRequest::Interrupted).unwrap();
    tx.send(OwnerRequest::ControlStopped).unwrap();

    let result = with_timeout(runtime.run()).await;
    assert!(result.is_ok());

    assert!(state.exited());
    assert_eq!(
        state.stop_record().map(|r| r.reason),
        Some(ExitReason::Interrupted)
    );
    assert!(overlay.snapshot().closed);
    // The runtime stops on exit even though a sender is still alive.
    drop(tx);
}

#[tokio::test]
async fn closed_channel_flushes_a_pending_exit() {
    let h = Harness::new();
    let state = h.state.clone();
    let (runtime, tx) = build_runtime(h);

    tx.send(OwnerRequest::Interrupted).unwrap();
    drop(tx);

    with_timeout(runtime.run()).await.unwrap();
    assert!(state.exited());
}

#[tokio::test]
async fn closed_channel_without_a_stop_just_returns() {
    let h = Harness::new();
    let state = h.state.clone();
    let queue = h.queue.clone();
    let overlay = h.overlay.clone();
    overlay.set_input("draft");
    queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::ClearInput)));
    queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::Hide)));
    let (runtime, tx) = build_runtime(h);

    tx.send(OwnerRequest::Drain(DrainBudget::single())).unwrap();
    drop(tx);

    with_timeout(runtime.run()).await.unwrap();

    assert_eq!(overlay.snapshot().input, "");
    assert_eq!(queue.len(), 1, "one drain request runs one task");
    assert!(!state.exited());
}

#[tokio::test]
async fn submitted_message_is_delivered_before_the_exit() {
    init_tracing();
    let h = Harness::new();
    h.overlay.set_visible(true);
    h.overlay.set_input("o/");
    let keystrokes = h.keystrokes.clone();
    let clipboard = h.clipboard.clone();
    let state = h.state.clone();
    let (runtime, tx) = build_runtime(h);

    tx.send(OwnerRequest::OverlaySubmit).unwrap();
    tx.send(OwnerRequest::Interrupted).unwrap();
    tx.send(OwnerRequest::ControlStopped).unwrap();

    with_timeout(runtime.run()).await.unwrap();

    assert_eq!(
        keystrokes.sent(),
        vec![vec![Key::Ctrl, Key::Char('v')], vec![Key::Enter]]
    );
    assert_eq!(clipboard.writes().first().map(String::as_str), Some("o/"));
    assert!(state.exited());
}

#[tokio::test]
async fn restore_request_places_the_overlay() {
    let h = Harness::new();
    let overlay = h.overlay.clone();
    let (runtime, tx) = build_runtime(h);

    tx.send(OwnerRequest::RestoreOverlay).unwrap();
    tx.send(OwnerRequest::Drain(DrainBudget::unbounded())).unwrap();
    drop(tx);

    with_timeout(runtime.run()).await.unwrap();

    let snapshot = overlay.snapshot();
    assert_eq!(snapshot.calls, vec!["relocate"]);
    assert!(!snapshot.visible);
}

#[tokio::test]
async fn vanished_target_ends_a_full_run() {
    init_tracing();
    let h = Harness::new();
    let windows = h.windows.clone();
    let state = h.state.clone();
    let overlay = h.overlay.clone();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut workers = Coordinator::new(h.worker_context(tx.clone()));
    workers.start_all().unwrap();
    drop(tx);

    let Harness {
        dispatcher,
        mut ctx,
        settings,
        ..
    } = h;
    ctx.attach_workers(workers);
    let runtime = Runtime::new(dispatcher, ctx, rx, settings.gestures.clone());

    let killer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        windows.remove_window(TARGET_ID);
    });

    with_timeout(runtime.run()).await.unwrap();
    killer.join().unwrap();

    assert!(state.exited());
    assert_eq!(
        state.stop_record().map(|r| r.reason),
        Some(ExitReason::TargetDied)
    );
    let snapshot = overlay.snapshot();
    assert!(snapshot.calls.contains(&"relocate"));
    assert!(snapshot.closed);
}
