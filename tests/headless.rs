// tests/headless.rs

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ffchat::actions::{ActionContext, ActionSettings, Collaborators, standard_registry};
use ffchat::engine::{
    Dispatcher, DrainBudget, Gesture, KeyBindings, KeyRouter, LocatorProbe, PauseStatus,
    SharedState, ShutdownSequencer, TaskQueue,
};
use ffchat::keys::{Key, KeyEvent};
use ffchat::locate::{LocateOutcome, Locator, WindowFilter};
use ffchat::platform::headless::{
    HEADLESS_OVERLAY_ID, HeadlessInput, HeadlessOverlay, HeadlessWindows,
};
use ffchat::platform::{OverlaySurface, WindowFocus, WindowQuery};
use ffchat::types::{Position, Size, WindowId};
use ffchat_test_utils::fakes::{FakeLayouts, FakeWindows, MemoryClipboard, RecordingKeystrokes};
use ffchat_test_utils::harness::{TARGET_ID, TARGET_NAME, fast_config, standard_windows};
use ffchat_test_utils::init_tracing;

#[test]
fn overlay_keeps_geometry_and_input() {
    let input = HeadlessInput::default();
    let mut overlay = HeadlessOverlay::new(input.clone());

    overlay.relocate(Some(Size::new(900, 160)), None);
    overlay.relocate(None, Some(Position::new(510, 720)));
    assert_eq!(
        overlay.geometry(),
        (Some(Size::new(900, 160)), Some(Position::new(510, 720)))
    );

    input.set("konnichiwa");
    assert_eq!(overlay.input_text(), "konnichiwa");
    overlay.clear_input();
    assert_eq!(input.get(), "");

    overlay.show();
    assert!(overlay.is_visible());
    overlay.close();
    assert!(!overlay.is_visible());
    assert!(overlay.is_closed());
}

#[test]
fn virtual_overlay_is_located_by_title() {
    let windows = Arc::new(HeadlessWindows::new(
        FakeWindows::new().with_window(TARGET_ID, TARGET_NAME, "game.exe"),
        "FFChat",
    ));
    let locator = Locator::new(windows.clone());

    assert_eq!(
        locator.locate(&WindowFilter::by_name("FFChat")),
        LocateOutcome::Found(WindowId::new(HEADLESS_OVERLAY_ID))
    );
    assert_eq!(
        locator.locate(&WindowFilter::by_name(TARGET_NAME)),
        LocateOutcome::Found(WindowId::new(TARGET_ID))
    );
}

#[test]
fn focusing_the_virtual_overlay_shadows_the_active_window() {
    let inner = FakeWindows::new().with_window(TARGET_ID, TARGET_NAME, "game.exe");
    inner.set_active(Some(TARGET_ID));
    let windows = Arc::new(HeadlessWindows::new(inner.clone(), "FFChat"));
    let mut surface = HeadlessOverlay::default().linked(windows.overlay_focus());
    let locator = Locator::new(windows.clone());
    let overlay = WindowFilter::by_name("FFChat");
    let target = WindowFilter::by_name(TARGET_NAME);

    surface.show();
    windows.focus(&WindowId::new(HEADLESS_OVERLAY_ID)).unwrap();
    assert!(locator.is_active(&overlay));
    assert!(!locator.is_active(&target));
    assert!(inner.focused().is_empty(), "never reaches the window manager");

    windows.focus(&WindowId::new(TARGET_ID)).unwrap();
    assert!(locator.is_active(&target));
    assert!(!locator.is_active(&overlay));
    assert_eq!(inner.focused(), vec![WindowId::new(TARGET_ID)]);
}

#[test]
fn real_overlay_window_with_the_same_title_is_ambiguous() {
    let windows = Arc::new(HeadlessWindows::new(standard_windows(), "FFChat"));
    let locator = Locator::new(windows);

    assert!(matches!(
        locator.locate(&WindowFilter::by_name("FFChat")),
        LocateOutcome::Ambiguous(ids) if ids.len() == 2
    ));
}

#[test]
fn hidden_overlay_gives_focus_back() {
    let inner = FakeWindows::new().with_window(TARGET_ID, TARGET_NAME, "game.exe");
    inner.set_active(Some(TARGET_ID));
    let windows = HeadlessWindows::new(inner, "FFChat");
    let mut surface = HeadlessOverlay::default().linked(windows.overlay_focus());
    let overlay_id = WindowId::new(HEADLESS_OVERLAY_ID);

    windows.focus(&overlay_id).unwrap();
    assert_eq!(windows.active_id(), Some(WindowId::new(TARGET_ID)), "hidden overlay took focus");

    surface.show();
    windows.focus(&overlay_id).unwrap();
    assert_eq!(windows.active_id(), Some(overlay_id.clone()));

    surface.hide();
    assert_eq!(windows.active_id(), Some(WindowId::new(TARGET_ID)));

    surface.show();
    windows.focus(&overlay_id).unwrap();
    surface.close();
    assert_eq!(windows.active_id(), Some(WindowId::new(TARGET_ID)));
}

fn ctrl(key: Key) -> KeyEvent {
    KeyEvent::new(key, [Key::Ctrl, key])
}

/// Drain until the queue is empty, sleeping through pause deadlines.
fn drain_all(
    dispatcher: &Dispatcher<ActionContext>,
    ctx: &mut ActionContext,
    queue: &TaskQueue,
    state: &SharedState,
) {
    let started = Instant::now();
    while !queue.is_empty() && started.elapsed() < Duration::from_secs(2) {
        if let PauseStatus::Pending(left) = state.check_pause() {
            thread::sleep(left);
            continue;
        }
        dispatcher.drain(ctx, DrainBudget::unbounded()).unwrap();
    }
    assert!(queue.is_empty(), "queue did not drain");
}

#[test]
fn overlay_reopens_after_a_dismiss() {
    init_tracing();
    let config = fast_config();
    let settings = ActionSettings::from_config(&config);
    let inner = FakeWindows::new().with_window(TARGET_ID, TARGET_NAME, "game.exe");
    inner.set_active(Some(TARGET_ID));
    let windows = Arc::new(HeadlessWindows::new(inner, config.overlay.title.clone()));
    let overlay = HeadlessOverlay::default().linked(windows.overlay_focus());

    let queue = Arc::new(TaskQueue::new());
    let state = Arc::new(SharedState::new());
    let mut ctx = ActionContext::new(
        Arc::clone(&queue),
        Arc::clone(&state),
        settings.clone(),
        Collaborators {
            windows: windows.clone(),
            focus: windows.clone(),
            keystrokes: Box::new(RecordingKeystrokes::default()),
            clipboard: Box::new(MemoryClipboard::default()),
            layouts: Box::new(FakeLayouts::default()),
            overlay: Box::new(overlay),
        },
    );
    let dispatcher = Dispatcher::new(Arc::clone(&queue), Arc::clone(&state), standard_registry());
    let window_state = LocatorProbe {
        locator: Locator::new(windows.clone()),
        state: Arc::clone(&state),
        target: settings.target_filter().clone(),
        overlay: settings.overlay.clone(),
    };
    let router = KeyRouter::new(
        KeyBindings::default(),
        settings.gestures.clone(),
        Arc::clone(&queue),
        ShutdownSequencer::new(Arc::clone(&state), Arc::clone(&queue)),
        Box::new(window_state),
    );

    assert_eq!(router.on_key(&ctrl(Key::Enter)), Some(Gesture::OpenOverlay));
    drain_all(&dispatcher, &mut ctx, &queue, &state);
    assert!(state.overlay_visible());
    assert_eq!(windows.active_id(), Some(WindowId::new(HEADLESS_OVERLAY_ID)));

    assert_eq!(router.on_key(&ctrl(Key::Char('d'))), Some(Gesture::DismissClear));
    drain_all(&dispatcher, &mut ctx, &queue, &state);
    assert!(!state.overlay_visible());

    assert_eq!(router.on_key(&ctrl(Key::Enter)), Some(Gesture::OpenOverlay));
    drain_all(&dispatcher, &mut ctx, &queue, &state);
    assert!(state.overlay_visible());
    assert!(!state.stopping());
}
