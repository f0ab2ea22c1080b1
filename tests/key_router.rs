// tests/key_router.rs

use std::sync::Arc;

use ffchat::engine::{
    AppTask, Gesture, KeyBindings, KeyRouter, LocatorProbe, OverlayTask, SharedState, ShutdownSequencer,
    TaskKind, TaskQueue, WindowProbe,
};
use ffchat::keys::{Chord, Key, KeyEvent};
use ffchat::locate::{Locator, WindowFilter};
use ffchat::platform::KeyListener;
use ffchat::types::ExitReason;
use ffchat_test_utils::fakes::FakeListener;
use ffchat_test_utils::harness::{
    OVERLAY_ID, OVERLAY_TITLE, TARGET_NAME, fast_config, standard_windows,
};

#[derive(Debug, Clone, Copy, Default)]
struct StaticProbe {
    target_focused: bool,
    overlay_visible: bool,
    overlay_focused: bool,
}

impl WindowProbe for StaticProbe {
    fn target_focused(&self) -> bool {
        self.target_focused
    }

    fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    fn overlay_focused(&self) -> bool {
        self.overlay_focused
    }
}

struct Fixture {
    router: KeyRouter,
    queue: Arc<TaskQueue>,
    state: Arc<SharedState>,
}

fn fixture(probe: impl WindowProbe + 'static, bindings: KeyBindings) -> Fixture {
    let queue = Arc::new(TaskQueue::new());
    let state = Arc::new(SharedState::new());
    let shutdown = ShutdownSequencer::new(Arc::clone(&state), Arc::clone(&queue));
    let router = KeyRouter::new(
        bindings,
        fast_config().gestures(),
        Arc::clone(&queue),
        shutdown,
        Box::new(probe),
    );
    Fixture {
        router,
        queue,
        state,
    }
}

fn ctrl(key: Key) -> KeyEvent {
    KeyEvent::new(key, [Key::Ctrl, key])
}

fn kinds(queue: &TaskQueue) -> Vec<TaskKind> {
    queue.snapshot().into_iter().map(|p| p.kind).collect()
}

#[test]
fn open_overlay_requires_the_target_to_be_focused() {
    let f = fixture(StaticProbe::default(), KeyBindings::default());
    assert_eq!(f.router.on_key(&ctrl(Key::Enter)), None);
    assert!(f.queue.is_empty());

    let f = fixture(
        StaticProbe {
            target_focused: true,
            ..StaticProbe::default()
        },
        KeyBindings::default(),
    );
    assert_eq!(f.router.on_key(&ctrl(Key::Enter)), Some(Gesture::OpenOverlay));
    assert_eq!(
        kinds(&f.queue),
        vec![
            TaskKind::WAIT,
            TaskKind::Overlay(OverlayTask::Show),
            TaskKind::Overlay(OverlayTask::Focus),
            TaskKind::App(AppTask::SwitchKeyboard),
        ]
    );
}

#[test]
fn dismiss_requires_a_visible_focused_overlay() {
    let visible_only = StaticProbe {
        overlay_visible: true,
        ..StaticProbe::default()
    };
    let f = fixture(visible_only, KeyBindings::default());
    assert_eq!(f.router.on_key(&ctrl(Key::Char('d'))), None);

    let active = StaticProbe {
        overlay_visible: true,
        overlay_focused: true,
        ..StaticProbe::default()
    };
    let f = fixture(active, KeyBindings::default());
    assert_eq!(f.router.on_key(&ctrl(Key::Char('d'))), Some(Gesture::DismissClear));
    assert_eq!(
        kinds(&f.queue)[..2],
        [
            TaskKind::Overlay(OverlayTask::Hide),
            TaskKind::Overlay(OverlayTask::ClearInput)
        ]
    );

    let f = fixture(active, KeyBindings::default());
    assert_eq!(f.router.on_key(&ctrl(Key::Char('e'))), Some(Gesture::Dismiss));
    assert!(!kinds(&f.queue).contains(&TaskKind::Overlay(OverlayTask::ClearInput)));
}

#[test]
fn focus_overlay_requires_visible_overlay_and_focused_target() {
    let f = fixture(
        StaticProbe {
            target_focused: true,
            ..StaticProbe::default()
        },
        KeyBindings::default(),
    );
    assert_eq!(f.router.on_key(&ctrl(Key::Char('f'))), None);

    let f = fixture(
        StaticProbe {
            target_focused: true,
            overlay_visible: true,
            overlay_focused: false,
        },
        KeyBindings::default(),
    );
    assert_eq!(f.router.on_key(&ctrl(Key::Char('f'))), Some(Gesture::FocusOverlay));
    assert_eq!(kinds(&f.queue), vec![TaskKind::Overlay(OverlayTask::Focus)]);
}

#[test]
fn quit_requests_a_stop_regardless_of_focus() {
    let f = fixture(StaticProbe::default(), KeyBindings::default());
    let event = KeyEvent::new(Key::F(8), [Key::Shift, Key::F(8)]);

    assert_eq!(f.router.on_key(&event), Some(Gesture::Quit));
    assert_eq!(
        f.state.stop_record().map(|r| r.reason),
        Some(ExitReason::ExitKeyPress)
    );
    assert_eq!(kinds(&f.queue), vec![TaskKind::EXIT]);

    // Everything is ignored once stopping, including a second quit.
    assert_eq!(f.router.on_key(&event), None);
    assert_eq!(f.queue.len(), 1);
}

#[test]
fn unbound_keys_do_nothing() {
    let probe = StaticProbe {
        target_focused: true,
        overlay_visible: true,
        overlay_focused: true,
    };
    let f = fixture(probe, KeyBindings::default());
    assert_eq!(f.router.on_key(&KeyEvent::new(Key::Enter, [Key::Enter])), None);
    assert_eq!(f.router.on_key(&ctrl(Key::Char('z'))), None);
    assert!(f.queue.is_empty());
}

#[test]
fn custom_toggle_focus_binding() {
    let bindings = KeyBindings {
        toggle_focus: Some(Chord::new([Key::Alt], Key::Tab)),
        ..KeyBindings::default()
    };
    let f = fixture(StaticProbe::default(), bindings);
    let event = KeyEvent::new(Key::Tab, [Key::Alt, Key::Tab]);
    assert_eq!(f.router.on_key(&event), Some(Gesture::ToggleFocus));
    assert_eq!(
        kinds(&f.queue),
        vec![TaskKind::App(AppTask::ToggleFocus)]
    );
}

#[test]
fn locator_probe_reads_window_state() {
    let windows = standard_windows();
    let state = Arc::new(SharedState::new());
    let probe = LocatorProbe {
        locator: Locator::new(Arc::new(windows.clone())),
        state: Arc::clone(&state),
        target: WindowFilter::by_name(TARGET_NAME),
        overlay: WindowFilter::by_name(OVERLAY_TITLE),
    };

    assert!(probe.target_focused());
    assert!(!probe.overlay_focused());
    assert!(!probe.overlay_visible());

    state.set_overlay_visible(true);
    windows.set_active(Some(OVERLAY_ID));
    assert!(probe.overlay_visible());
    assert!(probe.overlay_focused());
    assert!(!probe.target_focused());
}

#[test]
fn listener_sink_routes_into_the_queue() {
    let f = fixture(
        StaticProbe {
            overlay_visible: true,
            overlay_focused: true,
            ..StaticProbe::default()
        },
        KeyBindings::default(),
    );
    let queue = Arc::clone(&f.queue);

    let mut listener = FakeListener::default();
    listener.start(f.router.into_sink()).unwrap();
    assert!(listener.press(ctrl(Key::Char('l'))));
    assert_eq!(kinds(&queue), vec![TaskKind::Overlay(OverlayTask::ClearInput)]);

    listener.stop();
    assert!(listener.is_stopped());
    assert!(!listener.press(ctrl(Key::Char('l'))));
    assert_eq!(queue.len(), 1);
}
