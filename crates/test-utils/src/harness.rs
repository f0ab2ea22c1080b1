//! A fully wired owner-thread context backed by fakes.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use ffchat::actions::{ActionContext, ActionSettings, Collaborators, standard_registry};
use ffchat::config::ConfigFile;
use ffchat::engine::{
    Dispatcher, DrainBudget, DrainReport, OwnerRequest, PauseStatus, SharedState,
    ShutdownSequencer, TaskQueue,
};
use ffchat::errors::DispatchError;
use ffchat::locate::Locator;
use ffchat::workers::WorkerContext;

use crate::builders::ConfigFileBuilder;
use crate::fakes::{FakeLayouts, FakeOverlay, FakeWindows, MemoryClipboard, RecordingKeystrokes};

pub const TARGET_ID: &str = "0x01";
pub const TARGET_NAME: &str = "FINAL FANTASY XIV";
pub const TARGET_CLASS: &str = "ffxiv_dx11.exe";
pub const OVERLAY_ID: &str = "0x02";
pub const OVERLAY_TITLE: &str = "FFChat";

/// Window list with exactly one target and one overlay, target focused.
pub fn standard_windows() -> FakeWindows {
    let windows = FakeWindows::new()
        .with_window(TARGET_ID, TARGET_NAME, TARGET_CLASS)
        .with_window(OVERLAY_ID, OVERLAY_TITLE, "ffchat.FFChat");
    windows.set_active(Some(TARGET_ID));
    windows
}

/// Config with short timings, targeting [`TARGET_NAME`].
pub fn fast_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_target_name(TARGET_NAME)
        .with_overlay_title(OVERLAY_TITLE)
        .with_timing(20, 30)
        .with_tick(1, 50)
        .build()
}

pub struct Harness {
    pub queue: Arc<TaskQueue>,
    pub state: Arc<SharedState>,
    pub windows: FakeWindows,
    pub keystrokes: RecordingKeystrokes,
    pub clipboard: MemoryClipboard,
    pub layouts: FakeLayouts,
    pub overlay: FakeOverlay,
    pub settings: ActionSettings,
    pub config: ConfigFile,
    pub dispatcher: Dispatcher<ActionContext>,
    pub ctx: ActionContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_parts(
            fast_config(),
            standard_windows(),
            FakeLayouts::default(),
            MemoryClipboard::default(),
        )
    }

    pub fn with_parts(
        config: ConfigFile,
        windows: FakeWindows,
        layouts: FakeLayouts,
        clipboard: MemoryClipboard,
    ) -> Self {
        let queue = Arc::new(TaskQueue::new());
        let state = Arc::new(SharedState::new());
        let settings = ActionSettings::from_config(&config);
        let keystrokes = RecordingKeystrokes::default();
        let overlay = FakeOverlay::default();

        let collaborators = Collaborators {
            windows: Arc::new(windows.clone()),
            focus: Arc::new(windows.clone()),
            keystrokes: Box::new(keystrokes.clone()),
            clipboard: Box::new(clipboard.clone()),
            layouts: Box::new(layouts.clone()),
            overlay: Box::new(overlay.clone()),
        };
        let ctx = ActionContext::new(
            Arc::clone(&queue),
            Arc::clone(&state),
            settings.clone(),
            collaborators,
        );
        let dispatcher = Dispatcher::new(Arc::clone(&queue), Arc::clone(&state), standard_registry());

        Self {
            queue,
            state,
            windows,
            keystrokes,
            clipboard,
            layouts,
            overlay,
            settings,
            config,
            dispatcher,
            ctx,
        }
    }

    pub fn shutdown(&self) -> ShutdownSequencer {
        ShutdownSequencer::new(Arc::clone(&self.state), Arc::clone(&self.queue))
    }

    pub fn locator(&self) -> Locator {
        Locator::new(Arc::new(self.windows.clone()))
    }

    pub fn drain(&mut self, budget: DrainBudget) -> Result<DrainReport, DispatchError> {
        self.dispatcher.drain(&mut self.ctx, budget)
    }

    /// Drain until the queue is empty, sleeping through pause deadlines.
    /// Returns the number of drain passes that executed something.
    pub fn drain_all(&mut self, limit: Duration) -> Result<usize, DispatchError> {
        let started = Instant::now();
        let mut passes = 0;
        while !self.queue.is_empty() && started.elapsed() < limit {
            if let PauseStatus::Pending(left) = self.state.check_pause() {
                thread::sleep(left);
                continue;
            }
            if self.drain(DrainBudget::unbounded())?.executed > 0 {
                passes += 1;
            }
        }
        Ok(passes)
    }

    /// Worker context sharing this harness' queue and state.
    pub fn worker_context(&self, requests: mpsc::UnboundedSender<OwnerRequest>) -> WorkerContext {
        WorkerContext {
            state: Arc::clone(&self.state),
            shutdown: self.shutdown(),
            locator: self.locator(),
            target: self.settings.target_filter().clone(),
            requests,
            tick: self.config.tick(),
            watchdog_interval: self.config.watchdog_interval(),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
