// src/lib.rs

pub mod actions;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod keys;
pub mod locate;
pub mod logging;
pub mod platform;
pub mod types;
pub mod workers;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::actions::{ActionContext, ActionSettings, Collaborators, standard_registry};
use crate::cli::CliArgs;
use crate::config::{ConfigFile, default_config_path, load_and_validate, load_or_default};
use crate::engine::{
    Dispatcher, KeyRouter, LocatorProbe, OwnerRequest, Runtime, SharedState, TaskQueue,
};
use crate::locate::Locator;
use crate::platform::KeyListener;
use crate::platform::command::{CommandWindows, Fcitx5Layouts, XclipClipboard, XdotoolKeystrokes};
use crate::platform::headless::{HeadlessInput, HeadlessOverlay, HeadlessWindows};
use crate::platform::stdin_keys::StdinKeys;
use crate::workers::{Coordinator, WorkerContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - queue / shared state / dispatcher / runtime
/// - platform collaborators
/// - the three workers
/// - the key listener and its router
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let (tx, rx) = mpsc::unbounded_channel::<OwnerRequest>();
    let queue = Arc::new(TaskQueue::new());
    let state = Arc::new(SharedState::new());
    let settings = ActionSettings::from_config(&cfg);

    // Window manager access, with the in-memory overlay listed by title.
    let input = HeadlessInput::default();
    let windows = Arc::new(HeadlessWindows::new(
        CommandWindows::new(cfg.platform.focus),
        cfg.overlay.title.clone(),
    ));
    let overlay = HeadlessOverlay::new(input.clone()).linked(windows.overlay_focus());

    let collaborators = Collaborators {
        windows: windows.clone(),
        focus: windows.clone(),
        keystrokes: Box::new(XdotoolKeystrokes),
        clipboard: Box::new(XclipClipboard),
        layouts: Box::new(Fcitx5Layouts),
        overlay: Box::new(overlay),
    };
    let mut ctx = ActionContext::new(
        Arc::clone(&queue),
        Arc::clone(&state),
        settings.clone(),
        collaborators,
    );
    let shutdown = ctx.shutdown().clone();
    let locator = Locator::new(windows);

    // Workers: startup blocks until the target is resolved (or the stop is
    // queued), then watchdog and control run in the background.
    let mut workers = Coordinator::new(WorkerContext {
        state: Arc::clone(&state),
        shutdown: shutdown.clone(),
        locator: locator.clone(),
        target: settings.target_filter().clone(),
        requests: tx.clone(),
        tick: cfg.tick(),
        watchdog_interval: cfg.watchdog_interval(),
    });
    workers.start_all()?;
    ctx.attach_workers(workers);

    // Hotkeys.
    let router = KeyRouter::new(
        cfg.bindings().clone(),
        settings.gestures.clone(),
        Arc::clone(&queue),
        shutdown,
        Box::new(LocatorProbe {
            locator,
            state: Arc::clone(&state),
            target: settings.target_filter().clone(),
            overlay: settings.overlay.clone(),
        }),
    );
    let mut listener = StdinKeys::new(input, tx.clone());
    listener
        .start(router.into_sink())
        .context("starting the key listener")?;
    ctx.attach_listener(Box::new(listener));

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(OwnerRequest::Interrupted);
        });
    }
    drop(tx);

    let dispatcher = Dispatcher::new(queue, state, standard_registry());
    let runtime = Runtime::new(dispatcher, ctx, rx, settings.gestures);
    runtime.run().await?;

    info!("ffchat stopped");
    Ok(())
}

/// Explicit `--config` must exist; the default path may be missing.
fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => load_and_validate(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => load_or_default(default_config_path())?,
    };

    cfg.override_target(args.target_name.clone(), args.target_class.clone());
    config::validate_config(&cfg)?;
    Ok(cfg)
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &ConfigFile) {
    let placement = cfg.placement();
    let gestures = cfg.gestures();
    let bindings = cfg.bindings();

    println!("ffchat dry-run");
    println!("  target.name  = {:?}", cfg.target.name);
    println!("  target.class = {:?}", cfg.target.class);
    println!();

    println!("overlay:");
    println!("  title: {}", cfg.overlay.title);
    println!("  size: {}x{}", placement.size.width, placement.size.height);
    let at = placement.resolve();
    println!(
        "  position: ({}, {}) on {}x{}",
        at.x, at.y, placement.resolution.width, placement.resolution.height
    );
    println!();

    println!("layouts:");
    println!("  overlay: {}", gestures.overlay_layout);
    println!("  target: {}", gestures.target_layout);
    println!();

    println!("timing:");
    println!("  settle: {:?}", gestures.settle);
    println!("  paste: {:?}", gestures.paste);
    println!("  tick: {:?}", cfg.tick());
    println!("  watchdog: {:?}", cfg.watchdog_interval());
    println!();

    println!("keys:");
    println!("  open_overlay: {}", bindings.open_overlay);
    println!("  dismiss_clear: {}", bindings.dismiss_clear);
    println!("  dismiss: {}", bindings.dismiss);
    println!("  clear_input: {}", bindings.clear_input);
    println!("  focus_overlay: {}", bindings.focus_overlay);
    println!("  restore_overlay: {}", bindings.restore_overlay);
    println!("  quit: {}", bindings.quit);
    if let Some(ref chord) = bindings.toggle_focus {
        println!("  toggle_focus: {chord}");
    }

    debug!("dry-run complete (no window touched)");
}
