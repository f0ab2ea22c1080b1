// src/engine/mod.rs

//! Orchestration engine for ffchat.
//!
//! This module ties together:
//! - the task taxonomy and packets ([`task`])
//! - the FIFO of pending packets ([`queue`])
//! - the handler table and the serialized drain loop ([`registry`],
//!   [`dispatcher`])
//! - cross-thread coordination state and the shutdown path ([`state`],
//!   [`shutdown`])
//! - gesture bursts and key routing ([`gestures`], [`router`])
//! - the owner-thread event loop that reacts to:
//!   - drain ticks from the control worker
//!   - overlay submits and restore requests
//!   - Ctrl-C
//!   - the control worker winding down
//!
//! Handlers only ever run inside [`Runtime::run`], on the owner thread.

pub mod dispatcher;
pub mod gestures;
pub mod queue;
pub mod registry;
pub mod router;
pub mod runtime;
pub mod shutdown;
pub mod state;
pub mod task;

/// Requests flowing into the owner thread from workers, the key listener
/// and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRequest {
    /// Run a drain pass with the given budget.
    Drain(DrainBudget),
    /// The target was located at startup; put the overlay in place.
    RestoreOverlay,
    /// Return was pressed inside the overlay.
    OverlaySubmit,
    /// Ctrl-C.
    Interrupted,
    /// The control worker ended; flush whatever is left.
    ControlStopped,
}

pub use dispatcher::{Dispatcher, DrainBudget, DrainReport, DrainStop};
pub use gestures::Gestures;
pub use queue::TaskQueue;
pub use registry::{ActionRegistry, Handler, RegistryBuilder};
pub use router::{Gesture, KeyBindings, KeyRouter, LocatorProbe, WindowProbe};
pub use runtime::Runtime;
pub use shutdown::ShutdownSequencer;
pub use state::{DrainGuard, PauseStatus, SharedState, StopRecord};
pub use task::{AppTask, Arity, OverlayTask, TargetTask, TaskArg, TaskKind, TaskPacket};
