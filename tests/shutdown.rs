// tests/shutdown.rs

use std::sync::Arc;
use std::thread;

use ffchat::engine::{
    OverlayTask, SharedState, ShutdownSequencer, TaskArg, TaskKind, TaskPacket, TaskQueue,
};
use ffchat::types::ExitReason;
use ffchat_test_utils::init_tracing;

fn sequencer() -> (ShutdownSequencer, Arc<SharedState>, Arc<TaskQueue>) {
    let state = Arc::new(SharedState::new());
    let queue = Arc::new(TaskQueue::new());
    let seq = ShutdownSequencer::new(Arc::clone(&state), Arc::clone(&queue));
    (seq, state, queue)
}

fn exit_packets(queue: &TaskQueue) -> Vec<TaskPacket> {
    queue
        .snapshot()
        .into_iter()
        .filter(|p| p.kind == TaskKind::EXIT)
        .collect()
}

#[test]
fn first_reason_wins_and_one_exit_is_queued() {
    init_tracing();
    let (seq, state, queue) = sequencer();

    assert!(seq.request_stop(ExitReason::TargetDied, "target gone", false));
    assert!(!seq.request_stop(ExitReason::ExitKeyPress, "bye", false));

    let record = state.stop_record().unwrap();
    assert_eq!(record.reason, ExitReason::TargetDied);
    assert_eq!(record.extra_message, "target gone");

    let exits = exit_packets(&queue);
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].args[0], TaskArg::Reason(ExitReason::TargetDied));
    assert_eq!(exits[0].args[1], TaskArg::Text("target gone".into()));
}

#[test]
fn exit_goes_behind_pending_work_unless_cleared() {
    let (seq, _state, queue) = sequencer();
    queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::Show)));

    seq.request_stop(ExitReason::ExitKeyPress, "bye", false);
    let kinds: Vec<_> = queue.snapshot().into_iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![TaskKind::Overlay(OverlayTask::Show), TaskKind::EXIT]
    );
}

#[test]
fn clear_pending_drops_queued_work() {
    let (seq, _state, queue) = sequencer();
    queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::Show)));
    queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::Hide)));

    seq.request_stop(ExitReason::WmProblems, "window manager gone", true);
    let kinds: Vec<_> = queue.snapshot().into_iter().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![TaskKind::EXIT]);
}

#[test]
fn concurrent_requests_store_one_reason() {
    let (seq, state, queue) = sequencer();
    let reasons = [
        ExitReason::TargetDied,
        ExitReason::MultipleTargets,
        ExitReason::ExitKeyPress,
        ExitReason::Interrupted,
    ];

    let accepted: usize = thread::scope(|s| {
        let handles: Vec<_> = reasons
            .iter()
            .map(|&reason| {
                let seq = seq.clone();
                s.spawn(move || seq.request_stop(reason, "race", false))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(accepted, 1);
    assert!(state.stopping());
    assert_eq!(exit_packets(&queue).len(), 1);

    let winner = state.stop_record().unwrap().reason;
    assert_eq!(
        exit_packets(&queue)[0].args[0],
        TaskArg::Reason(winner),
        "queued exit carries the stored reason"
    );
}
