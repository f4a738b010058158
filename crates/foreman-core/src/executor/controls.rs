//! Control surface for an in-flight execution run.
//!
//! The run loop suspends cooperatively on two primitives: a watch
//! channel carrying the pause/cancel signal, awaited at step and
//! substep boundaries, and a notify-backed gate that wakes the loop
//! when approvals or skip requests arrive. There is no polling sleep.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::futures::Notified;
use tokio::sync::{watch, Notify};

/// Run-level signal observed at loop boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunSignal {
    Running,
    Paused,
    Cancelled,
}

struct HandleInner {
    signal: watch::Sender<RunSignal>,
    gate: Notify,
    approved: Mutex<HashSet<String>>,
    skip_requests: Mutex<HashSet<String>>,
}

/// Clonable handle controlling a single execution run.
///
/// All methods may be called at any time from any task. Cancellation is
/// observed only at step/substep boundaries; a long-running in-flight
/// delegation finishes (or times out) before the loop stops.
#[derive(Clone)]
pub struct ExecutionHandle {
    inner: Arc<HandleInner>,
}

impl ExecutionHandle {
    pub(crate) fn new() -> Self {
        let (signal, _) = watch::channel(RunSignal::Running);
        Self {
            inner: Arc::new(HandleInner {
                signal,
                gate: Notify::new(),
                approved: Mutex::new(HashSet::new()),
                skip_requests: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Pauses the run at the next step boundary. No-op once cancelled.
    pub fn pause(&self) {
        self.inner.signal.send_if_modified(|signal| {
            if *signal == RunSignal::Cancelled {
                false
            } else {
                *signal = RunSignal::Paused;
                true
            }
        });
    }

    /// Resumes a paused run. No-op once cancelled.
    pub fn resume(&self) {
        self.inner.signal.send_if_modified(|signal| {
            if *signal == RunSignal::Cancelled {
                false
            } else {
                *signal = RunSignal::Running;
                true
            }
        });
    }

    /// Requests cancellation. Also clears a pending pause and releases
    /// any step waiting at the approval gate.
    pub fn cancel(&self) {
        let _ = self.inner.signal.send(RunSignal::Cancelled);
        self.inner.gate.notify_waiters();
    }

    /// Marks a step approved, releasing the approval gate for it.
    pub fn approve_step(&self, step_id: &str) {
        lock(&self.inner.approved).insert(step_id.to_string());
        self.inner.gate.notify_waiters();
    }

    /// Requests that a step be skipped. Honored only while the step is
    /// still pending when the loop reaches it.
    pub fn skip_step(&self, step_id: &str) {
        lock(&self.inner.skip_requests).insert(step_id.to_string());
        self.inner.gate.notify_waiters();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.inner.signal.borrow() == RunSignal::Cancelled
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RunSignal> {
        self.inner.signal.subscribe()
    }

    pub(crate) fn is_approved(&self, step_id: &str) -> bool {
        lock(&self.inner.approved).contains(step_id)
    }

    pub(crate) fn skip_requested(&self, step_id: &str) -> bool {
        lock(&self.inner.skip_requests).contains(step_id)
    }

    pub(crate) fn gate_notified(&self) -> Notified<'_> {
        self.inner.gate.notified()
    }
}

/// Poison-tolerant lock helper; the sets hold plain strings, so a
/// poisoned guard is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
