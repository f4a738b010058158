//! Plan lifecycle management.
//!
//! [`PlanManager`] owns the set of known plans, the single active-plan
//! pointer, and persistence, and orchestrates the parser and executor:
//!
//! ```text
//! raw text ──▶ parser ──▶ draft Plan ──▶ manager stores it
//!                                             │ approve
//!                                             ▼
//!                       executor ◀── manager hands the plan over
//!                          │  step events        │
//!                          ▼                     ▼
//!                     subscribers          store (best effort)
//! ```
//!
//! All state lives in memory behind short-lived mutexes; the store is
//! written through `spawn_blocking` after every mutation and its
//! failures are logged and swallowed (the in-memory copy stays
//! authoritative for the session). Exactly one plan may execute at a
//! time: the active-plan pointer is a single optional id, and a plan
//! whose status is `executing` refuses deletion and re-execution.

mod builder;
mod lifecycle;

pub use builder::PlanManagerBuilder;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;
use tokio::sync::broadcast;
use tokio::task;

use crate::events::{self, PlanEvent};
use crate::executor::{ExecutionHandle, StepExecutor};
use crate::models::{Plan, PlanStatus};
use crate::store::PlanStore;

/// Central coordinator for plans: creation, approval, execution,
/// deletion, and progress reporting.
pub struct PlanManager {
    db_path: PathBuf,
    workspace_root: Option<PathBuf>,
    step_executor: Option<Arc<dyn StepExecutor>>,
    plans: Mutex<HashMap<u64, Plan>>,
    next_id: AtomicU64,
    active_plan: Mutex<Option<u64>>,
    active_run: Mutex<Option<(u64, ExecutionHandle)>>,
    events: broadcast::Sender<PlanEvent>,
}

impl PlanManager {
    pub(crate) fn new(
        db_path: PathBuf,
        workspace_root: Option<PathBuf>,
        step_executor: Option<Arc<dyn StepExecutor>>,
        plans: Vec<Plan>,
    ) -> Self {
        let next_id = plans.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let plans = plans.into_iter().map(|p| (p.id, p)).collect();
        Self {
            db_path,
            workspace_root,
            step_executor,
            plans: Mutex::new(plans),
            next_id: AtomicU64::new(next_id),
            active_plan: Mutex::new(None),
            active_run: Mutex::new(None),
            events: events::channel(),
        }
    }

    /// Subscribes to lifecycle and execution events. Notifications are
    /// fire-and-forget; a slow subscriber lags without blocking anyone.
    pub fn subscribe(&self) -> broadcast::Receiver<PlanEvent> {
        self.events.subscribe()
    }

    /// Retrieves a plan by id.
    pub fn plan(&self, id: u64) -> Option<Plan> {
        self.plans_guard().get(&id).cloned()
    }

    /// All known plans, most recently updated first.
    pub fn plans(&self) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self.plans_guard().values().cloned().collect();
        plans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        plans
    }

    /// Plans currently in the given lifecycle state, most recently
    /// updated first.
    pub fn plans_by_status(&self, status: PlanStatus) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self
            .plans_guard()
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        plans
    }

    /// The single plan currently marked active, if any.
    pub fn active_plan(&self) -> Option<Plan> {
        let id = (*self.active_guard())?;
        self.plan(id)
    }

    /// Points the active-plan pointer at a known plan, or clears it.
    /// Returns false when the id is unknown.
    pub fn set_active_plan(&self, id: Option<u64>) -> bool {
        if let Some(id) = id {
            if !self.plans_guard().contains_key(&id) {
                return false;
            }
        }
        *self.active_guard() = id;
        self.emit(PlanEvent::ActivePlanChanged { id });
        true
    }

    /// Progress of a plan as a whole percentage over its top-level
    /// steps (completed or skipped count toward progress).
    pub fn progress(&self, id: u64) -> Option<u8> {
        self.plans_guard().get(&id).map(Plan::progress_percent)
    }

    /// Renders a plan as its canonical markdown report.
    pub fn export_markdown(&self, id: u64) -> Option<String> {
        self.plan(id).map(|plan| plan.to_string())
    }

    /// Pauses the in-flight execution run, if any.
    pub fn pause_execution(&self) -> bool {
        self.with_active_run(|handle| handle.pause())
    }

    /// Resumes a paused execution run, if any.
    pub fn resume_execution(&self) -> bool {
        self.with_active_run(|handle| handle.resume())
    }

    /// Cancels the in-flight execution run, if any. Cancellation takes
    /// effect at the next step or substep boundary.
    pub fn cancel_execution(&self) -> bool {
        self.with_active_run(|handle| handle.cancel())
    }

    /// Approves a step the run loop is gated on.
    pub fn approve_step(&self, step_id: &str) -> bool {
        self.with_active_run(|handle| handle.approve_step(step_id))
    }

    fn with_active_run(&self, f: impl FnOnce(&ExecutionHandle)) -> bool {
        let run = lock(&self.active_run);
        match run.as_ref() {
            Some((_, handle)) => {
                f(handle);
                true
            }
            None => false,
        }
    }

    fn plans_guard(&self) -> MutexGuard<'_, HashMap<u64, Plan>> {
        lock(&self.plans)
    }

    fn active_guard(&self) -> MutexGuard<'_, Option<u64>> {
        lock(&self.active_plan)
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn emit(&self, event: PlanEvent) {
        let _ = self.events.send(event);
    }

    /// Writes a plan snapshot to the store. Failures are logged and
    /// swallowed; persistence never blocks an in-memory state change.
    async fn persist(&self, plan: Plan) {
        let path = self.db_path.clone();
        let id = plan.id;
        let outcome = task::spawn_blocking(move || PlanStore::new(&path)?.put(&plan)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("failed to persist plan {id}: {e}"),
            Err(e) => warn!("failed to persist plan {id}: {e}"),
        }
    }

    /// Removes a plan record from the store, best effort.
    async fn persist_delete(&self, id: u64) {
        let path = self.db_path.clone();
        let outcome = task::spawn_blocking(move || PlanStore::new(&path)?.delete(id)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("failed to delete plan record {id}: {e}"),
            Err(e) => warn!("failed to delete plan record {id}: {e}"),
        }
    }
}

/// Poison-tolerant lock helper; plan state is plain data, so a poisoned
/// guard is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
