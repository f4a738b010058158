//! Fire-and-forget notifications emitted by the manager and executor.
//!
//! Events are carried over a [`tokio::sync::broadcast`] channel; there is
//! no acknowledgment channel and a slow subscriber simply lags. UI layers
//! subscribe through [`crate::PlanManager::subscribe`].

use tokio::sync::broadcast;

use crate::models::{ExecutionResult, Plan, PlanStep};

/// Buffered events per subscriber before the channel starts lagging.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notifications about plan lifecycle and step execution progress.
#[derive(Debug, Clone)]
pub enum PlanEvent {
    /// A plan was created (parsed from text or manually)
    PlanCreated(Plan),

    /// A plan's fields or state changed
    PlanUpdated(Plan),

    /// A plan was deleted
    PlanDeleted { id: u64 },

    /// The single active-plan pointer changed
    ActivePlanChanged { id: Option<u64> },

    /// A step entered `in-progress`
    StepStart(PlanStep),

    /// A step completed successfully
    StepComplete(PlanStep),

    /// A step failed; carries the failure message
    StepFailed { step: PlanStep, error: String },

    /// The run loop is waiting for this step to be approved
    ApprovalRequired(PlanStep),

    /// An execution run finished, in whatever state
    PlanComplete(ExecutionResult),
}

pub(crate) fn channel() -> broadcast::Sender<PlanEvent> {
    broadcast::channel(EVENT_CHANNEL_CAPACITY).0
}
