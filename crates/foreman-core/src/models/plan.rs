//! Plan model definition and related functionality.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanStatus, PlanStep, StepStatus};

/// Reporting counters and derived facts about a plan.
///
/// Counters track top-level steps only, so
/// `completed_steps + failed_steps + skipped_steps <= steps.len()`
/// holds at all times. They are informational; step statuses are the
/// authoritative state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanMetadata {
    /// Number of top-level steps at parse time
    pub estimated_steps: u32,

    /// Top-level steps that completed successfully
    pub completed_steps: u32,

    /// Top-level steps that failed
    pub failed_steps: u32,

    /// Top-level steps that were skipped
    pub skipped_steps: u32,

    /// Target paths touched by file-type steps, derived at parse time
    #[serde(default)]
    pub files_affected: BTreeSet<String>,
}

/// Represents a complete plan: the unit of work a user approves and runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Title of the plan
    pub title: String,

    /// Detailed multi-line description of the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-text goal the plan pursues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Lifecycle state of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Ordered steps; insertion order is execution order
    #[serde(default)]
    pub steps: Vec<PlanStep>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Timestamp when the plan was approved (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Timestamp>,

    /// Timestamp when execution finished (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// Reporting counters and affected files
    #[serde(default)]
    pub metadata: PlanMetadata,
}

impl Plan {
    /// Creates an empty draft plan with the given title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: title.into(),
            description: None,
            goal: None,
            status: PlanStatus::Draft,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
            approved_at: None,
            completed_at: None,
            metadata: PlanMetadata::default(),
        }
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Finds a step by its dotted id anywhere in the step tree.
    pub fn find_step(&self, id: &str) -> Option<&PlanStep> {
        self.steps.iter().find_map(|s| s.find(id))
    }

    /// Mutable variant of [`Plan::find_step`].
    pub fn find_step_mut(&mut self, id: &str) -> Option<&mut PlanStep> {
        self.steps.iter_mut().find_map(|s| s.find_mut(id))
    }

    /// Progress over top-level steps as `(finished, total)`, where a
    /// step counts as finished once completed or skipped. Substeps are
    /// not counted independently.
    pub fn progress(&self) -> (usize, usize) {
        let finished = self
            .steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Completed | StepStatus::Skipped))
            .count();
        (finished, self.steps.len())
    }

    /// Progress as a whole percentage over top-level steps.
    pub fn progress_percent(&self) -> u8 {
        let (finished, total) = self.progress();
        if total == 0 {
            return 0;
        }
        ((finished * 100) / total) as u8
    }
}

/// Partial update applied to a plan by [`crate::PlanManager::update_plan`].
///
/// Fields left as `None` are unchanged; the merge is shallow.
#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub steps: Option<Vec<PlanStep>>,
}
