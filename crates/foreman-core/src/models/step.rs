//! Step model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Complexity, StepStatus, StepType};

/// Represents an individual unit of work within a plan.
///
/// Steps form a tree: each step may carry nested `substeps` that the
/// executor runs depth-first after the step's own action. A step is
/// exclusively owned by its parent plan or step; there is no sharing
/// across plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanStep {
    /// Deterministic dotted ordinal within the plan ("3", "3.1", "3.1.2")
    pub id: String,

    /// Brief title/summary of the step
    pub title: String,

    /// Detailed multi-line description of the step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Kind of work, driving executor dispatch
    #[serde(rename = "type")]
    pub step_type: StepType,

    /// File path for file-* types, shell command text for command steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Informational complexity estimate
    #[serde(default)]
    pub estimated_complexity: Complexity,

    /// Captured result text from the step's action (truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Failure message when the step's action raised an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Timestamp when execution of the step started (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,

    /// Timestamp when the step reached a terminal state (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// Nested substeps, executed depth-first in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substeps: Vec<PlanStep>,
}

impl PlanStep {
    /// Creates a fresh pending step with the given title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            step_type: StepType::Other,
            target: None,
            status: StepStatus::Pending,
            estimated_complexity: Complexity::Medium,
            output: None,
            error: None,
            started_at: None,
            completed_at: None,
            substeps: Vec::new(),
        }
    }

    /// Finds a step by id in this step's subtree, including itself.
    pub fn find(&self, id: &str) -> Option<&PlanStep> {
        if self.id == id {
            return Some(self);
        }
        self.substeps.iter().find_map(|s| s.find(id))
    }

    /// Mutable variant of [`PlanStep::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut PlanStep> {
        if self.id == id {
            return Some(self);
        }
        self.substeps.iter_mut().find_map(|s| s.find_mut(id))
    }
}
