//! Status and classification enumerations for plans and steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan lifecycle states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan has been parsed or created but not yet approved
    #[default]
    Draft,

    /// Plan has been approved for execution
    Approved,

    /// Plan is currently being executed
    Executing,

    /// All executed steps finished without failure
    Completed,

    /// At least one step failed during execution
    Failed,

    /// Execution was cancelled before reaching the end
    Cancelled,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "approved" => Ok(PlanStatus::Approved),
            "executing" => Ok(PlanStatus::Executing),
            "completed" => Ok(PlanStatus::Completed),
            "failed" => Ok(PlanStatus::Failed),
            "cancelled" | "canceled" => Ok(PlanStatus::Cancelled),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Approved => "approved",
            PlanStatus::Executing => "executing",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
            PlanStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the plan may still be sent to the executor.
    pub fn is_executable(&self) -> bool {
        matches!(self, PlanStatus::Draft | PlanStatus::Approved)
    }
}

/// Type-safe enumeration of step states.
///
/// Valid transitions: `Pending → InProgress → {Completed | Failed}`, or
/// `Pending → Skipped`. The three right-hand states are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Step has not started yet
    #[default]
    Pending,

    /// Step is being worked on
    InProgress,

    /// Step finished successfully
    Completed,

    /// Step was skipped before it started
    Skipped,

    /// Step's action raised an error
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" | "done" => Ok(StepStatus::Completed),
            "skipped" => Ok(StepStatus::Skipped),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "failed",
        }
    }

    /// Whether the step has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Skipped | StepStatus::Failed
        )
    }

    /// Checkbox-style marker used in the markdown rendering.
    pub fn marker(&self) -> &'static str {
        match self {
            StepStatus::Pending => "[ ]",
            StepStatus::InProgress => "[~]",
            StepStatus::Completed => "[x]",
            StepStatus::Skipped => "[-]",
            StepStatus::Failed => "[!]",
        }
    }

    /// Get status with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Skipped => "⊘ Skipped",
            StepStatus::Failed => "✗ Failed",
        }
    }
}

/// Kind of work a step represents, driving executor dispatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    /// Modify an existing file at `target`
    FileEdit,

    /// Create a new file at `target`
    FileCreate,

    /// Delete the file at `target`
    FileDelete,

    /// Run `target` as a shell command in the workspace root
    Command,

    /// Delegate a research instruction to the step executor
    Research,

    /// Human checkpoint; records a marker without delegation
    Review,

    /// Anything else; completed without delegation
    #[default]
    Other,
}

impl FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file-edit" | "file_edit" | "edit" => Ok(StepType::FileEdit),
            "file-create" | "file_create" | "create" => Ok(StepType::FileCreate),
            "file-delete" | "file_delete" | "delete" => Ok(StepType::FileDelete),
            "command" | "shell" => Ok(StepType::Command),
            "research" => Ok(StepType::Research),
            "review" => Ok(StepType::Review),
            "other" => Ok(StepType::Other),
            _ => Err(format!("Invalid step type: {s}")),
        }
    }
}

impl StepType {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::FileEdit => "file-edit",
            StepType::FileCreate => "file-create",
            StepType::FileDelete => "file-delete",
            StepType::Command => "command",
            StepType::Research => "research",
            StepType::Review => "review",
            StepType::Other => "other",
        }
    }

    /// Whether this step type targets a file path.
    pub fn is_file_type(&self) -> bool {
        matches!(
            self,
            StepType::FileEdit | StepType::FileCreate | StepType::FileDelete
        )
    }
}

/// Informational complexity estimate attached to a step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Complexity::Low),
            "medium" => Ok(Complexity::Medium),
            "high" => Ok(Complexity::High),
            _ => Err(format!("Invalid complexity: {s}")),
        }
    }
}

impl Complexity {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}
