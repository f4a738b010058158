//! Data models for plans and their steps.
//!
//! This module contains the core domain models of the foreman plan
//! supervisor. Display implementations live in [`crate::display::models`]
//! to keep data structures separate from presentation logic.
//!
//! A [`Plan`] owns an ordered tree of [`PlanStep`]s; order is execution
//! order. Its [`PlanStatus`] moves through `draft → approved → executing`
//! and ends in `completed`, `failed`, or `cancelled`. Each step runs its
//! own five-state machine ([`StepStatus`]) and carries a [`StepType`]
//! that decides how the executor dispatches it.

mod execution;
mod plan;
mod status;
mod step;

pub use execution::{ExecuteOptions, ExecutionResult};
pub use plan::{Plan, PlanMetadata, PlanPatch};
pub use status::{Complexity, PlanStatus, StepStatus, StepType};
pub use step::PlanStep;
