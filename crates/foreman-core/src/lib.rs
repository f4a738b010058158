//! Core library for the Foreman plan execution application.
//!
//! This crate turns free-form plan text into structured, executable
//! plans and runs them step by step against a workspace:
//!
//! - [`parser`]: layered parse strategies (embedded JSON, markdown
//!   prose, numbered-line fallback) that all produce a [`models::Plan`]
//! - [`manager`]: plan lifecycle (create, approve, execute, delete),
//!   the single active-plan pointer, and persistence
//! - [`executor`]: the step run loop with pause, resume, cancel, and
//!   per-step approval controls
//! - [`store`]: SQLite-backed persistence of plan records
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use foreman_core::{ExecuteOptions, PlanManagerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = PlanManagerBuilder::new()
//!     .with_database_path(Some("foreman.db"))
//!     .with_workspace_root(Some("."))
//!     .build()
//!     .await?;
//!
//! let text = "# Ship It\n\n## Steps\n\n1. Run `cargo test`\n2. Review the diff";
//! let plan = manager
//!     .create_plan_from_text(text)
//!     .await
//!     .ok_or("no steps recognized")?;
//!
//! manager.approve_plan(plan.id).await;
//! let options = ExecuteOptions {
//!     auto_approve: true,
//!     dry_run: true,
//!     ..Default::default()
//! };
//! if let Some(result) = manager.execute_plan(plan.id, options).await {
//!     println!("executed {} steps", result.steps_executed);
//! }
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod events;
pub mod executor;
pub mod manager;
pub mod models;
pub mod parser;
pub mod store;

// Re-export commonly used types
pub use display::{ExecutionReport, LocalDateTime, PlanSummaries};
pub use error::{ForemanError, Result};
pub use events::PlanEvent;
pub use executor::{ExecutionHandle, PlanExecutor, StepExecutor};
pub use manager::{PlanManager, PlanManagerBuilder};
pub use models::{
    Complexity, ExecuteOptions, ExecutionResult, Plan, PlanMetadata, PlanPatch, PlanStatus,
    PlanStep, StepStatus, StepType,
};
pub use parser::parse_plan;
pub use store::PlanStore;
