//! Display formatting for plans, steps, and execution results.
//!
//! Domain models carry their own `Display` implementations (markdown
//! output suitable for rich terminal rendering), while newtype wrappers
//! handle collections and operation outcomes:
//!
//! - [`models`]: `Display` implementations for [`Plan`](crate::models::Plan)
//!   and friends
//! - [`collections`]: wrappers for groups of plans ([`PlanSummaries`])
//! - [`results`]: execution outcome reports ([`ExecutionReport`])
//! - [`datetime`]: timestamp formatting in the system timezone
//!
//! A plan's `Display` output is its canonical markdown form. The same
//! text feeds back through [`parse_plan`](crate::parser::parse_plan),
//! so exported plans can be re-imported: step titles render with their
//! status markers (`1. [x] **Title**`), details as indented plain
//! lines, and substeps as indented bullets.

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::PlanSummaries;
pub use datetime::LocalDateTime;
pub use results::ExecutionReport;
