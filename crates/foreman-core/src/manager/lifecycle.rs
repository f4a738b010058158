//! Plan lifecycle operations: create, update, approve, execute, delete.
//!
//! Invalid operations (approving a non-draft plan, deleting or
//! re-executing an executing plan, unknown ids) report `None`/`false`
//! rather than erroring; persistence is best effort throughout.

use jiff::Timestamp;
use log::info;

use super::PlanManager;
use crate::events::PlanEvent;
use crate::executor::{ExecutionHandle, PlanExecutor};
use crate::models::{
    ExecuteOptions, ExecutionResult, Plan, PlanPatch, PlanStatus, StepStatus,
};
use crate::parser;

impl PlanManager {
    /// Parses free text into a draft plan, stores it, and announces it.
    /// Returns `None` when no parse strategy yields at least one step.
    pub async fn create_plan_from_text(&self, text: &str) -> Option<Plan> {
        let mut plan = parser::parse_plan(text)?;
        plan.id = self.allocate_id();
        info!(
            "parsed plan {} ({} steps): {}",
            plan.id,
            plan.steps.len(),
            plan.title
        );
        self.plans_guard().insert(plan.id, plan.clone());
        self.persist(plan.clone()).await;
        self.emit(PlanEvent::PlanCreated(plan.clone()));
        Some(plan)
    }

    /// Creates an empty draft plan with the given title, description,
    /// and goal.
    pub async fn create_plan(
        &self,
        title: &str,
        description: Option<&str>,
        goal: Option<&str>,
    ) -> Plan {
        let mut plan = Plan::new(self.allocate_id(), title);
        plan.description = description.map(String::from);
        plan.goal = goal.map(String::from);
        self.plans_guard().insert(plan.id, plan.clone());
        self.persist(plan.clone()).await;
        self.emit(PlanEvent::PlanCreated(plan.clone()));
        plan
    }

    /// Shallow-merges the patch into the plan and bumps `updated_at`.
    /// Refused (returns `None`) for unknown ids and while the plan is
    /// executing, since the run mutates its own copy.
    pub async fn update_plan(&self, id: u64, patch: PlanPatch) -> Option<Plan> {
        let updated = {
            let mut plans = self.plans_guard();
            let plan = plans.get_mut(&id)?;
            if plan.status == PlanStatus::Executing {
                return None;
            }
            if let Some(title) = patch.title {
                plan.title = title;
            }
            if let Some(description) = patch.description {
                plan.description = Some(description);
            }
            if let Some(goal) = patch.goal {
                plan.goal = Some(goal);
            }
            if let Some(steps) = patch.steps {
                plan.metadata.estimated_steps = steps.len() as u32;
                plan.steps = steps;
            }
            plan.touch();
            plan.clone()
        };
        self.persist(updated.clone()).await;
        self.emit(PlanEvent::PlanUpdated(updated.clone()));
        Some(updated)
    }

    /// Deletes a plan. Refused while the plan is executing; clears the
    /// active pointer when it referenced the deleted plan.
    pub async fn delete_plan(&self, id: u64) -> bool {
        {
            let mut plans = self.plans_guard();
            match plans.get(&id) {
                Some(plan) if plan.status == PlanStatus::Executing => return false,
                Some(_) => {}
                None => return false,
            }
            plans.remove(&id);
        }
        let cleared = {
            let mut active = self.active_guard();
            if *active == Some(id) {
                *active = None;
                true
            } else {
                false
            }
        };
        self.persist_delete(id).await;
        self.emit(PlanEvent::PlanDeleted { id });
        if cleared {
            self.emit(PlanEvent::ActivePlanChanged { id: None });
        }
        info!("deleted plan {id}");
        true
    }

    /// Approves a draft plan, stamping `approved_at`. Only valid from
    /// `draft`.
    pub async fn approve_plan(&self, id: u64) -> Option<Plan> {
        let approved = {
            let mut plans = self.plans_guard();
            let plan = plans.get_mut(&id)?;
            if plan.status != PlanStatus::Draft {
                return None;
            }
            plan.status = PlanStatus::Approved;
            plan.approved_at = Some(Timestamp::now());
            plan.touch();
            plan.clone()
        };
        self.persist(approved.clone()).await;
        self.emit(PlanEvent::PlanUpdated(approved.clone()));
        info!("approved plan {id}");
        Some(approved)
    }

    /// Executes a plan from `draft` or `approved`, marking it active
    /// for the duration of the run and persisting the final state.
    ///
    /// A plan already executing (or in a terminal state) is refused
    /// with `None` — concurrent calls on the same id cannot both run
    /// because the status flips to `executing` under the lock before
    /// the run starts.
    pub async fn execute_plan(
        &self,
        id: u64,
        options: ExecuteOptions,
    ) -> Option<ExecutionResult> {
        if self.workspace_root.is_none() {
            // Same immediate failure the executor reports, but without
            // disturbing the plan's lifecycle state.
            if !self.plans_guard().contains_key(&id) {
                return None;
            }
            let result = ExecutionResult::environment_failure(
                id,
                "no workspace root configured for execution",
            );
            self.emit(PlanEvent::PlanComplete(result.clone()));
            return Some(result);
        }

        let mut plan = {
            let mut plans = self.plans_guard();
            let plan = plans.get_mut(&id)?;
            if !plan.status.is_executable() {
                return None;
            }
            plan.status = PlanStatus::Executing;
            plan.touch();
            plan.clone()
        };

        *self.active_guard() = Some(id);
        self.emit(PlanEvent::ActivePlanChanged { id: Some(id) });

        let handle = ExecutionHandle::new();
        *super::lock(&self.active_run) = Some((id, handle.clone()));

        let executor = PlanExecutor::new(
            self.workspace_root.clone(),
            self.step_executor.clone(),
            self.events.clone(),
        );
        let result = executor.execute(&mut plan, options, &handle).await;

        self.plans_guard().insert(id, plan.clone());
        self.persist(plan.clone()).await;
        self.emit(PlanEvent::PlanUpdated(plan));

        *super::lock(&self.active_run) = None;
        *self.active_guard() = None;
        self.emit(PlanEvent::ActivePlanChanged { id: None });

        Some(result)
    }

    /// Marks a pending step skipped. While the plan is executing the
    /// request is routed to the live run; otherwise the stored step is
    /// flipped directly. Returns false when the step is not pending or
    /// not found.
    pub async fn skip_step(&self, plan_id: u64, step_id: &str) -> bool {
        {
            let run = super::lock(&self.active_run);
            if let Some((running_id, handle)) = run.as_ref() {
                if *running_id == plan_id {
                    handle.skip_step(step_id);
                    return true;
                }
            }
        }

        let updated = {
            let mut plans = self.plans_guard();
            let Some(plan) = plans.get_mut(&plan_id) else {
                return false;
            };
            if plan.status == PlanStatus::Executing {
                return false;
            }
            let Some(step) = plan.find_step_mut(step_id) else {
                return false;
            };
            if step.status != StepStatus::Pending {
                return false;
            }
            step.status = StepStatus::Skipped;
            plan.touch();
            plan.clone()
        };
        self.persist(updated.clone()).await;
        self.emit(PlanEvent::PlanUpdated(updated));
        true
    }
}
