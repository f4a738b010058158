//! Command handlers bridging clap arguments to the plan manager.
//!
//! Each handler converts its argument struct into manager calls and
//! renders the outcome as markdown through the terminal renderer.
//! Execution additionally streams progress events and, when per-step
//! approval is on, prompts on each gated step.

use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use foreman_core::{
    ExecuteOptions, ExecutionReport, PlanEvent, PlanManager, PlanStatus, PlanSummaries,
};
use log::warn;
use tokio::task;

use crate::args::{
    ActivePlanArgs, DeletePlanArgs, ExecuteArgs, ExportArgs, ListPlansArgs, NewPlanArgs,
    ParseArgs, PlanIdArgs, SkipStepArgs,
};
use crate::renderer::TerminalRenderer;

pub struct Cli {
    manager: Arc<PlanManager>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(manager: PlanManager, renderer: TerminalRenderer) -> Self {
        Self {
            manager: Arc::new(manager),
            renderer,
        }
    }

    pub async fn parse(&self, args: ParseArgs) -> Result<()> {
        let text = match args.file.as_deref() {
            Some(path) if path != std::path::Path::new("-") => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            _ => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read plan text from stdin")?;
                buffer
            }
        };

        let plan = self
            .manager
            .create_plan_from_text(&text)
            .await
            .ok_or_else(|| anyhow!("no steps recognized in the plan text"))?;

        self.renderer
            .line(&format!("Created plan with ID: {}\n", plan.id));
        self.renderer.render(&plan.to_string())
    }

    pub async fn new_plan(&self, args: NewPlanArgs) -> Result<()> {
        let plan = self
            .manager
            .create_plan(&args.title, args.description.as_deref(), args.goal.as_deref())
            .await;
        self.renderer
            .line(&format!("Created plan with ID: {}\n", plan.id));
        self.renderer.render(&plan.to_string())
    }

    pub fn list(&self, args: ListPlansArgs) -> Result<()> {
        let plans = match &args.status {
            Some(raw) => {
                let status = PlanStatus::from_str(raw).map_err(|e| anyhow!(e))?;
                self.manager.plans_by_status(status)
            }
            None => self.manager.plans(),
        };
        self.renderer.render("# Plans\n")?;
        self.renderer.render(&PlanSummaries(plans).to_string())
    }

    pub fn show(&self, args: PlanIdArgs) -> Result<()> {
        let markdown = self
            .manager
            .export_markdown(args.id)
            .ok_or_else(|| anyhow!("plan {} not found", args.id))?;
        self.renderer.render(&markdown)
    }

    pub async fn approve(&self, args: PlanIdArgs) -> Result<()> {
        match self.manager.approve_plan(args.id).await {
            Some(plan) => {
                self.renderer
                    .line(&format!("Approved plan {} ({})", plan.id, plan.title));
                Ok(())
            }
            None => bail!("plan {} not found or not in draft state", args.id),
        }
    }

    pub async fn execute(&self, args: ExecuteArgs) -> Result<()> {
        let options = ExecuteOptions {
            auto_approve: args.auto_approve,
            dry_run: args.dry_run,
            continue_on_error: !args.stop_on_error,
        };

        let progress = self.spawn_progress_loop(args.id, args.auto_approve);
        let result = self.manager.execute_plan(args.id, options).await;
        let outcome = match result {
            Some(result) => result,
            None => {
                progress.abort();
                bail!(
                    "plan {} not found or not executable in its current state",
                    args.id
                );
            }
        };
        if let Err(e) = progress.await {
            if !e.is_cancelled() {
                warn!("progress loop failed: {e}");
            }
        }

        self.renderer.line("");
        self.renderer
            .render(&ExecutionReport(outcome.clone()).to_string())?;
        if outcome.success {
            Ok(())
        } else {
            bail!("execution did not complete successfully")
        }
    }

    /// Streams step progress until the run completes. When per-step
    /// approval is on, each gated step prompts on the terminal.
    fn spawn_progress_loop(
        &self,
        plan_id: u64,
        auto_approve: bool,
    ) -> task::JoinHandle<()> {
        let manager = Arc::clone(&self.manager);
        let mut events = self.manager.subscribe();
        task::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                };
                match event {
                    PlanEvent::StepStart(step) => {
                        println!("[{}] {} ...", step.id, step.title);
                    }
                    PlanEvent::StepComplete(step) => {
                        println!("[{}] {} done", step.id, step.title);
                    }
                    PlanEvent::StepFailed { step, error } => {
                        println!("[{}] {} FAILED: {error}", step.id, step.title);
                    }
                    PlanEvent::ApprovalRequired(step) if !auto_approve => {
                        prompt_for_step(&manager, plan_id, &step.id, &step.title).await;
                    }
                    PlanEvent::PlanComplete(_) => break,
                    _ => {}
                }
            }
        })
    }

    pub async fn skip(&self, args: SkipStepArgs) -> Result<()> {
        if self.manager.skip_step(args.id, &args.step_id).await {
            self.renderer
                .line(&format!("Skipped step {} of plan {}", args.step_id, args.id));
            Ok(())
        } else {
            bail!(
                "step {} of plan {} not found or not pending",
                args.step_id,
                args.id
            )
        }
    }

    pub async fn delete(&self, args: DeletePlanArgs) -> Result<()> {
        if !args.confirm {
            bail!("deletion is permanent; re-run with --confirm");
        }
        if self.manager.delete_plan(args.id).await {
            self.renderer.line(&format!("Deleted plan {}", args.id));
            Ok(())
        } else {
            bail!("plan {} not found or currently executing", args.id)
        }
    }

    pub fn export(&self, args: ExportArgs) -> Result<()> {
        let markdown = self
            .manager
            .export_markdown(args.id)
            .ok_or_else(|| anyhow!("plan {} not found", args.id))?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, &markdown)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                self.renderer
                    .line(&format!("Exported plan {} to {}", args.id, path.display()));
            }
            // Raw markdown on stdout stays pipeable.
            None => print!("{markdown}"),
        }
        Ok(())
    }

    pub fn active(&self, args: ActivePlanArgs) -> Result<()> {
        if args.clear {
            self.manager.set_active_plan(None);
            self.renderer.line("Cleared the active plan");
            return Ok(());
        }
        match args.id {
            Some(id) => {
                if !self.manager.set_active_plan(Some(id)) {
                    bail!("plan {id} not found");
                }
                self.renderer.line(&format!("Plan {id} is now active"));
                Ok(())
            }
            None => match self.manager.active_plan() {
                Some(plan) => self.renderer.render(&PlanSummaries(vec![plan]).to_string()),
                None => {
                    self.renderer.line("No active plan.");
                    Ok(())
                }
            },
        }
    }
}

/// Asks the user what to do with a gated step and forwards the answer
/// to the live run.
async fn prompt_for_step(manager: &PlanManager, plan_id: u64, step_id: &str, title: &str) {
    println!("Step {step_id} ({title}) awaits approval: [a]pprove / [s]kip / [c]ancel");
    let answer = task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await;
    let answer = match answer {
        Ok(Ok(line)) => line.trim().to_lowercase(),
        _ => String::new(),
    };
    match answer.as_str() {
        "s" | "skip" => {
            manager.skip_step(plan_id, step_id).await;
        }
        "c" | "cancel" => {
            manager.cancel_execution();
        }
        // Anything else, including a bare enter, approves.
        _ => {
            manager.approve_step(step_id);
        }
    }
}
