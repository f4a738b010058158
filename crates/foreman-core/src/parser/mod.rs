//! Ambiguity-tolerant parser recovering a structured plan from free text.
//!
//! Plans arrive as unstructured agent output: sometimes a JSON object in
//! a code fence, sometimes structured markdown prose, sometimes a bare
//! numbered list. Three strategies are attempted in strict priority
//! order, first success wins:
//!
//! 1. [`structured`] — a fenced JSON object (or the whole input as one)
//!    with alias-tolerant field names.
//! 2. [`prose`] — markdown headings and list items scanned line by line.
//! 3. [`fallback`] — any numbered-list lines anywhere in the text.
//!
//! Each strategy is a pure function from text to the shared [`Draft`]
//! shape; [`parse_plan`] finalizes the winning draft into a [`Plan`]
//! with deterministic step ids, inferred step types, and derived
//! metadata. Unparseable input yields `None`, never an error.

mod fallback;
mod infer;
mod prose;
mod structured;

#[cfg(test)]
mod tests;

use crate::models::{Complexity, Plan, PlanStep, StepType};

/// Normalized intermediate output shared by all parse strategies.
#[derive(Debug, Default)]
pub(crate) struct Draft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub steps: Vec<DraftStep>,
}

/// A step as recovered by a strategy, before finalization.
#[derive(Debug, Default)]
pub(crate) struct DraftStep {
    pub title: String,
    pub description: Option<String>,
    pub step_type: Option<StepType>,
    pub target: Option<String>,
    pub complexity: Option<Complexity>,
    pub substeps: Vec<DraftStep>,
}

/// Title used when no strategy recovers one.
const DEFAULT_TITLE: &str = "Implementation Plan";

/// Parses free text into a draft plan. Returns `None` when no strategy
/// yields at least one step.
///
/// The returned plan has `id = 0`; the manager assigns the real id when
/// the plan is stored.
pub fn parse_plan(text: &str) -> Option<Plan> {
    let draft = structured::parse(text)
        .or_else(|| prose::parse(text))
        .or_else(|| fallback::parse(text))?;
    if draft.steps.is_empty() {
        return None;
    }
    Some(finalize(draft))
}

/// Turns a draft into a full plan: dotted step ids, inferred step types,
/// default command targets, derived `files_affected`, zeroed counters.
fn finalize(draft: Draft) -> Plan {
    let mut plan = Plan::new(0, draft.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()));
    plan.description = draft.description.filter(|d| !d.is_empty());
    plan.goal = draft.goal.filter(|g| !g.is_empty());
    plan.steps = draft
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| build_step(step, &(i + 1).to_string()))
        .collect();
    plan.metadata.estimated_steps = plan.steps.len() as u32;
    collect_files_affected(&plan.steps, &mut plan.metadata.files_affected);
    plan
}

fn build_step(draft: DraftStep, id: &str) -> PlanStep {
    let mut step = PlanStep::new(id, draft.title);
    step.description = draft.description.filter(|d| !d.is_empty());
    step.step_type = draft.step_type.unwrap_or_else(|| {
        let haystack = match &step.description {
            Some(desc) => format!("{} {desc}", step.title),
            None => step.title.clone(),
        };
        infer::step_type(&haystack)
    });
    step.target = draft.target;
    if step.target.is_none() && step.step_type == StepType::Command {
        step.target = Some(infer::command_target(&step.title));
    }
    if let Some(complexity) = draft.complexity {
        step.estimated_complexity = complexity;
    }
    step.substeps = draft
        .substeps
        .into_iter()
        .enumerate()
        .map(|(i, sub)| build_step(sub, &format!("{id}.{}", i + 1)))
        .collect();
    step
}

fn collect_files_affected(steps: &[PlanStep], files: &mut std::collections::BTreeSet<String>) {
    for step in steps {
        if step.step_type.is_file_type() {
            if let Some(target) = &step.target {
                files.insert(target.clone());
            }
        }
        collect_files_affected(&step.substeps, files);
    }
}

/// Strips bold markers and checkbox/status markers from a step title.
pub(crate) fn clean_title(raw: &str) -> String {
    let mut text = raw.trim();
    // Leading "[x]" / "[ ]" style markers from rendered plans
    if let Some(rest) = strip_marker(text) {
        text = rest;
    }
    text.replace("**", "").trim().to_string()
}

fn strip_marker(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('[')?;
    let (inside, after) = rest.split_once(']')?;
    if inside.len() <= 1 {
        Some(after.trim_start())
    } else {
        None
    }
}
