//! Structured parse strategy: a JSON object, fenced or bare.
//!
//! Accepts a fenced code block containing an object, or the entire
//! input when it is itself one object. Field names are normalized
//! through serde aliases (`title`/`name`, `steps`/`tasks`, per-step
//! `target`/`file`/`path`/`command`, and so on); a step may also be a
//! bare string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{Draft, DraftStep};
use crate::models::{Complexity, StepType};

static RE_FENCED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[a-zA-Z]*\s*(\{.*?\})\s*```").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(alias = "name")]
    title: Option<String>,
    #[serde(alias = "summary")]
    description: Option<String>,
    #[serde(alias = "objective")]
    goal: Option<String>,
    #[serde(default, alias = "tasks")]
    steps: Vec<RawStepDef>,
}

/// A step entry may be a full object or a bare title string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStepDef {
    Text(String),
    Full(RawStep),
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(alias = "name", alias = "task")]
    title: Option<String>,
    #[serde(alias = "summary")]
    description: Option<String>,
    #[serde(rename = "type")]
    step_type: Option<String>,
    #[serde(alias = "file", alias = "path", alias = "command")]
    target: Option<String>,
    #[serde(
        alias = "complexity",
        alias = "estimatedComplexity",
        rename = "estimated_complexity"
    )]
    complexity: Option<String>,
    #[serde(default, alias = "subtasks", alias = "children")]
    substeps: Vec<RawStepDef>,
}

pub(super) fn parse(text: &str) -> Option<Draft> {
    let raw = extract_object(text).and_then(|json| serde_json::from_str::<RawPlan>(&json).ok())?;
    if raw.steps.is_empty() {
        return None;
    }
    Some(Draft {
        title: raw.title.map(|t| super::clean_title(&t)),
        description: raw.description,
        goal: raw.goal,
        steps: raw.steps.into_iter().map(convert_step).collect(),
    })
}

/// Pulls the first fenced object out of the text, or returns the whole
/// input when it is itself an object.
fn extract_object(text: &str) -> Option<String> {
    if let Some(captures) = RE_FENCED_OBJECT.captures(text) {
        return Some(captures[1].to_string());
    }
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed.to_string());
    }
    None
}

fn convert_step(raw: RawStepDef) -> DraftStep {
    let raw = match raw {
        RawStepDef::Text(title) => {
            return DraftStep {
                title: super::clean_title(&title),
                ..DraftStep::default()
            }
        }
        RawStepDef::Full(raw) => raw,
    };
    DraftStep {
        title: super::clean_title(raw.title.as_deref().unwrap_or("Untitled step")),
        description: raw.description,
        step_type: raw
            .step_type
            .and_then(|t| t.parse::<StepType>().ok()),
        target: raw.target,
        complexity: raw
            .complexity
            .and_then(|c| c.parse::<Complexity>().ok()),
        substeps: raw.substeps.into_iter().map(convert_step).collect(),
    }
}
