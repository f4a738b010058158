//! Prose parse strategy: markdown headings and list items.
//!
//! The scanner walks the text line by line. The first heading becomes
//! the plan title; recognized section headings switch collection modes
//! (description, goal, steps). In step mode a heading deeper than the
//! steps heading or a top-level numbered/bulleted line starts a new
//! step, indented bullets become substeps, and any other non-empty line
//! appends to the current step's (or section's) description. A heading
//! at or above the steps-heading level leaves step mode, so trailing
//! sections of a rendered plan do not turn into phantom steps.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{clean_title, Draft, DraftStep};

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*$").expect("valid regex"));
static RE_NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)\d+[.)]\s+(.+)$").expect("valid regex"));
static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.+)$").expect("valid regex"));

const DESCRIPTION_SECTIONS: &[&str] = &["description", "summary", "overview"];
const GOAL_SECTIONS: &[&str] = &["goal", "objective", "purpose"];
const STEP_SECTIONS: &[&str] = &["steps", "tasks", "implementation", "plan"];

/// Indentation at which a bullet is treated as a substep.
const SUBSTEP_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Description,
    Goal,
    Steps,
}

fn classify_heading(text: &str) -> Option<Section> {
    let lowered = text.to_lowercase();
    let matches_any = |names: &[&str]| names.iter().any(|n| lowered.contains(n));
    if matches_any(DESCRIPTION_SECTIONS) {
        Some(Section::Description)
    } else if matches_any(GOAL_SECTIONS) {
        Some(Section::Goal)
    } else if matches_any(STEP_SECTIONS) {
        Some(Section::Steps)
    } else {
        None
    }
}

pub(super) fn parse(text: &str) -> Option<Draft> {
    let mut draft = Draft::default();
    let mut description_lines: Vec<String> = Vec::new();
    let mut goal_lines: Vec<String> = Vec::new();
    let mut section = Section::None;
    let mut steps_level = 0usize;

    for line in text.lines() {
        if let Some(captures) = RE_HEADING.captures(line) {
            let level = captures[1].len();
            let heading = captures[2].to_string();

            if draft.title.is_none() {
                draft.title = Some(clean_title(&heading));
                section = Section::None;
                continue;
            }
            if section == Section::Steps && level > steps_level {
                // Sub-heading inside the step list starts a new step.
                draft.steps.push(DraftStep {
                    title: clean_title(&heading),
                    ..DraftStep::default()
                });
                continue;
            }
            match classify_heading(&heading) {
                Some(Section::Steps) => {
                    section = Section::Steps;
                    steps_level = level;
                }
                Some(next) => section = next,
                None => section = Section::None,
            }
            continue;
        }

        let trimmed = line.trim();
        match section {
            Section::Steps => collect_step_line(&mut draft.steps, line, trimmed),
            Section::Description => {
                if !trimmed.is_empty() {
                    description_lines.push(trimmed.to_string());
                }
            }
            Section::Goal => {
                if !trimmed.is_empty() {
                    goal_lines.push(trimmed.to_string());
                }
            }
            Section::None => {}
        }
    }

    if !description_lines.is_empty() {
        draft.description = Some(description_lines.join("\n"));
    }
    if !goal_lines.is_empty() {
        draft.goal = Some(goal_lines.join("\n"));
    }
    if draft.steps.is_empty() {
        None
    } else {
        Some(draft)
    }
}

fn collect_step_line(steps: &mut Vec<DraftStep>, line: &str, trimmed: &str) {
    let list_item = RE_NUMBERED
        .captures(line)
        .or_else(|| RE_BULLET.captures(line));

    if let Some(captures) = list_item {
        let indent = captures[1].len();
        let title = clean_title(&captures[2]);
        if indent >= SUBSTEP_INDENT {
            if let Some(current) = steps.last_mut() {
                current.substeps.push(DraftStep {
                    title,
                    ..DraftStep::default()
                });
                return;
            }
        }
        steps.push(DraftStep {
            title,
            ..DraftStep::default()
        });
        return;
    }

    if trimmed.is_empty() {
        return;
    }
    if let Some(current) = steps.last_mut() {
        match &mut current.description {
            Some(description) => {
                description.push('\n');
                description.push_str(trimmed);
            }
            None => current.description = Some(trimmed.to_string()),
        }
    }
}
