//! Tests for the parser module.

use super::*;
use crate::models::{StepStatus, StepType};

#[test]
fn parses_fenced_json_plan() {
    let text = r#"
Here is the plan:

```json
{
  "title": "Add login",
  "description": "Wire up the login flow",
  "goal": "Users can sign in",
  "steps": [
    {
      "title": "Create auth module",
      "type": "file-create",
      "target": "src/auth.rs",
      "estimated_complexity": "high"
    },
    {
      "title": "Run the test suite",
      "command": "cargo test"
    }
  ]
}
```
"#;

    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.title, "Add login");
    assert_eq!(plan.description.as_deref(), Some("Wire up the login flow"));
    assert_eq!(plan.goal.as_deref(), Some("Users can sign in"));
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].id, "1");
    assert_eq!(plan.steps[0].step_type, StepType::FileCreate);
    assert_eq!(plan.steps[0].target.as_deref(), Some("src/auth.rs"));
    assert_eq!(
        plan.steps[0].estimated_complexity,
        crate::models::Complexity::High
    );
    // "command" is an alias for target; type inferred from "run"
    assert_eq!(plan.steps[1].step_type, StepType::Command);
    assert_eq!(plan.steps[1].target.as_deref(), Some("cargo test"));
    assert_eq!(plan.metadata.estimated_steps, 2);
    assert!(plan.metadata.files_affected.contains("src/auth.rs"));
    assert_eq!(plan.status, crate::models::PlanStatus::Draft);
}

#[test]
fn parses_bare_json_object_with_aliases() {
    let text = r#"{
        "name": "Cleanup",
        "summary": "Tidy the workspace",
        "objective": "Less clutter",
        "tasks": [
            { "task": "Delete the scratch file", "path": "tmp/scratch.txt" },
            "Research logging options"
        ]
    }"#;

    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.title, "Cleanup");
    assert_eq!(plan.description.as_deref(), Some("Tidy the workspace"));
    assert_eq!(plan.goal.as_deref(), Some("Less clutter"));
    assert_eq!(plan.steps[0].step_type, StepType::FileDelete);
    assert_eq!(plan.steps[0].target.as_deref(), Some("tmp/scratch.txt"));
    assert_eq!(plan.steps[1].step_type, StepType::Research);
}

#[test]
fn json_with_no_steps_falls_through() {
    // A valid object without steps must not win; the numbered lines
    // below it are picked up by the fallback strategy.
    let text = "{\"title\": \"Empty\"}\n\n1. Investigate the crash";
    let plan = parse_plan(text).expect("fallback should produce steps");
    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].step_type, StepType::Research);
}

#[test]
fn parses_markdown_prose_plan() {
    let text = "\
# Refactor configuration

## Overview

Collapse the three config loaders into one.

## Goal

Single source of truth for settings.

## Steps

1. **Edit the loader** in src/config.rs
   Merge the file and env paths.
2. Delete the legacy helpers
   - Remove src/config_env.rs
   - Remove src/config_file.rs
3. Run `cargo test`
";

    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.title, "Refactor configuration");
    assert_eq!(
        plan.description.as_deref(),
        Some("Collapse the three config loaders into one.")
    );
    assert_eq!(
        plan.goal.as_deref(),
        Some("Single source of truth for settings.")
    );
    assert_eq!(plan.steps.len(), 3);
    assert_eq!(plan.steps[0].title, "Edit the loader in src/config.rs");
    assert_eq!(plan.steps[0].step_type, StepType::FileEdit);
    assert_eq!(
        plan.steps[0].description.as_deref(),
        Some("Merge the file and env paths.")
    );
    assert_eq!(plan.steps[1].substeps.len(), 2);
    assert_eq!(plan.steps[1].substeps[0].id, "2.1");
    assert_eq!(plan.steps[1].substeps[0].title, "Remove src/config_env.rs");
    assert_eq!(plan.steps[2].step_type, StepType::Command);
    assert_eq!(plan.steps[2].target.as_deref(), Some("cargo test"));
}

#[test]
fn prose_subheadings_start_steps() {
    let text = "\
# Migration plan

## Tasks

### Create the schema file

Add migrations/001.sql with the base tables.

### Verify the rollout

Check staging first.
";

    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].title, "Create the schema file");
    assert_eq!(plan.steps[0].step_type, StepType::FileCreate);
    assert_eq!(plan.steps[1].step_type, StepType::Review);
}

#[test]
fn prose_section_after_steps_does_not_become_a_step() {
    let text = "\
# Ship it

## Steps

1. Update the changelog

## Affected Files

- CHANGELOG.md
";

    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].title, "Update the changelog");
}

#[test]
fn flat_list_fallback_scenario() {
    let text = "1. Fix the login bug\n2. Add a test for it\n3. npm run build";
    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.steps.len(), 3);
    // "fix" matches no keyword rule, "test" matches review,
    // "npm"/"run" match command.
    assert_eq!(plan.steps[0].step_type, StepType::Other);
    assert_eq!(plan.steps[1].step_type, StepType::Review);
    assert_eq!(plan.steps[2].step_type, StepType::Command);
    assert_eq!(plan.steps[2].target.as_deref(), Some("npm run build"));
    assert!(plan.steps.iter().all(|s| s.status == StepStatus::Pending));
}

#[test]
fn unparseable_input_yields_none() {
    assert!(parse_plan("").is_none());
    assert!(parse_plan("just a paragraph of text with no list").is_none());
    assert!(parse_plan("# A heading\n\nand prose, but no steps").is_none());
}

#[test]
fn inference_order_is_load_bearing() {
    // Edit keywords are checked before command keywords.
    assert_eq!(
        infer::step_type("update the deploy command"),
        StepType::FileEdit
    );
    assert_eq!(infer::step_type("run the deploy command"), StepType::Command);
    // Create requires a file mention or source extension.
    assert_eq!(
        infer::step_type("create the parser file"),
        StepType::FileCreate
    );
    assert_eq!(infer::step_type("create src/parser.rs"), StepType::FileCreate);
    assert_eq!(infer::step_type("create a branch"), StepType::Other);
    // "review" before fallthrough.
    assert_eq!(infer::step_type("review the diff"), StepType::Review);
    assert_eq!(
        infer::step_type("investigate flaky timeouts"),
        StepType::Research
    );
}

#[test]
fn titles_are_cleaned_of_markers() {
    assert_eq!(clean_title("**Bold title**"), "Bold title");
    assert_eq!(clean_title("[x] **Done already**"), "Done already");
    assert_eq!(clean_title("[ ] Pending thing"), "Pending thing");
    assert_eq!(clean_title("  plain  "), "plain");
}

#[test]
fn step_ids_are_deterministic_dotted_ordinals() {
    let text = "\
# Nested

## Steps

1. First
   - Sub one
   - Sub two
2. Second
";
    let plan = parse_plan(text).expect("plan should parse");
    assert_eq!(plan.steps[0].id, "1");
    assert_eq!(plan.steps[0].substeps[0].id, "1.1");
    assert_eq!(plan.steps[0].substeps[1].id, "1.2");
    assert_eq!(plan.steps[1].id, "2");

    let again = parse_plan(text).expect("plan should parse");
    let ids: Vec<_> = again.steps.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}
