//! Keyword-based step type inference.
//!
//! Rules are evaluated in a fixed order and the first match wins. The
//! ordering is load-bearing: "update the deploy command" must infer
//! `file-edit` because edit keywords are checked before command
//! keywords, while "run the deploy command" infers `command`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::StepType;

const EDIT_KEYWORDS: &[&str] = &["edit", "modify", "update", "change"];
const DELETE_KEYWORDS: &[&str] = &["delete", "remove"];
const COMMAND_KEYWORDS: &[&str] = &["run", "execute", "command"];
const PACKAGE_MANAGERS: &[&str] = &["npm", "yarn", "pnpm", "cargo", "pip", "make", "gradle"];
const RESEARCH_KEYWORDS: &[&str] = &["research", "investigate", "analyze", "explore"];
const REVIEW_KEYWORDS: &[&str] = &["review", "test", "verify"];

const SOURCE_EXTENSIONS: &[&str] = &[
    ".rs", ".ts", ".tsx", ".js", ".jsx", ".py", ".go", ".java", ".rb", ".c", ".cpp", ".h",
    ".css", ".html", ".json", ".toml", ".yaml", ".yml", ".md", ".sh", ".sql",
];

static RE_BACKTICK: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Infers the step type from the lowercased concatenation of a step's
/// title and description.
pub(crate) fn step_type(text: &str) -> StepType {
    let text = text.to_lowercase();

    if text.contains("create")
        && (text.contains("file") || contains_any(&text, SOURCE_EXTENSIONS))
    {
        StepType::FileCreate
    } else if contains_any(&text, EDIT_KEYWORDS) {
        StepType::FileEdit
    } else if contains_any(&text, DELETE_KEYWORDS) {
        StepType::FileDelete
    } else if contains_any(&text, COMMAND_KEYWORDS) || contains_any(&text, PACKAGE_MANAGERS) {
        StepType::Command
    } else if contains_any(&text, RESEARCH_KEYWORDS) {
        StepType::Research
    } else if contains_any(&text, REVIEW_KEYWORDS) {
        StepType::Review
    } else {
        StepType::Other
    }
}

/// Default shell command for a command-inferred step with no explicit
/// target: backtick content when present, otherwise the full title.
pub(crate) fn command_target(title: &str) -> String {
    if let Some(captures) = RE_BACKTICK.captures(title) {
        return captures[1].to_string();
    }
    title.trim().to_string()
}
