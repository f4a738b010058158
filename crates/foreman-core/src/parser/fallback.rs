//! Flat-list fallback strategy: any numbered lines anywhere in the text.
//!
//! Last resort when neither the structured nor the prose strategy
//! recovers a step. Every `1.` / `2)` style line becomes a step with no
//! description.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{clean_title, Draft, DraftStep};

static RE_NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("valid regex"));

pub(super) fn parse(text: &str) -> Option<Draft> {
    let steps: Vec<DraftStep> = text
        .lines()
        .filter_map(|line| RE_NUMBERED_LINE.captures(line))
        .map(|captures| DraftStep {
            title: clean_title(&captures[1]),
            ..DraftStep::default()
        })
        .collect();

    if steps.is_empty() {
        None
    } else {
        Some(Draft {
            steps,
            ..Draft::default()
        })
    }
}
