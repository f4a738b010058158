//! Collection wrappers for displaying groups of plans.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::Plan;

/// Newtype wrapper rendering a list of plans as compact summaries.
///
/// Each plan shows its title, id, lifecycle state, and step progress
/// without the full step checklist. Empty collections render a short
/// notice instead of nothing.
pub struct PlanSummaries(pub Vec<Plan>);

impl PlanSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.0.iter()
    }
}

impl IntoIterator for PlanSummaries {
    type Item = Plan;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            let (finished, total) = plan.progress();
            writeln!(f, "## {} (ID: {})", plan.title, plan.id)?;
            writeln!(f)?;
            writeln!(f, "- **Status**: {}", plan.status)?;
            if total > 0 {
                writeln!(f, "- **Progress**: {finished}/{total} steps")?;
            }
            if let Some(desc) = &plan.description {
                writeln!(f, "- **Description**: {desc}")?;
            }
            writeln!(f, "- **Updated**: {}", LocalDateTime(&plan.updated_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanStep;

    #[test]
    fn test_plan_summaries_display() {
        let mut plan = Plan::new(1, "Test Plan");
        plan.description = Some("A test plan".to_string());
        plan.steps = vec![PlanStep::new("1", "Only step")];
        let mut second = Plan::new(2, "Second Plan");
        second.steps = vec![PlanStep::new("1", "Other step")];

        let output = format!("{}", PlanSummaries(vec![plan, second]));
        assert!(output.contains("## Test Plan (ID: 1)"));
        assert!(output.contains("## Second Plan (ID: 2)"));
        assert!(output.contains("- **Status**: draft"));
        assert!(output.contains("- **Progress**: 0/1 steps"));
        assert!(!output.starts_with("# "));
    }

    #[test]
    fn test_plan_summaries_display_empty() {
        let output = format!("{}", PlanSummaries(vec![]));
        assert_eq!(output, "No plans found.\n");
    }
}
