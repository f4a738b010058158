//! Display implementations for the domain models.
//!
//! A plan renders as a markdown report: title, metadata bullets, the
//! description paragraph, a `## Steps` checklist, and a
//! `## Affected Files` section. The checklist syntax mirrors what the
//! prose parse strategy reads back in, so an exported plan survives a
//! round trip through the parser.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Complexity, Plan, PlanStatus, PlanStep, StepStatus, StepType};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        if let Some(goal) = &self.goal {
            writeln!(f, "- Goal: {goal}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        let (finished, total) = self.progress();
        writeln!(
            f,
            "- Progress: {}% ({finished}/{total} steps)",
            self.progress_percent()
        )?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for (index, step) in self.steps.iter().enumerate() {
                step.fmt_numbered(f, index + 1)?;
            }
        }

        if !self.metadata.files_affected.is_empty() {
            writeln!(f, "\n## Affected Files")?;
            writeln!(f)?;
            for file in &self.metadata.files_affected {
                writeln!(f, "- {file}")?;
            }
        }

        Ok(())
    }
}

impl PlanStep {
    /// Formats the step as a numbered checklist entry with its details
    /// on indented continuation lines and substeps as indented bullets.
    fn fmt_numbered(&self, f: &mut fmt::Formatter<'_>, ordinal: usize) -> fmt::Result {
        writeln!(f, "{ordinal}. {} **{}**", self.status.marker(), self.title)?;
        if let Some(desc) = &self.description {
            for line in desc.lines() {
                writeln!(f, "   {line}")?;
            }
        }
        if let Some(error) = &self.error {
            writeln!(f, "   Error: {error}")?;
        }
        for substep in &self.substeps {
            substep.fmt_bullet(f)?;
        }
        Ok(())
    }

    fn fmt_bullet(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   - {} **{}**", self.status.marker(), self.title)?;
        // Deeper nesting flattens to one bullet level.
        for substep in &self.substeps {
            substep.fmt_bullet(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} ({})",
            self.status.with_icon(),
            self.title,
            self.step_type
        )?;
        if let Some(target) = &self.target {
            writeln!(f, "  Target: {target}")?;
        }
        if let Some(desc) = &self.description {
            writeln!(f, "  {desc}")?;
        }
        if self.status == StepStatus::Failed {
            if let Some(error) = &self.error {
                writeln!(f, "  Error: {error}")?;
            }
        }
        Ok(())
    }
}
