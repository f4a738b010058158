use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use foreman_core::{PlanManager, PlanManagerBuilder, StepExecutor};
use tempfile::TempDir;

/// Step executor stub that records every instruction it receives and
/// optionally fails instructions containing a marker substring.
pub struct MockStepExecutor {
    instructions: Mutex<Vec<String>>,
    fail_containing: Option<String>,
}

impl MockStepExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            instructions: Mutex::new(Vec::new()),
            fail_containing: None,
        })
    }

    /// Executor that fails any instruction containing the marker.
    pub fn failing_on(marker: &str) -> Arc<Self> {
        Arc::new(Self {
            instructions: Mutex::new(Vec::new()),
            fail_containing: Some(marker.to_string()),
        })
    }

    pub fn recorded(&self) -> Vec<String> {
        self.instructions.lock().expect("poisoned lock").clone()
    }
}

#[async_trait]
impl StepExecutor for MockStepExecutor {
    async fn execute(&self, instruction: &str) -> anyhow::Result<String> {
        self.instructions
            .lock()
            .expect("poisoned lock")
            .push(instruction.to_string());
        if let Some(marker) = &self.fail_containing {
            if instruction.contains(marker) {
                anyhow::bail!("simulated step failure");
            }
        }
        Ok(format!("mock output for: {instruction}"))
    }
}

/// Manager backed by a temp database with the temp dir doubling as the
/// workspace root.
pub async fn create_test_manager(executor: Arc<MockStepExecutor>) -> (TempDir, PlanManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let manager = PlanManagerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_workspace_root(Some(temp_dir.path()))
        .with_step_executor(executor)
        .build()
        .await
        .expect("Failed to create manager");
    (temp_dir, manager)
}

/// Manager with a database only, no workspace root or step executor.
pub async fn create_bare_manager() -> (TempDir, PlanManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let manager = PlanManagerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create manager");
    (temp_dir, manager)
}
