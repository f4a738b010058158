//! Builder for creating and configuring PlanManager instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;

use super::PlanManager;
use crate::error::{ForemanError, Result};
use crate::executor::StepExecutor;
use crate::store::PlanStore;

/// Builder for creating and configuring [`PlanManager`] instances.
#[derive(Default)]
pub struct PlanManagerBuilder {
    database_path: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
    step_executor: Option<Arc<dyn StepExecutor>>,
}

impl PlanManagerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/foreman/foreman.db` or
    /// `~/.local/share/foreman/foreman.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the workspace root that command steps run in. Execution is
    /// refused without one.
    pub fn with_workspace_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.workspace_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the external step executor that file and research steps are
    /// delegated to. Without one, those step types fail per step.
    pub fn with_step_executor(mut self, executor: Arc<dyn StepExecutor>) -> Self {
        self.step_executor = Some(executor);
        self
    }

    /// Builds the configured manager, opening the store and loading all
    /// persisted plans into memory.
    ///
    /// # Errors
    ///
    /// Returns `ForemanError::FileSystem` if the database path is invalid
    /// and `ForemanError::Store` if the store cannot be initialized.
    pub async fn build(self) -> Result<PlanManager> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ForemanError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let load_path = db_path.clone();
        let plans = task::spawn_blocking(move || PlanStore::new(&load_path)?.list())
            .await
            .map_err(|e| ForemanError::Configuration {
                message: format!("Task join error: {e}"),
            })??;

        Ok(PlanManager::new(
            db_path,
            self.workspace_root,
            self.step_executor,
            plans,
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("foreman")
            .place_data_file("foreman.db")
            .map_err(|e| ForemanError::XdgDirectory(e.to_string()))
    }
}
