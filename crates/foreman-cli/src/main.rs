//! Foreman CLI application
//!
//! Command-line interface for parsing, approving, and executing plans.

mod agent;
mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use agent::SubprocessAgent;
use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use foreman_core::PlanManagerBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        workspace_root,
        agent_cmd,
        no_color,
        command,
    } = Args::parse();

    let workspace_root = match workspace_root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let mut builder = PlanManagerBuilder::new()
        .with_database_path(database_file)
        .with_workspace_root(Some(workspace_root));
    if let Some(agent_cmd) = agent_cmd {
        builder = builder.with_step_executor(Arc::new(SubprocessAgent::new(agent_cmd)));
    }
    let manager = builder
        .build()
        .await
        .context("Failed to initialize plan manager")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(manager, renderer);

    info!("Foreman started");

    match command {
        Parse(args) => cli.parse(args).await,
        New(args) => cli.new_plan(args).await,
        List(args) => cli.list(args),
        Show(args) => cli.show(args),
        Approve(args) => cli.approve(args).await,
        Execute(args) => cli.execute(args).await,
        Skip(args) => cli.skip(args).await,
        Delete(args) => cli.delete(args).await,
        Export(args) => cli.export(args),
        Active(args) => cli.active(args),
    }
}
