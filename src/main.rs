//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration, Types, Errors
//! - Infrastructure: Path guard, Classifier, File store
//! - Application: Registry, Dispatcher, Logging, Context
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::dispatcher::ToolDispatcher;
use crate::domain::config::AppConfig;
use crate::infrastructure::tools::sandbox::PathGuard;
use crate::infrastructure::tools::store::FileStore;
use crate::interface::commands;
use crate::strings::{help, logs};

#[derive(Debug, Parser)]
#[command(name = "fsgate", version, about = help::ABOUT, long_about = help::LONG_ABOUT)]
struct Cli {
    /// Configuration file (default: <user config dir>/fsgate/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = help::TOOLS)]
    Tools,

    #[command(about = help::CALL)]
    Call {
        /// Tool name, e.g. read_file
        tool: String,
        /// Parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        args: Option<String>,
    },

    #[command(about = help::SERVE, long_about = help::SERVE)]
    Serve,

    #[command(about = help::CONTEXT)]
    Context {
        /// File or directory inside the sandbox
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(cli.config.as_deref())?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    match &config.source {
        Some(path) => tracing::info!("{}", logs::config_loaded(&path.display().to_string())),
        None => tracing::info!("{}", logs::config_loaded("defaults")),
    }

    // 3. Sandbox (always the working directory)
    let guard = PathGuard::from_current_dir().context("Failed to resolve sandbox root")?;
    let store = FileStore::new(guard).with_max_file_size(config.limits.max_file_size);
    tracing::info!("{}", logs::session_started(store.guard().root()));

    let dispatcher = ToolDispatcher::new(store);

    // 4. Dispatch
    let ok = match cli.command {
        Command::Tools => {
            commands::tools::handle_tools()?;
            true
        }
        Command::Call { tool, args } => {
            commands::call::handle_call(&dispatcher, &tool, args.as_deref())?
        }
        Command::Serve => {
            commands::serve::handle_serve(Arc::new(dispatcher)).await?;
            true
        }
        Command::Context { path } => {
            commands::context::handle_context(dispatcher.store(), &path)?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from([
            "fsgate",
            "--config",
            "alt.yaml",
            "call",
            "read_file",
            "--args",
            r#"{"file_path": "a.txt"}"#,
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
        let Command::Call { tool, args } = cli.command else {
            panic!("expected call");
        };
        assert_eq!(tool, "read_file");
        assert_eq!(args.as_deref(), Some(r#"{"file_path": "a.txt"}"#));
    }
}
