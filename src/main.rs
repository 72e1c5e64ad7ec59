//! Tasklist Entry Point
//!
//! Each invocation is one session: load the list, apply at most one
//! operation, print the result.

mod cli;
mod config;
mod error;
mod render;

use clap::Parser;
use std::process::ExitCode;

use cli::{Cli, Command};
use config::AppConfig;
use error::AppError;
use local_store::SqliteTaskStore;
use tasklist_core::{RestTaskStore, TaskDraft, TaskList, TaskStore};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // the logger is not up yet when config or logger setup failed
            if rolling_logger::error(&e.to_string()).is_err() {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let config = AppConfig::resolve(cli.config.as_deref())?;
    rolling_logger::init_logger(config.log_dir(), "tasklist")?;

    match cli.local.or_else(|| config.local_db.clone()) {
        Some(path) => {
            let _ = rolling_logger::info(&format!("Using local store {}", path.display()));
            let list = TaskList::new(SqliteTaskStore::open(&path)?).with_timeout(config.timeout());
            session(&list, cli.command).await
        }
        None => {
            let store = RestTaskStore::new(config.rest_config()?)?;
            let _ = rolling_logger::info(&format!("Using hosted store {}", store.endpoint()));
            let list = TaskList::new(store).with_timeout(config.timeout());
            session(&list, cli.command).await
        }
    }
}

async fn session<S: TaskStore>(list: &TaskList<S>, command: Command) -> Result<String, AppError> {
    list.load().await?;

    match command {
        Command::List => {}
        Command::Add { text, due, priority } => {
            let mut draft = TaskDraft {
                text,
                due_date: due,
                priority,
            };
            list.add(&mut draft).await?;
        }
        Command::Toggle { id } => {
            list.toggle_complete(&id).await?;
        }
        Command::Edit { id, text } => list.edit_text(&id, &text).await?,
        Command::Delete { id } => list.delete(&id).await?,
    }

    Ok(render::render(&list.snapshot()))
}
