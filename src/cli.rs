//! Command Line Arguments

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tasklist_core::Priority;

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Manage a task list kept in a hosted backend or a local SQLite file")]
pub struct Cli {
    /// JSON config file (defaults to ./tasklist.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a local SQLite database instead of the hosted backend
    #[arg(long, global = true)]
    pub local: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show all tasks
    List,
    /// Create a task
    Add {
        text: String,
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    /// Flip a task between done and not done
    Toggle { id: String },
    /// Replace a task's text
    Edit { id: String, text: String },
    /// Remove a task
    Delete { id: String },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| format!("expected low, medium or high, got {}", s))
}
