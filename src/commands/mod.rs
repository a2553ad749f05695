pub mod record;
pub mod show;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::errors::RecapError;
use crate::utils::default_cache_root;

#[derive(Parser)]
#[command(name = "recap")]
#[command(about = "Records per-project work sessions so a later run can pick up where the last one left off")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Record {
        #[arg(short, long)]
        task: String,
        #[arg(short, long, default_value = "")]
        summary: String,
        #[arg(long)]
        allow_empty_summary: bool,
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
        #[arg(long)]
        cache_root: Option<PathBuf>,
    },
    Show {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
        #[arg(long)]
        cache_root: Option<PathBuf>,
    },
}

pub fn run_command(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Record {
            task,
            summary,
            allow_empty_summary,
            project,
            cache_root,
        } => record::handle_record(&task, &summary, allow_empty_summary, &project, cache_root),
        Commands::Show {
            project,
            cache_root,
        } => show::handle_show(&project, cache_root),
    }
}

fn resolve_cache_root(overridden: Option<PathBuf>) -> Result<PathBuf, RecapError> {
    match overridden {
        Some(root) => Ok(root),
        None => default_cache_root().ok_or(RecapError::CacheDirUnavailable),
    }
}
