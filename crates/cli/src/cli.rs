use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Filter news items against user-authored trigger rules.
///
/// Compiles a trigger rule file and runs batches of news items through it.
/// Fetching feeds and displaying results are left to other tools: items
/// arrive as a JSON array, matches leave on stdout.
#[derive(Parser, Debug)]
#[command(name = "newswatch", version, about = "Filter news items against trigger rules")]
pub struct CliArgs {
    /// Trigger rule file (overrides TRIGGERS_PATH)
    #[arg(long, global = true)]
    pub triggers: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the trigger file and list the active triggers
    Check,

    /// Filter a JSON array of news items and print the matches
    Filter {
        /// JSON file holding an array of news items
        #[arg(long)]
        items: PathBuf,

        /// Evaluate items on the rayon thread pool
        #[arg(long)]
        parallel: bool,

        /// Print matches as JSON lines instead of title/link text
        #[arg(long)]
        json: bool,
    },
}
