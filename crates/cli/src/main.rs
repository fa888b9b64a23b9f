mod cli;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use newswatch_core::config::{load_dotenv, Config};
use newswatch_core::NewsItem;
use newswatch_rules::{filter_with_report, par_filter_with_report, TriggerCompiler, TriggerLoader};

use crate::cli::{CliArgs, Command};
use crate::terminal::Terminal;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    load_dotenv();
    let config = Config::from_env().context("failed to load configuration")?;

    // Logs go to stderr so stdout stays clean for matches.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config.log_summary();

    let path = args.triggers.unwrap_or_else(|| config.triggers_path.clone());
    let loader = TriggerLoader::new(path)
        .with_compiler(TriggerCompiler::new().with_reference_zone(config.reference_zone));
    let triggers = loader
        .load()
        .with_context(|| format!("failed to load triggers from {}", loader.path().display()))?;

    let mut terminal = Terminal::stdout();

    match args.command {
        Command::Check => terminal.print_check(&triggers)?,
        Command::Filter {
            items,
            parallel,
            json,
        } => {
            let batch = NewsItem::load_batch(&items)
                .with_context(|| format!("failed to load news items from {}", items.display()))?;

            let report = if parallel {
                par_filter_with_report(&batch, &triggers)
            } else {
                filter_with_report(&batch, &triggers)
            };
            info!(
                items = batch.len(),
                matched = report.matched.len(),
                failed = report.failed.len(),
                "filtered items"
            );

            if json {
                terminal.print_json(&report.matched)?;
            } else {
                terminal.print_items(&report.matched)?;
            }
            if !report.failed.is_empty() {
                Terminal::plain(std::io::stderr()).print_failed(&report.failed)?;
            }
        }
    }

    Ok(())
}
