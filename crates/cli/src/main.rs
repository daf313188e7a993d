mod cli;
mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use upkeep_compute::{Charts, DecisionEngine, Evaluation, HistoricalDataset, ModelReport};
use upkeep_core::Config;

use crate::cli::CliArgs;
use crate::terminal::Terminal;

/// Machine-readable output for `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    evaluation: &'a Evaluation,
    charts: Charts,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a ModelReport>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // .env must be loaded before parsing so clap's env fallbacks see it.
    upkeep_core::config::load_dotenv();
    let args = CliArgs::parse();

    if args.list_profiles {
        for profile in Config::available_profiles() {
            println!("{}", profile);
        }
        return Ok(());
    }

    let config = config::resolve(&args).context("failed to load configuration")?;
    config.log_summary();

    if args.show_config {
        println!("{}", serde_json::to_string_pretty(&config.summary())?);
        return Ok(());
    }

    let dataset = HistoricalDataset::builtin();
    let (engine, report) =
        DecisionEngine::train(&config, &dataset).context("failed to train maintenance model")?;

    let reading = args.reading();
    info!(?reading, "Evaluating reading");
    let evaluation = engine
        .evaluate(&reading)
        .context("failed to evaluate reading")?;

    if args.json {
        let output = JsonOutput {
            evaluation: &evaluation,
            charts: Charts::build(&dataset, &evaluation),
            model: args.report.then_some(&report),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let terminal = Terminal::new();
    let mut stdout = std::io::stdout();
    terminal.print_evaluation(&mut stdout, &evaluation)?;
    if args.report {
        terminal.print_model_report(&mut stdout, &report)?;
    }

    Ok(())
}
