mod cli;
mod codegen;
mod config;
mod dataset;
mod engine;
mod error;
mod executor;
mod extractor;
mod generation;
mod prompts;
mod repairer;
mod scrape;
mod ui;
mod workflow;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use config::AgentConfig;
use dataset::CsvProbe;
use engine::{EngineLimits, WorkflowEngine};
use executor::PythonRunner;
use extractor::{EntityExtractor, StdinInput};
use generation::GenerationClient;
use ui::WorkflowUi;
use workflow::{WorkflowContext, WorkflowOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AgentConfig::load()?;
    if let Some(max_retries) = cli.max_retries {
        config.max_fix_retries = max_retries;
    }

    match cli.command {
        Command::Run { docs_url, graph } => run_workflow(config, docs_url, graph, cli.verbose).await,
    }
}

async fn run_workflow(
    config: AgentConfig,
    docs_url: Option<String>,
    graph: Option<String>,
    verbose: bool,
) -> Result<()> {
    let ui = WorkflowUi::new();

    let url = match docs_url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let http = reqwest::Client::new();
    let spinner = ui.scrape_spinner(&url);
    let documentation = scrape::fetch_and_extract(&http, &url).await;
    spinner.finish_and_clear();
    let documentation = documentation.context("failed to scrape documentation")?;

    let generator = GenerationClient::new(config.api_key.clone(), config.endpoint.clone());
    let runner = PythonRunner::new(
        config.python_bin.clone(),
        Duration::from_secs(config.execution_timeout_secs),
    );
    let probe = CsvProbe::new(config.preview_rows);
    let extractor = EntityExtractor::new(config.collect_rounds);
    let limits = EngineLimits {
        max_fix_retries: config.max_fix_retries,
        max_collect_visits: config.max_collect_visits,
        run_deadline: Duration::from_secs(config.run_deadline_secs),
    };

    let mut engine =
        WorkflowEngine::new(generator, runner, probe, StdinInput, extractor, limits)
            .verbose(verbose);
    let mut ctx = WorkflowContext::new(documentation);
    let report = engine.run(&mut ctx).await?;

    ui.print_outcome(&report);
    ui.print_report(&report);

    if let Some(path) = graph {
        std::fs::write(&path, ui::render_dot(&report.transitions))
            .with_context(|| format!("failed to write workflow graph to {path}"))?;
        println!("Workflow graph written to {path}");
    }

    if report.outcome != WorkflowOutcome::Completed {
        std::process::exit(1);
    }
    Ok(())
}

fn prompt_for_url() -> Result<String> {
    print!("Enter the URL of an AutoML library's documentation: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read documentation URL")?;
    Ok(line.trim().to_string())
}
