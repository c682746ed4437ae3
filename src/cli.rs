//! Command-line interface.

use clap::{Parser, Subcommand};

/// mlforge — autonomous AutoML code-generation agent.
#[derive(Debug, Parser)]
#[command(name = "mlforge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Maximum repair attempts before giving up.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Print every workflow state transition.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the workflow to a terminal state.
    Run {
        /// URL of the AutoML library documentation to scrape. Prompted for
        /// interactively when omitted.
        docs_url: Option<String>,

        /// Write a Graphviz DOT diagram of the recorded transitions to this
        /// path.
        #[arg(long)]
        graph: Option<String>,
    },
}
