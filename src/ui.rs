//! Terminal output: spinner while scraping, colored outcome lines, the
//! run report as pretty JSON, and a DOT rendering of the transition log.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::workflow::{RunReport, TransitionRecord, WorkflowOutcome};

pub struct WorkflowUi {
    green: Style,
    red: Style,
    yellow: Style,
}

impl WorkflowUi {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Spinner shown while the documentation page is being scraped.
    pub fn scrape_spinner(&self, url: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("Scraping documentation from {url}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Final state name and outcome, green checkmark on success, red cross
    /// otherwise.
    pub fn print_outcome(&self, report: &RunReport) {
        println!();
        match report.outcome {
            WorkflowOutcome::Completed => {
                println!(
                    "  {} Workflow reached {}",
                    self.green.apply_to("✓"),
                    report.final_state
                );
            }
            outcome => {
                println!(
                    "  {} Workflow stopped in {} ({outcome})",
                    self.red.apply_to("✗"),
                    report.final_state
                );
            }
        }
    }

    /// Pretty-printed run report.
    pub fn print_report(&self, report: &RunReport) {
        let style = match report.outcome {
            WorkflowOutcome::Completed => &self.green,
            _ => &self.yellow,
        };
        println!();
        println!("{}", style.apply_to("─── Run Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}

impl Default for WorkflowUi {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the recorded transitions as a Graphviz digraph, one edge per
/// state visit, labeled with the component that ran.
pub fn render_dot(transitions: &[TransitionRecord]) -> String {
    let mut dot = String::from("digraph workflow {\n");
    dot.push_str("    rankdir=LR;\n");
    for record in transitions {
        dot.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
            record.from, record.to, record.component
        ));
    }
    dot.push_str("}\n");
    dot
}
