//! Entity extraction: turns free-text user input into validated workflow
//! inputs over a bounded number of prompting rounds.
//!
//! Each round issues one generation request per still-unset field against
//! the same user text, validates every response independently, and prints
//! field-by-field feedback. Acceptance is sticky: once a field validates it
//! is never re-requested, and later contradictory text cannot clear it.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use console::Style;

use crate::dataset::{ColumnProbe, DatasetLocation};
use crate::generation::TextGenerator;
use crate::prompts::{self, ExtractField};
use crate::workflow::{CollectedInputs, Task};

/// Source of user utterances, a seam so tests can script the conversation.
pub trait UserInput {
    fn read_line(&mut self) -> io::Result<String>;
}

/// Reads utterances from stdin.
pub struct StdinInput;

impl UserInput for StdinInput {
    fn read_line(&mut self) -> io::Result<String> {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end().to_string())
    }
}

#[derive(Debug, Default)]
struct PartialInputs {
    location: Option<DatasetLocation>,
    task: Option<Task>,
    column: Option<String>,
}

impl PartialInputs {
    fn into_inputs(self) -> Option<CollectedInputs> {
        match (self.location, self.task, self.column) {
            (Some(dataset_location), Some(task), Some(target_column)) => Some(CollectedInputs {
                dataset_location,
                task,
                target_column,
            }),
            _ => None,
        }
    }

    fn is_complete(&self) -> bool {
        self.location.is_some() && self.task.is_some() && self.column.is_some()
    }
}

/// Collects `(dataset location, task, target column)` from the user.
pub struct EntityExtractor {
    max_rounds: u32,
    green: Style,
    red: Style,
}

impl EntityExtractor {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds,
            green: Style::new().green(),
            red: Style::new().red(),
        }
    }

    /// Run up to `max_rounds` prompting rounds, returning `None` when the
    /// round budget is spent with any field still unset.
    pub async fn collect(
        &self,
        generator: &impl TextGenerator,
        probe: &impl ColumnProbe,
        input: &mut impl UserInput,
    ) -> Result<Option<CollectedInputs>> {
        println!("Describe the dataset location, the machine learning task and the target column:");

        let mut partial = PartialInputs::default();
        for _ in 0..self.max_rounds {
            let user_text = input.read_line().context("failed to read user input")?;
            self.extract_round(generator, probe, &user_text, &mut partial)
                .await?;
            self.print_feedback(&partial);
            if partial.is_complete() {
                return Ok(partial.into_inputs());
            }
        }

        println!(
            "{}",
            self.red
                .apply_to("Failed to extract entities after multiple retries.")
        );
        Ok(None)
    }

    /// One round: request and validate each still-unset field against the
    /// same user text.
    async fn extract_round(
        &self,
        generator: &impl TextGenerator,
        probe: &impl ColumnProbe,
        user_text: &str,
        partial: &mut PartialInputs,
    ) -> Result<()> {
        if partial.location.is_none() {
            let response = generator
                .generate(
                    &prompts::extraction_prompt(ExtractField::DatasetLocation, user_text),
                    prompts::extraction_options(),
                )
                .await?;
            partial.location = DatasetLocation::parse(&response).ok();
        }

        if partial.task.is_none() {
            let response = generator
                .generate(
                    &prompts::extraction_prompt(ExtractField::Task, user_text),
                    prompts::extraction_options(),
                )
                .await?;
            partial.task = response.parse::<Task>().ok();
        }

        if partial.column.is_none() {
            let response = generator
                .generate(
                    &prompts::extraction_prompt(ExtractField::TargetColumn, user_text),
                    prompts::extraction_options(),
                )
                .await?;
            partial.column = self.validate_column(probe, partial.location.as_ref(), &response).await;
        }

        Ok(())
    }

    /// A column name counts only when the dataset location is already
    /// validated and the name appears in the dataset's preview. Formats
    /// without a preview accept any plausible name.
    async fn validate_column(
        &self,
        probe: &impl ColumnProbe,
        location: Option<&DatasetLocation>,
        response: &str,
    ) -> Option<String> {
        let location = location?;
        let candidate = response.trim().to_string();
        if candidate.is_empty() || candidate.eq_ignore_ascii_case("false") {
            return None;
        }
        match probe.columns(location).await {
            Ok(Some(columns)) if columns.contains(&candidate) => Some(candidate),
            Ok(Some(_)) => None,
            Ok(None) => Some(candidate),
            Err(_) => None,
        }
    }

    fn print_feedback(&self, partial: &PartialInputs) {
        match &partial.location {
            Some(location) => {
                println!("{} {location}", self.green.apply_to("Dataset location:"));
            }
            None => println!(
                "{}",
                self.red.apply_to("Dataset location invalid, try again")
            ),
        }
        match partial.task {
            Some(task) => println!("{} {task}", self.green.apply_to("Machine learning task:")),
            None => println!(
                "{}",
                self.red.apply_to(
                    "Please choose a machine learning task from: classification, regression, clustering"
                )
            ),
        }
        match &partial.column {
            Some(column) => println!("{} {column}", self.green.apply_to("Target column:")),
            None => println!("{}", self.red.apply_to("Target column not found in the dataset")),
        }
    }
}
