//! Code generation: one request combining the scraped documentation with
//! the collected inputs, answered with candidate source code.

use crate::generation::{GenerationError, TextGenerator};
use crate::prompts;
use crate::workflow::CollectedInputs;

pub struct CodeGenerator;

impl CodeGenerator {
    /// Build the single code-generation request and return the backend's
    /// response verbatim. The contract requires the backend to emit bare
    /// source; nothing is parsed or sanitized here.
    pub async fn generate_code(
        generator: &impl TextGenerator,
        documentation: &str,
        inputs: &CollectedInputs,
    ) -> Result<String, GenerationError> {
        generator
            .generate(
                &prompts::code_generation_prompt(documentation, inputs),
                prompts::code_generation_options(),
            )
            .await
    }
}
