//! Code repair: one request holding a fixed worked example followed by the
//! actual error and code, answered with replacement source.
//!
//! Stateless across calls; the retry budget lives with the engine.

use crate::generation::{GenerationError, TextGenerator};
use crate::prompts;
use crate::workflow::ExecutionFailure;

pub struct Repairer;

impl Repairer {
    /// Request a corrected version of `code` for the captured `failure`,
    /// returned verbatim.
    pub async fn repair(
        generator: &impl TextGenerator,
        failure: &ExecutionFailure,
        code: &str,
    ) -> Result<String, GenerationError> {
        generator
            .generate(
                &prompts::code_repair_prompt(failure, code),
                prompts::code_repair_options(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::generation::{ChatTurn, GenerationOptions};
    use crate::prompts::REPAIR_EXAMPLE_FIXED;

    struct CapturingGenerator {
        reply: String,
        seen: Mutex<Option<(Vec<ChatTurn>, GenerationOptions)>>,
    }

    impl TextGenerator for CapturingGenerator {
        async fn generate(
            &self,
            prompt: &[ChatTurn],
            options: GenerationOptions,
        ) -> Result<String, GenerationError> {
            *self.seen.lock().unwrap() = Some((prompt.to_vec(), options));
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn sends_worked_example_then_actual_error() {
        let generator = CapturingGenerator {
            reply: "import pandas as pd".into(),
            seen: Mutex::new(None),
        };
        let failure = ExecutionFailure {
            message: "process exited with exit status: 1".into(),
            trace: "ModuleNotFoundError: No module named 'pandas'".into(),
        };

        let code = Repairer::repair(&generator, &failure, "import pandas")
            .await
            .unwrap();
        assert_eq!(code, "import pandas as pd");

        let (prompt, options) = generator.seen.lock().unwrap().clone().unwrap();
        assert_eq!(options.max_new_tokens, 600);
        assert_eq!(prompt.len(), 5);
        // Worked example comes first, as a user/assistant pair.
        assert_eq!(prompt[2].content, REPAIR_EXAMPLE_FIXED);
        assert!(prompt[4].content.contains("ModuleNotFoundError"));
        assert!(prompt[4].content.contains("import pandas"));
    }
}
