//! Fixed conversation templates and generation parameters.
//!
//! Every prompt the agent sends lives here: the per-field entity-extraction
//! instructions, the single code-generation request, and the code-repair
//! request with its hardcoded worked example. Turn order matters — the
//! system instruction always leads.

use crate::generation::{ChatTurn, GenerationOptions};
use crate::workflow::{CollectedInputs, ExecutionFailure};

pub const ASSISTANT_SYSTEM: &str =
    "You are a helpful and accurate AI assistant. Always follow the instructions provided by the user.";

pub const CODE_SYSTEM: &str =
    "You are a helpful and accurate AI assistant that generates bug-free executable Python code.";

pub const REPAIR_SYSTEM: &str =
    "You are a helpful and accurate AI assistant that generates bug-free executable Python code. Follow the output format in the example.";

const NO_PROSE: &str = "Only generate executable code and nothing else, no explanation, no reasoning and no markdown fences.";

pub fn extraction_options() -> GenerationOptions {
    GenerationOptions {
        return_full_text: false,
        do_sample: false,
        max_new_tokens: 100,
    }
}

pub fn code_generation_options() -> GenerationOptions {
    GenerationOptions {
        return_full_text: false,
        do_sample: false,
        max_new_tokens: 1000,
    }
}

pub fn code_repair_options() -> GenerationOptions {
    GenerationOptions {
        return_full_text: false,
        do_sample: false,
        max_new_tokens: 600,
    }
}

/// The three fields extracted from free-text user input, each with its own
/// instruction against the same user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractField {
    DatasetLocation,
    Task,
    TargetColumn,
}

impl ExtractField {
    fn instruction(self, user_text: &str) -> String {
        match self {
            ExtractField::DatasetLocation => format!(
                "Given the context: {user_text}. If the context mentions the location of a CSV \
                 or Parquet dataset, either as a URL or as a local file path, return only that \
                 location as the response, otherwise only output one word False"
            ),
            ExtractField::Task => format!(
                "Given the context: {user_text}. Identify if the context mentions a machine \
                 learning task to perform on the target column of the dataset. If yes then \
                 return only the task name as the response, like regression or classification \
                 or clustering, otherwise only output one word False"
            ),
            ExtractField::TargetColumn => format!(
                "Given the context: {user_text}. Identify if the context mentions a target \
                 column to be used for the machine learning problem. If yes then return only \
                 the column name as the response, otherwise only output one word False"
            ),
        }
    }
}

/// One entity-extraction request: fixed system turn plus the field-specific
/// instruction interpolating the user's text.
pub fn extraction_prompt(field: ExtractField, user_text: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::system(ASSISTANT_SYSTEM),
        ChatTurn::user(field.instruction(user_text)),
    ]
}

/// The single code-generation request: system instruction, documentation as
/// an assistant turn, then the task-specific instruction.
pub fn code_generation_prompt(documentation: &str, inputs: &CollectedInputs) -> Vec<ChatTurn> {
    vec![
        ChatTurn::system(CODE_SYSTEM),
        ChatTurn::user(format!(
            "Here is the documentation on how to use the AutoML library for finding the best \
             {} model and fitting it on a dataset",
            inputs.task
        )),
        ChatTurn::assistant(documentation),
        ChatTurn::user(format!(
            "Write code to find the best model for {} on the dataset located at: {} and target \
             column: {} using the documented library, don't fit it on new data. {NO_PROSE}",
            inputs.task, inputs.dataset_location, inputs.target_column
        )),
    ]
}

// Worked example shown to the model before the actual error and code. Fixed
// configuration, never derived from the current run.
pub const REPAIR_EXAMPLE_TRACE: &str = "Traceback (most recent call last):\n  File \"candidate.py\", line 6, in <module>\n    print(adde_two_numbers(a, b))\nNameError: name 'adde_two_numbers' is not defined";

pub const REPAIR_EXAMPLE_CODE: &str =
    "def add_two_numbers(a, b):\n    return a + b\n\na = 10\nb = 5\nprint(adde_two_numbers(a, b))";

pub const REPAIR_EXAMPLE_FIXED: &str =
    "def add_two_numbers(a, b):\n    return a + b\n\na = 10\nb = 5\nprint(add_two_numbers(a, b))";

/// The code-repair request: worked example as a user/assistant pair, then
/// the actual error and code.
pub fn code_repair_prompt(failure: &ExecutionFailure, code: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::system(REPAIR_SYSTEM),
        ChatTurn::user(format!(
            "Example: {NO_PROSE} Fix this error: {REPAIR_EXAMPLE_TRACE} in the Python code: {REPAIR_EXAMPLE_CODE}"
        )),
        ChatTurn::assistant(REPAIR_EXAMPLE_FIXED),
        ChatTurn::system(CODE_SYSTEM),
        ChatTurn::user(format!(
            "{NO_PROSE} Fix this error: {} in the Python code: {}",
            failure.trace, code
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetLocation;
    use crate::workflow::Task;

    fn sample_inputs() -> CollectedInputs {
        CollectedInputs {
            dataset_location: DatasetLocation::parse("https://example.com/data.csv").unwrap(),
            task: Task::Classification,
            target_column: "label".into(),
        }
    }

    #[test]
    fn extraction_prompt_leads_with_system_turn() {
        let prompt = extraction_prompt(ExtractField::DatasetLocation, "train on iris.csv");
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, "system");
        assert_eq!(prompt[0].content, ASSISTANT_SYSTEM);
        assert_eq!(prompt[1].role, "user");
        assert!(prompt[1].content.contains("train on iris.csv"));
        assert!(prompt[1].content.contains("one word False"));
    }

    #[test]
    fn each_field_has_its_own_instruction() {
        let location = extraction_prompt(ExtractField::DatasetLocation, "ctx");
        let task = extraction_prompt(ExtractField::Task, "ctx");
        let column = extraction_prompt(ExtractField::TargetColumn, "ctx");
        assert!(location[1].content.contains("CSV"));
        assert!(task[1].content.contains("machine learning task"));
        assert!(column[1].content.contains("target column"));
        assert_ne!(location[1].content, task[1].content);
        assert_ne!(task[1].content, column[1].content);
    }

    #[test]
    fn code_generation_prompt_shape() {
        let prompt = code_generation_prompt("Code 1: setup()", &sample_inputs());
        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0].role, "system");
        assert_eq!(prompt[2].role, "assistant");
        assert_eq!(prompt[2].content, "Code 1: setup()");
        let instruction = &prompt[3].content;
        assert!(instruction.contains("classification"));
        assert!(instruction.contains("https://example.com/data.csv"));
        assert!(instruction.contains("label"));
        assert!(instruction.contains("no markdown fences"));
    }

    #[test]
    fn repair_prompt_puts_worked_example_before_actual_error() {
        let failure = ExecutionFailure {
            message: "process exited with exit status: 1".into(),
            trace: "NameError: name 'pycaret' is not defined".into(),
        };
        let prompt = code_repair_prompt(&failure, "import pycaret");
        assert_eq!(prompt.len(), 5);
        assert!(prompt[1].content.contains(REPAIR_EXAMPLE_TRACE));
        assert_eq!(prompt[2].content, REPAIR_EXAMPLE_FIXED);
        assert!(prompt[4].content.contains("NameError: name 'pycaret'"));
        assert!(prompt[4].content.contains("import pycaret"));
    }

    #[test]
    fn option_presets_are_greedy_with_expected_budgets() {
        assert_eq!(extraction_options().max_new_tokens, 100);
        assert_eq!(code_generation_options().max_new_tokens, 1000);
        assert_eq!(code_repair_options().max_new_tokens, 600);
        for options in [
            extraction_options(),
            code_generation_options(),
            code_repair_options(),
        ] {
            assert!(!options.do_sample);
            assert!(!options.return_full_text);
        }
    }
}
