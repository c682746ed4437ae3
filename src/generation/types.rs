//! Request and response types for the text-generation backend.
//!
//! The backend speaks a fixed-shape chat protocol: an ordered list of
//! `{role, content}` turns plus per-call generation parameters, answered
//! with a single `generated_text` string.

use serde::{Deserialize, Serialize};

/// A single turn in a generation conversation. Turn order matters; the
/// system instruction always comes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Sender role: "system", "user" or "assistant".
    pub role: String,
    /// Text content of the turn.
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// Per-call generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// When false, the backend returns only the newly generated text.
    pub return_full_text: bool,
    /// When false, decoding is greedy and deterministic.
    pub do_sample: bool,
    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,
}

/// Body of a request to the backend's generate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub messages: Vec<ChatTurn>,
    pub parameters: GenerationOptions,
}

/// Body of a response from the backend's generate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_roundtrip() {
        let req = GenerationRequest {
            messages: vec![ChatTurn::system("be helpful"), ChatTurn::user("hello")],
            parameters: GenerationOptions {
                return_full_text: false,
                do_sample: false,
                max_new_tokens: 100,
            },
        };
        let json = serde_json::to_string(&req).unwrap();
        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.messages[0].role, "system");
        assert_eq!(parsed.messages[1].content, "hello");
        assert_eq!(parsed.parameters.max_new_tokens, 100);
        assert!(!parsed.parameters.do_sample);
    }

    #[test]
    fn response_deserializes_from_backend_format() {
        let json = r#"{"generated_text": "import pandas as pd"}"#;
        let resp: GenerationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.generated_text, "import pandas as pd");
    }

    #[test]
    fn turn_constructors_set_roles() {
        assert_eq!(ChatTurn::system("x").role, "system");
        assert_eq!(ChatTurn::user("x").role, "user");
        assert_eq!(ChatTurn::assistant("x").role, "assistant");
    }
}
