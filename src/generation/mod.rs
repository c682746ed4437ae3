pub mod client;
pub mod error;
pub mod types;

pub use client::{GenerationClient, TextGenerator};
pub use error::GenerationError;
pub use types::{ChatTurn, GenerationOptions, GenerationRequest, GenerationResponse};
