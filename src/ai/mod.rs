//! Completion service client and prompt assembly.

mod client;
mod prompts;
mod types;

pub use client::*;
pub use prompts::{render_system_prompt, CONTEXT_PLACEHOLDER, SYSTEM_PROMPT_TEMPLATE};
pub use types::{ChatMessage, CompletionRequest, Role};
