//! Prompt builders for LLM clients
//!
//! Two stateless constructors live here:
//! - [`MessagePrompt`] - ordered chat messages (system, history, user turn) for chat-style APIs
//! - [`TextPrompt`] - a single text block with baked-in role labels for completion-style APIs
//!
//! Both leave exactly two runtime fill-ins open: `history` and `user_prompt`.

mod chat;
mod template;
mod text;

pub use chat::{ChatMessage, MessagePrompt, Role};
pub use template::{PromptError, Segment, Template};
pub use text::TextPrompt;

/// Placeholder for prior conversation turns
pub const HISTORY_VAR: &str = "history";
/// Placeholder for the new user turn
pub const USER_PROMPT_VAR: &str = "user_prompt";
/// Runtime fill-ins in declaration order, shared by both builders
pub const INPUT_VARIABLES: [&str; 2] = [USER_PROMPT_VAR, HISTORY_VAR];
