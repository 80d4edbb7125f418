//! Chat-style prompt: system message, prior turns, then the new user turn

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::template::{PromptError, Template};
use super::{INPUT_VARIABLES, USER_PROMPT_VAR};

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation
    System,
    /// The human side
    User,
    /// The model side
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered message template: fixed system message, `history` placeholder, `{user_prompt}` turn
#[derive(Debug, Clone)]
pub struct MessagePrompt {
    system: ChatMessage,
    user_turn: Template,
}

impl MessagePrompt {
    /// Fix the system prompt; it is copied verbatim into every expansion
    pub fn new(sys_prompt: impl Into<String>) -> Self {
        Self {
            system: ChatMessage::system(sys_prompt),
            user_turn: Template::parse(&format!("{{{USER_PROMPT_VAR}}}")),
        }
    }

    /// The fixed first message
    #[must_use]
    pub const fn system_message(&self) -> &ChatMessage {
        &self.system
    }

    /// Runtime fill-ins, in declaration order
    #[must_use]
    pub fn input_variables(&self) -> Vec<&'static str> {
        INPUT_VARIABLES.to_vec()
    }

    /// Expand into `[system, ...history, user]`
    pub fn format_messages(
        &self,
        history: &[ChatMessage],
        user_prompt: &str,
    ) -> Result<Vec<ChatMessage>, PromptError> {
        let user = self
            .user_turn
            .render(&HashMap::from([(USER_PROMPT_VAR, user_prompt)]))?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(self.system.clone());
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user));
        Ok(messages)
    }
}
