//! Flat-text prompt for completion-style models

use std::collections::HashMap;

use super::chat::{ChatMessage, Role};
use super::template::{PromptError, Template};
use super::{HISTORY_VAR, INPUT_VARIABLES, USER_PROMPT_VAR};

/// Layout shared by every text prompt. Only the role labels and system prompt
/// are baked in at construction.
const CHAT_TEMPLATE: &str = "{sys_name}:{sys_prompt}\n{history}\n{user_name}:{user_prompt}\n{ai_name}:";

/// Text template with baked-in labels and `history`/`user_prompt` left open
#[derive(Debug, Clone)]
pub struct TextPrompt {
    sys_name: String,
    user_name: String,
    ai_name: String,
    template: Template,
}

impl TextPrompt {
    /// Bake the role labels and system prompt into the shared layout
    pub fn new(
        sys_name: impl Into<String>,
        sys_prompt: impl Into<String>,
        user_name: impl Into<String>,
        ai_name: impl Into<String>,
    ) -> Self {
        let sys_name = sys_name.into();
        let sys_prompt = sys_prompt.into();
        let user_name = user_name.into();
        let ai_name = ai_name.into();

        let template = Template::parse(CHAT_TEMPLATE).partial(&[
            ("sys_name", sys_name.as_str()),
            ("sys_prompt", sys_prompt.as_str()),
            ("user_name", user_name.as_str()),
            ("ai_name", ai_name.as_str()),
        ]);

        Self {
            sys_name,
            user_name,
            ai_name,
            template,
        }
    }

    /// Template with the labels already substituted
    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Runtime fill-ins, in declaration order. [`Template::variables`] gives
    /// template order instead.
    #[must_use]
    pub fn input_variables(&self) -> Vec<&'static str> {
        INPUT_VARIABLES.to_vec()
    }

    /// Fill in `history` and `user_prompt`
    pub fn format(&self, history: &str, user_prompt: &str) -> Result<String, PromptError> {
        self.template.render(&HashMap::from([
            (HISTORY_VAR, history),
            (USER_PROMPT_VAR, user_prompt),
        ]))
    }

    /// Render chat messages as `name:content` lines using the baked-in labels
    #[must_use]
    pub fn render_history(&self, messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .map(|message| {
                let name = match message.role {
                    Role::System => &self.sys_name,
                    Role::User => &self.user_name,
                    Role::Assistant => &self.ai_name,
                };
                format!("{name}:{}", message.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prompt() -> TextPrompt {
        TextPrompt::new("System", "Be brief.", "Human", "AI")
    }

    #[test]
    fn test_format_layout() {
        let text = prompt().format("Human:hi\nAI:hello", "bye").unwrap();
        assert_eq!(
            text,
            "System:Be brief.\nHuman:hi\nAI:hello\nHuman:bye\nAI:"
        );
    }

    #[test]
    fn test_only_history_and_user_prompt_stay_open() {
        let prompt = prompt();
        assert_eq!(prompt.input_variables(), vec!["user_prompt", "history"]);
        assert_eq!(prompt.template().variables(), vec!["history", "user_prompt"]);
    }

    #[test]
    fn test_labels_are_literal() {
        let prompt = TextPrompt::new("{user_prompt}", "{history}", "U", "A");
        assert_eq!(prompt.template().variables(), vec!["history", "user_prompt"]);
        assert_eq!(
            prompt.format("h", "p").unwrap(),
            "{user_prompt}:{history}\nh\nU:p\nA:"
        );
    }

    #[test]
    fn test_render_history() {
        let prompt = prompt();
        let history = prompt.render_history(&[
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);
        assert_eq!(history, "Human:hi\nAI:hello");
        assert_eq!(prompt.render_history(&[]), "");
    }
}
