//! # 提示词构建集成测试

use llm_portal::prompt::{ChatMessage, MessagePrompt, Role, TextPrompt};
use pretty_assertions::assert_eq;

#[test]
fn chat_and_text_prompts_share_history() {
    let history = vec![
        ChatMessage::user("What is Rust?"),
        ChatMessage::assistant("A systems programming language."),
    ];

    let chat = MessagePrompt::new("You are a concise assistant.");
    let messages = chat.format_messages(&history, "Is it fast?").unwrap();
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(messages.last().unwrap().content, "Is it fast?");

    let text = TextPrompt::new("System", "You are a concise assistant.", "User", "Assistant");
    let rendered = text
        .format(&text.render_history(&history), "Is it fast?")
        .unwrap();
    assert_eq!(
        rendered,
        "System:You are a concise assistant.\n\
         User:What is Rust?\n\
         Assistant:A systems programming language.\n\
         User:Is it fast?\n\
         Assistant:"
    );
}

#[test]
fn empty_history_leaves_blank_line() {
    let text = TextPrompt::new("S", "p", "U", "A");
    assert_eq!(text.format("", "q").unwrap(), "S:p\n\nU:q\nA:");
}
