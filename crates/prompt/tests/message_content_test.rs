//! Tests for the canonical message-content stringification rule.

use prompt::{ChatMessage, ContentBlock, MessageContent, MessageRole};

#[test]
fn text_content_passes_through_unchanged() {
    let content = MessageContent::Text("Plot a histogram of ages".to_string());
    assert_eq!(content.to_text(), "Plot a histogram of ages");
}

#[test]
fn blocks_join_text_fields_with_newline() {
    let content = MessageContent::Blocks(vec![
        ContentBlock {
            kind: "text".to_string(),
            text: "first part".to_string(),
        },
        ContentBlock {
            kind: "text".to_string(),
            text: "second part".to_string(),
        },
    ]);
    assert_eq!(content.to_text(), "first part\nsecond part");
}

#[test]
fn single_block_has_no_trailing_newline() {
    let content = MessageContent::Blocks(vec![ContentBlock {
        kind: "text".to_string(),
        text: "only part".to_string(),
    }]);
    assert_eq!(content.to_text(), "only part");
}

#[test]
fn empty_block_list_becomes_empty_string() {
    let content = MessageContent::Blocks(vec![]);
    assert_eq!(content.to_text(), "");
}

#[test]
fn constructors_build_text_content() {
    let msg = ChatMessage::user("hello");
    assert_eq!(msg.role, MessageRole::User);
    assert_eq!(msg.content, MessageContent::Text("hello".to_string()));

    let msg = ChatMessage::assistant(String::from("reply"));
    assert_eq!(msg.role, MessageRole::Assistant);
    assert_eq!(msg.content.to_text(), "reply");

    let msg = ChatMessage::system("instruction");
    assert_eq!(msg.role, MessageRole::System);
}
