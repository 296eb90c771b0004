//! # Prompt
//!
//! Chat message model and tool-directive formatting for AI prompts.
//!
//! ## Message model
//!
//! - [`MessageRole`]: system / user / assistant, one-to-one with Chat
//!   Completions API `role` values.
//! - [`MessageContent`]: plain text or a list of content blocks. Every place
//!   that needs a message body as a plain string goes through the single
//!   canonical rule in [`MessageContent::to_text`].
//! - [`ChatMessage`]: role + content, one element of the `messages` array.
//!
//! ## Tool directive
//!
//! [`format_tool_directive`] renders the leading message that tells the model
//! which specialized tools were retrieved for the current task.
//! [`has_tool_directive`] scans a conversation for the directive sentinel so
//! the directive is never injected twice.
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to LLM APIs (OpenAI and compatible).

/// Role of a message, one-to-one with Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// One block of structured message content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    /// Block kind as reported by the producer (e.g. "text").
    pub kind: String,
    /// Text payload of the block.
    pub text: String,
}

/// Message body: plain text or a list of content blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Structured content blocks (e.g. from multi-part API payloads).
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Canonical stringification rule for message content.
    ///
    /// `Text` is returned as-is; `Blocks` joins the `text` of each block with
    /// a newline. All callers that need a plain string (retrieval queries,
    /// API adapters, sentinel scans) use this one rule.
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

/// A single chat message, one-to-one with one element of the `messages` array.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sentinel phrase carried by every tool directive. Conversations are scanned
/// for this phrase before injecting a directive, so repeated reasoning turns
/// over the same state never stack directives.
pub const TOOL_DIRECTIVE_SENTINEL: &str = "specialized tools";

/// Renders the tool directive for a non-empty list of retrieved tool names.
///
/// The directive lists one tool name per line and instructs the model to
/// incorporate their logic. The rendered text always contains
/// [`TOOL_DIRECTIVE_SENTINEL`].
///
/// # Arguments
///
/// * `tool_names` - Names of the retrieved tools, most relevant first.
///
/// # Returns
///
/// The directive string, to be prefixed as a leading user message.
pub fn format_tool_directive<I, S>(tool_names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let listing = tool_names
        .into_iter()
        .map(|name| format!("- {}", name.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You have access to the following {TOOL_DIRECTIVE_SENTINEL}:\n{listing}\n\
         Incorporate their logic into your reasoning to provide a precise answer."
    )
}

/// Returns true if any message in `messages` already carries the tool
/// directive sentinel.
pub fn has_tool_directive(messages: &[ChatMessage]) -> bool {
    messages
        .iter()
        .any(|m| m.content.to_text().contains(TOOL_DIRECTIVE_SENTINEL))
}
