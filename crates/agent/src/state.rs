//! Workflow-local agent state.

use prompt::ChatMessage;

/// State threaded through one workflow invocation. Created fresh per
/// invocation; never persisted.
///
/// `messages` grows only through [`AgentState::merge_messages`] — new turns
/// are concatenated, never replacing prior ones. `selected_tool_names` is
/// written once by the analyze stage and read once by the reason stage
/// within the same invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub messages: Vec<ChatMessage>,
    pub selected_tool_names: Vec<String>,
}

impl AgentState {
    /// Builds the initial state for a user task.
    pub fn from_task(task: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(task.into())],
            selected_tool_names: Vec::new(),
        }
    }

    /// Append-merge rule for conversation turns.
    pub fn merge_messages(&mut self, new_messages: Vec<ChatMessage>) {
        self.messages.extend(new_messages);
    }

    /// The most recently appended message.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
