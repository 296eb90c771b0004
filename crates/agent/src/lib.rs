//! # Agent workflow
//!
//! Two-stage retrieval-augmented workflow over a shared tool box and
//! completion service:
//!
//! 1. **analyze** — embeds the latest message and retrieves the most
//!    relevant tool names from the box;
//! 2. **reason** — sends the conversation, prefixed with a tool directive
//!    when tools were selected, to the completion service and appends the
//!    reply.
//!
//! The two stages run strictly in sequence; there is no branching, retry
//! loop, or cycle. The reply append in reason is the workflow's only
//! externally observable side effect.

use std::sync::Arc;

use anyhow::Result;
use llm_client::LlmClient;
use prompt::{format_tool_directive, has_tool_directive, ChatMessage};
use toolbox::{ToolBox, DEFAULT_SIMILARITY_THRESHOLD};
use tracing::{debug, info, instrument};

mod state;

pub use state::AgentState;

/// Workflow position. [`AgentWorkflow::run`] drives
/// `Analyze → Reason → Done` unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Analyze,
    Reason,
    Done,
}

/// Two-stage agent workflow. Construction is explicit; nothing is built at
/// load time.
pub struct AgentWorkflow {
    toolbox: Arc<ToolBox>,
    client: Arc<dyn LlmClient>,
}

impl AgentWorkflow {
    pub fn new(toolbox: Arc<ToolBox>, client: Arc<dyn LlmClient>) -> Self {
        Self { toolbox, client }
    }

    /// Runs one invocation to completion and returns the final state. The
    /// caller reads the last message's content as the answer.
    ///
    /// # Errors
    ///
    /// Rejects a state with no messages before any service call; embedding
    /// and completion failures propagate.
    #[instrument(skip(self, state), fields(message_count = state.messages.len()))]
    pub async fn run(&self, mut state: AgentState) -> Result<AgentState> {
        if state.messages.is_empty() {
            anyhow::bail!("agent workflow needs an initial message");
        }

        let mut step = Step::Analyze;
        while step != Step::Done {
            step = match step {
                Step::Analyze => {
                    self.analyze(&mut state).await?;
                    Step::Reason
                }
                Step::Reason => {
                    self.reason(&mut state).await?;
                    Step::Done
                }
                Step::Done => Step::Done,
            };
        }
        Ok(state)
    }

    /// Analyze stage: retrieves tools relevant to the most recently appended
    /// message and records their names. Does not mutate `messages`.
    pub async fn analyze(&self, state: &mut AgentState) -> Result<()> {
        let query = state
            .last_message()
            .map(|m| m.content.to_text())
            .unwrap_or_default();

        let retrieved = self
            .toolbox
            .retrieve(&query, DEFAULT_SIMILARITY_THRESHOLD, None)
            .await?;

        state.selected_tool_names = retrieved.into_iter().map(|entry| entry.name).collect();
        info!(
            selected = state.selected_tool_names.len(),
            "task analysis selected tools"
        );
        Ok(())
    }

    /// Reason stage: one completion call over the conversation, reply
    /// appended via the merge rule.
    ///
    /// When tools were selected and no message in the state carries the
    /// directive sentinel yet, the rendered directive leads the outgoing
    /// sequence. The guard keeps repeated invocations over a shared state
    /// from stacking directives.
    pub async fn reason(&self, state: &mut AgentState) -> Result<()> {
        let mut outgoing = state.messages.clone();
        if !state.selected_tool_names.is_empty() && !has_tool_directive(&state.messages) {
            let directive = format_tool_directive(&state.selected_tool_names);
            outgoing.insert(0, ChatMessage::user(directive));
            debug!("tool directive injected");
        }

        let reply = self.client.complete(outgoing).await?;
        state.merge_messages(vec![ChatMessage::assistant(reply)]);
        Ok(())
    }
}
