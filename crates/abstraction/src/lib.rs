//! # Tool Abstraction
//!
//! Turns raw, task-bound code into a generalized [`ToolEntry`] via the
//! completion service.
//!
//! Abstraction is total from the caller's perspective: when the service
//! returns nothing usable, the abstractor falls back to an identity entry
//! carrying the raw code unchanged. The [`AbstractionOutcome`] enum keeps the
//! two branches observable for tests; [`ToolAbstractor::generalize`]
//! collapses them to a single entry at the public boundary.
//!
//! Persistence is the caller's concern; the only side effect here is the
//! outbound completion call.

use std::sync::Arc;

use llm_client::LlmClient;
use prompt::ChatMessage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use toolbox::ToolEntry;
use tracing::{info, instrument, warn};

mod parse;

use parse::parse_labeled_response;

/// How tool fields are extracted from the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStrategy {
    /// Schema-constrained completion returning a structured record.
    #[default]
    Structured,
    /// Free-form completion with labeled sections and a fenced code block.
    FreeText,
}

/// Which branch produced the entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AbstractionOutcome {
    /// The completion service returned a usable generalized tool.
    Parsed(ToolEntry),
    /// Extraction failed; the entry is the identity fallback.
    Fallback(ToolEntry),
}

impl AbstractionOutcome {
    /// Collapses the outcome to its entry.
    pub fn into_entry(self) -> ToolEntry {
        match self {
            AbstractionOutcome::Parsed(entry) | AbstractionOutcome::Fallback(entry) => entry,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AbstractionOutcome::Fallback(_))
    }
}

/// Structured record requested from the completion service during
/// schema-constrained extraction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolSchema {
    /// The name of the generalized tool.
    pub name: String,
    /// Functional description of the tool.
    pub description: String,
    /// Concise use case summary.
    pub use_case: String,
    /// The generalized source code for the tool.
    pub code: String,
}

impl From<ToolSchema> for ToolEntry {
    fn from(record: ToolSchema) -> Self {
        ToolEntry::new(record.name, record.code, record.description, record.use_case)
    }
}

/// Generalizes raw code into reusable tool entries.
pub struct ToolAbstractor {
    client: Arc<dyn LlmClient>,
    strategy: ExtractionStrategy,
}

impl ToolAbstractor {
    /// Creates an abstractor using schema-constrained extraction.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            strategy: ExtractionStrategy::default(),
        }
    }

    /// Selects the extraction strategy.
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Generalizes `raw_code` into a tool entry. Total: extraction failures
    /// collapse into the identity fallback entry.
    pub async fn generalize(&self, raw_code: &str, task_context: &str) -> ToolEntry {
        self.try_generalize(raw_code, task_context)
            .await
            .into_entry()
    }

    /// Generalizes `raw_code`, keeping the parsed/fallback branch visible.
    #[instrument(skip(self, raw_code, task_context), fields(strategy = ?self.strategy, code_len = raw_code.len()))]
    pub async fn try_generalize(&self, raw_code: &str, task_context: &str) -> AbstractionOutcome {
        let extracted = match self.strategy {
            ExtractionStrategy::Structured => self.extract_structured(raw_code, task_context).await,
            ExtractionStrategy::FreeText => self.extract_free_text(raw_code, task_context).await,
        };

        match extracted {
            Some(entry) => {
                info!(name = %entry.name, "tool abstraction parsed");
                AbstractionOutcome::Parsed(entry)
            }
            None => {
                warn!("tool abstraction failed, falling back to identity entry");
                AbstractionOutcome::Fallback(fallback_entry(raw_code, task_context))
            }
        }
    }

    async fn extract_structured(&self, raw_code: &str, task_context: &str) -> Option<ToolEntry> {
        let prompt_text = build_prompt(raw_code, task_context, false);
        let schema = match serde_json::to_value(schemars::schema_for!(ToolSchema)) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(error = %e, "tool schema could not be rendered");
                return None;
            }
        };

        match self.client.complete_structured(&prompt_text, schema).await {
            Ok(Some(value)) => match serde_json::from_value::<ToolSchema>(value) {
                Ok(record) if !record.name.trim().is_empty() => Some(record.into()),
                Ok(_) => {
                    warn!("structured abstraction returned an empty tool name");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "structured abstraction returned a non-conforming record");
                    None
                }
            },
            Ok(None) => {
                warn!("structured abstraction returned no record");
                None
            }
            Err(e) => {
                warn!(error = %e, "structured abstraction call failed");
                None
            }
        }
    }

    async fn extract_free_text(&self, raw_code: &str, task_context: &str) -> Option<ToolEntry> {
        let prompt_text = build_prompt(raw_code, task_context, true);
        match self.client.complete(vec![ChatMessage::user(prompt_text)]).await {
            Ok(reply) => parse_labeled_response(&reply)
                .map(|p| ToolEntry::new(p.name, p.code, p.description, p.use_case)),
            Err(e) => {
                warn!(error = %e, "free-text abstraction call failed");
                None
            }
        }
    }
}

/// The identity entry returned when extraction fails: the raw code survives
/// unchanged under a generic name.
fn fallback_entry(raw_code: &str, task_context: &str) -> ToolEntry {
    ToolEntry::new("unknown_tool", raw_code, "Auto-generated tool", task_context)
}

/// Builds the abstraction instruction block. The free-text variant appends
/// the labeled output format the parser expects.
fn build_prompt(raw_code: &str, task_context: &str, free_text: bool) -> String {
    let mut prompt_text = format!(
        "You are an expert software engineer.\n\
         Abstract the following code into a generalized, reusable tool.\n\n\
         Raw Code:\n```\n{raw_code}\n```\n\n\
         Task Context:\n{task_context}\n\n\
         Requirements:\n\
         1. Replace hard-coded values with configurable parameters.\n\
         2. Remove task-specific references.\n\
         3. Standardize the interface using a decorator-style tool signature.\n\
         4. Add comprehensive docstrings and type annotations.\n\
         5. Provide a functional description and a concise use case summary.\n"
    );
    if free_text {
        prompt_text.push_str(
            "\nOutput format:\n\
             NAME: [tool_name]\n\
             DESCRIPTION: [functional_description]\n\
             USE_CASE: [use_case_summary]\n\
             CODE:\n```\n[abstracted_code]\n```\n",
        );
    }
    prompt_text
}
