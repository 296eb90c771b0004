//! Tool entry model.

use serde::{Deserialize, Serialize};

/// A generalized, reusable tool: source text plus the metadata used for
/// semantic retrieval.
///
/// `embedding` is `None` until the entry is indexed; every embedded entry in
/// one box carries vectors of the same length (fixed by the embedding model
/// for the box's lifetime). Duplicate names are not rejected; entries with
/// the same name coexist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolEntry {
    /// Tool name.
    pub name: String,
    /// Generalized source text of the tool.
    pub code: String,
    /// Functional description.
    pub description: String,
    /// Concise use-case summary.
    pub use_case: String,
    /// Vector embedding for semantic retrieval.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl ToolEntry {
    /// Creates an entry with no embedding yet.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        use_case: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: description.into(),
            use_case: use_case.into(),
            embedding: None,
        }
    }

    /// The text embedded for this entry: description first, then use case,
    /// newline-separated.
    pub fn embedding_input(&self) -> String {
        format!("{}\n{}", self.description, self.use_case)
    }
}
