//! # Tool Box store
//!
//! Owns the ordered collection of [`ToolEntry`] records, a JSON file backing
//! it, and the embedding service used to index and query it.
//!
//! ## Persistence
//!
//! The whole collection is rewritten on every mutation; there is no
//! incremental persistence. Loading tolerates a missing or corrupt file by
//! starting empty with a warning. Write failures propagate as
//! [`StorageError`] so an added tool is never silently dropped.
//!
//! ## Concurrency
//!
//! The collection sits behind `tokio::sync::RwLock`, so concurrent reads are
//! fine, but the append + whole-file rewrite in [`ToolBox::add_item`] is not
//! atomic across concurrent writers. Callers that share a box across tasks
//! must serialize writers externally.

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use embedding::EmbeddingService;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::StorageError;
use crate::types::ToolEntry;

/// Retrieval keeps entries at or above this similarity when no `top_k` is
/// given.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// Persistent collection of tool entries with embedding-indexed retrieval.
pub struct ToolBox {
    storage_path: PathBuf,
    entries: RwLock<Vec<ToolEntry>>,
    embedder: Arc<dyn EmbeddingService>,
}

impl ToolBox {
    /// Opens a tool box backed by `storage_path`, loading whatever is there.
    ///
    /// A missing file yields an empty box; a file that cannot be parsed as a
    /// JSON array of entries yields an empty box with a warning. Opening
    /// never fails.
    pub async fn open(storage_path: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingService>) -> Self {
        let storage_path = storage_path.into();
        let entries = load_entries(&storage_path).await;
        Self {
            storage_path,
            entries: RwLock::new(entries),
            embedder,
        }
    }

    /// Generalized tool intake: embeds `description` + `use_case`, appends the
    /// entry, and persists the whole collection.
    ///
    /// Duplicate names are not rejected; the new entry coexists with any
    /// existing one.
    ///
    /// # Errors
    ///
    /// Embedding-service failures and persistence failures both propagate;
    /// on a persistence failure the entry remains in memory but the caller
    /// is told the box on disk is stale.
    #[instrument(skip_all, fields(name = %name))]
    pub async fn add_item(
        &self,
        name: &str,
        code: &str,
        description: &str,
        use_case: &str,
    ) -> Result<()> {
        let mut entry = ToolEntry::new(name, code, description, use_case);
        let embedding = self.embedder.embed(&entry.embedding_input()).await?;
        info!(
            name = %entry.name,
            dimension = embedding.len(),
            "tool entry embedded"
        );
        entry.embedding = Some(embedding);

        let mut entries = self.entries.write().await;
        entries.push(entry);
        self.write_to_disk(&entries).await?;
        info!(count = entries.len(), "tool box persisted");
        Ok(())
    }

    /// Retrieves entries relevant to `query`, most relevant first.
    ///
    /// Two independent selection policies:
    ///
    /// - `top_k == None`: keep entries with cosine similarity `>= threshold`.
    /// - `top_k == Some(k)`: keep the `k` highest-similarity entries; the
    ///   threshold is ignored in this branch.
    ///
    /// Entries without an embedding are never scored. Ranking is a stable
    /// sort by similarity descending, so equal-similarity entries keep their
    /// insertion order. A zero-norm vector on either side scores 0.0 instead
    /// of dividing by zero.
    ///
    /// If the box holds no embedded entries the embedding service is not
    /// called at all and the result is empty.
    #[instrument(skip_all, fields(threshold = threshold, top_k = ?top_k))]
    pub async fn retrieve(
        &self,
        query: &str,
        threshold: f32,
        top_k: Option<usize>,
    ) -> Result<Vec<ToolEntry>> {
        {
            let entries = self.entries.read().await;
            if !entries.iter().any(|e| e.embedding.is_some()) {
                debug!("tool box has no embedded entries, skipping retrieval");
                return Ok(Vec::new());
            }
        }

        let query_embedding = self.embedder.embed(query).await?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(f32, &ToolEntry)> = entries
            .iter()
            .filter_map(|entry| {
                entry
                    .embedding
                    .as_ref()
                    .map(|emb| (cosine_similarity(&query_embedding, emb), entry))
            })
            .collect();

        if top_k.is_none() {
            scored.retain(|(sim, _)| *sim >= threshold);
        }

        // Stable sort: equal similarities keep insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        if let Some(k) = top_k {
            scored.truncate(k);
        }

        info!(count = scored.len(), "tool box retrieval returned");
        Ok(scored.into_iter().map(|(_, entry)| entry.clone()).collect())
    }

    /// Serializes the whole collection to the backing file.
    pub async fn save(&self) -> Result<(), StorageError> {
        let entries = self.entries.read().await;
        self.write_to_disk(&entries).await
    }

    /// Removes all entries, in memory and on disk.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.write_to_disk(&entries).await
    }

    /// Returns the number of entries in the box.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the box holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns a snapshot of the entries in insertion order.
    pub async fn entries(&self) -> Vec<ToolEntry> {
        self.entries.read().await.clone()
    }

    async fn write_to_disk(&self, entries: &[ToolEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.storage_path, json)
            .await
            .map_err(|source| StorageError::Write {
                path: self.storage_path.clone(),
                source,
            })
    }
}

/// Loads the entry sequence from `path`, resetting to empty on absence or
/// corruption. Never returns an error; corruption is logged.
async fn load_entries(path: &Path) -> Vec<ToolEntry> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no tool box storage yet, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "could not read tool box storage, starting empty"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<ToolEntry>>(&raw) {
        Ok(entries) => {
            info!(
                path = %path.display(),
                count = entries.len(),
                "tool box loaded"
            );
            entries
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "tool box storage is corrupt, resetting to empty"
            );
            Vec::new()
        }
    }
}

/// Calculates cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
