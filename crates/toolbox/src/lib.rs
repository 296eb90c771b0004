//! # Tool Box
//!
//! Persistent, embedding-indexed store of generalized tool entries.
//!
//! ## Modules
//!
//! - [`types`] - [`ToolEntry`], the stored record
//! - [`store`] - [`ToolBox`], load/save, embed-on-insert, similarity retrieval
//! - [`error`] - [`StorageError`], persistence failures
//!
//! The box is backed by a single JSON file and scanned linearly at query
//! time; it is sized for tool libraries, not for large vector corpora.

pub mod error;
pub mod store;
pub mod types;

pub use error::StorageError;
pub use store::{ToolBox, DEFAULT_SIMILARITY_THRESHOLD};
pub use types::ToolEntry;
