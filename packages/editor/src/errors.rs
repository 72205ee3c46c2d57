//! Error types for the editor

use pagecraft_model::{SnapshotError, TreeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown palette template: {0}")]
    UnknownTemplate(String),

    #[error("Document is not file-backed")]
    NotFileBacked,
}

impl EditorError {
    /// The store error behind this failure, if any
    pub fn tree_error(&self) -> Option<&TreeError> {
        match self {
            EditorError::Tree(err) => Some(err),
            _ => None,
        }
    }
}
