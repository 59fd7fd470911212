//! Error types for the page editor.

use crate::types::{Revision, SectionId};
use thiserror::Error;

/// Main error type for editor and layout store operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),


    #[error("Invalid page name: {0:?}")]
    InvalidPageName(String),

    #[error("Section not found: {0}")]
    SectionNotFound(SectionId),

    #[error("No section ids left on page {0}")]
    SectionIdsExhausted(String),

    #[error("Unknown section kind: {0}")]
    UnknownSectionKind(String),

    #[error("Invalid keystroke: {0}")]
    InvalidKeystroke(String),

    #[error("Revision conflict on page {page}: expected {expected:?}, found {found:?}")]
    RevisionConflict {
        page: String,
        expected: Option<Revision>,
        found: Option<Revision>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid layout format: {0}")]
    InvalidFormat(String),

    #[error("Checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch { expected: u32, got: u32 },

    #[error("Layout store is locked by another process")]
    Locked,

    #[error("Layout store not initialized: {0}")]
    NotInitialized(String),
}

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        EditorError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for EditorError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        EditorError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for EditorError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        EditorError::Deserialization(e.to_string())
    }
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
