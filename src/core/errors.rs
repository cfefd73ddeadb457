// src/core/errors.rs

//! Defines the primary error type for the seed loader.

use serde_json::error::Category;
use std::sync::Arc;
use thiserror::Error;

/// Every failure the loader and its collaborators can report.
/// `load` is all-or-nothing, so any of these aborts the whole call.
#[derive(Error, Debug)]
pub enum SeedError {
    /// The source is not well-formed JSON at all.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The source parsed, but a field is missing, has the wrong type,
    /// or a uniqueness invariant does not hold.
    #[error("Schema violation at '{path}': {detail}")]
    SchemaViolation { path: String, detail: String },

    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// No registered verifier understands this credential scheme.
    #[error("Unsupported credential scheme '{0}'")]
    UnsupportedScheme(String),

    /// The stored credential could not be interpreted by its verifier.
    #[error("Credential error: {0}")]
    Credential(String),
}

impl SeedError {
    /// Convenience constructor used throughout the validation pass.
    pub fn violation(path: impl Into<String>, detail: impl Into<String>) -> Self {
        SeedError::SchemaViolation {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// The field path of a schema violation, if this is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            SeedError::SchemaViolation { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
impl Clone for SeedError {
    fn clone(&self) -> Self {
        match self {
            SeedError::MalformedInput(s) => SeedError::MalformedInput(s.clone()),
            SeedError::SchemaViolation { path, detail } => SeedError::SchemaViolation {
                path: path.clone(),
                detail: detail.clone(),
            },
            SeedError::Io(e) => SeedError::Io(Arc::clone(e)),
            SeedError::UnsupportedScheme(s) => SeedError::UnsupportedScheme(s.clone()),
            SeedError::Credential(s) => SeedError::Credential(s.clone()),
        }
    }
}

impl PartialEq for SeedError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SeedError::MalformedInput(s1), SeedError::MalformedInput(s2)) => s1 == s2,
            (
                SeedError::SchemaViolation {
                    path: p1,
                    detail: d1,
                },
                SeedError::SchemaViolation {
                    path: p2,
                    detail: d2,
                },
            ) => p1 == p2 && d1 == d2,
            (SeedError::Io(e1), SeedError::Io(e2)) => e1.to_string() == e2.to_string(),
            (SeedError::UnsupportedScheme(s1), SeedError::UnsupportedScheme(s2)) => s1 == s2,
            (SeedError::Credential(s1), SeedError::Credential(s2)) => s1 == s2,
            _ => false,
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for SeedError {
    fn from(e: std::io::Error) -> Self {
        SeedError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Io => SeedError::Io(Arc::new(std::io::Error::other(e.to_string()))),
            // The raw tree accepts any JSON value, so data errors only come
            // from things like non-finite numbers and count as malformed.
            Category::Syntax | Category::Eof | Category::Data => {
                SeedError::MalformedInput(e.to_string())
            }
        }
    }
}
