//! Error types shared by the registry, the loaders and the server

use std::path::PathBuf;

/// Failure while building the content registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A registered key does not end in the content suffix, so no slug can be derived
    #[error("Content key {key:?} does not end in {suffix:?}")]
    MissingExtension { key: String, suffix: String },

    /// The discovery pattern could not be compiled
    #[error("Invalid content pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Failure while loading one document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The front matter block is present but malformed
    #[error("Malformed front matter in {slug}: {source}")]
    FrontMatter {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The load task panicked
    #[error("Loading {0} panicked")]
    Panicked(String),

    /// The load task was aborted before it produced a document
    #[error("Loading {0} was cancelled")]
    Cancelled(String),
}
