use thiserror::Error;

use crate::git::GitError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Bare repository isn't supported: {0}")]
    BareRepository(String),

    #[error("Reference '{name}' does not carry the '{remote}/' prefix of its remote")]
    MalformedReference { remote: String, name: String },

    #[error("Invalid filter '{input}': {reason}")]
    InvalidFilter { input: String, reason: String },

    #[error("{failed} of {total} branches failed to synchronize")]
    BranchesFailed { failed: usize, total: usize },

    #[error("Git error: {0}")]
    Git(#[from] GitError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
