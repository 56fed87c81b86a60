use std::path::PathBuf;

use thiserror::Error;

/// Error kinds produced by the attribution pipeline.
///
/// The CLI boundary wraps these in `anyhow` for user-facing context; internal
/// code matches on the variant so a `BlameFailure` is never silently treated
/// like a skip.
#[derive(Debug, Error)]
pub enum GitBlackError {
    #[error(
        "the staging area is not empty\n\
         commit or unstage the pending changes before running git-black"
    )]
    IndexNotEmpty,

    #[error("could not access the repository: {0}")]
    RepositoryAccess(#[source] git2::Error),

    #[error("git blame failed for '{path}': {reason}")]
    BlameFailure { path: PathBuf, reason: String },

    #[error("diff inconsistency in '{path}': {reason}")]
    DiffInconsistency { path: PathBuf, reason: String },

    #[error("failed to create commit: {0}")]
    CommitCreationFailure(#[source] git2::Error),
}

impl From<git2::Error> for GitBlackError {
    fn from(e: git2::Error) -> Self {
        GitBlackError::RepositoryAccess(e)
    }
}

pub type Result<T> = std::result::Result<T, GitBlackError>;
