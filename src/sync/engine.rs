//! Capability interface between the reconciler and the repository.

use git2::Oid;

use crate::git::GitError;

/// Outcome of a best-effort cleanup of in-progress repository state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recovery {
    /// An in-progress rebase existed and was aborted.
    pub rebase_aborted: bool,
    /// The working tree and index were reset to the branch tip.
    pub tree_reset: bool,
}

/// Operations the reconciler needs from a repository. The production
/// implementation is [`crate::git::GitEngine`]; tests substitute a fake.
pub trait Engine {
    /// Commit a local branch points at, or None if the branch does not exist.
    fn branch_tip(&self, branch: &str) -> Result<Option<Oid>, GitError>;

    /// Force-create (or repoint) a local branch at the given commit.
    fn create_branch(&self, branch: &str, target: Oid) -> Result<(), GitError>;

    /// Force-checkout a local branch, discarding working-tree differences.
    fn checkout(&self, branch: &str) -> Result<(), GitError>;

    /// Rebase the checked-out branch onto a reference, returning the
    /// engine's textual output.
    fn rebase(&self, onto: &str) -> Result<String, GitError>;

    /// Abort an in-progress rebase. Errors when none is in progress.
    fn abort_rebase(&self) -> Result<(), GitError>;

    /// Hard-reset the working tree and index to the current branch tip.
    fn reset_hard(&self) -> Result<(), GitError>;

    /// Fetch one branch from a remote, returning one report line per
    /// updated reference.
    fn fetch(&self, remote: &str, branch: &str) -> Result<Vec<String>, GitError>;

    /// Best-effort reset to a clean state. Never fails; the returned
    /// [`Recovery`] says which cleanup steps actually took effect.
    fn clear_in_progress(&self) -> Recovery {
        Recovery {
            rebase_aborted: self.abort_rebase().is_ok(),
            tree_reset: self.reset_hard().is_ok(),
        }
    }
}
