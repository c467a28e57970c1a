//! Git operations using git2 (libgit2).
//!
//! Reads and branch mutations go through git2 directly; rebase machinery
//! (rebase, abort, hard reset) is delegated to the `git` CLI.

mod engine;
mod error;
mod repo;
#[cfg(test)]
pub mod test_utils;

pub use engine::GitEngine;
pub use error::GitError;
pub use repo::{RemoteInfo, list_remotes, open_repo_at};

#[cfg(test)]
pub use test_utils::TestRepo;
