//! Multi-remote branch synchronization.
//!
//! Enumerates every remote's tracked branches, groups them by derived
//! local branch name, and reconciles each group into one local branch by
//! sequentially rebasing the remotes' versions on top of each other.

mod engine;
mod error;
mod group;
mod merge;
mod refs;

pub use engine::{Engine, Recovery};
pub use error::{Result, SyncError};
pub use group::{BranchGroup, group_by_branch};
pub use merge::Merger;
pub use refs::{BranchFilters, RemoteRef, enumerate_remote_refs};

use git2::Repository;
use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::git::{self, GitEngine};

/// Run one synchronization pass over the repository named by the CLI.
/// A branch group that fails to reconcile is reported and does not stop
/// the remaining groups; the run errors at the end if any group failed.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let repo = git::open_repo_at(&cli.repository).map_err(SyncError::from)?;

    if repo.is_bare() {
        return Err(SyncError::BareRepository(
            cli.repository.display().to_string(),
        ));
    }

    let filters = BranchFilters::new(&config.filters, &cli.filters)?;
    let fetch = cli.fetch || config.fetch;

    print_remotes(&repo)?;

    let remote_refs = enumerate_remote_refs(&repo, &filters)?;
    let groups = group_by_branch(remote_refs);
    debug!(groups = groups.len(), "grouped remote references");

    let engine = GitEngine::new(&repo)?;
    let merger = Merger::new(&engine);

    let total = groups.len();
    let mut failed = 0usize;
    for group in &groups {
        if let Err(e) = merger.merge(group, fetch) {
            eprintln!("Failed to synchronize branch '{}': {e}", group.branch);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(SyncError::BranchesFailed { failed, total });
    }

    Ok(())
}

/// Working-directory and remote listing block printed before processing.
fn print_remotes(repo: &Repository) -> Result<()> {
    let border = "=".repeat(63);
    println!("{border}");
    if let Some(workdir) = repo.workdir() {
        println!("Working dir: {}", workdir.display());
    }
    for remote in git::list_remotes(repo).map_err(SyncError::from)? {
        println!("{}: {}", remote.name, remote.url);
    }
    println!("{border}");
    println!();
    Ok(())
}
