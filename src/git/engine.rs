//! The git-backed [`Engine`] implementation.

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, Cred, FetchOptions, Oid, RemoteCallbacks, Repository};
use tracing::debug;

use super::error::{GitError, Result};
use crate::sync::Engine;

/// Engine driving a real repository: reads and branch mutations through
/// git2, rebase machinery through the `git` CLI in the working directory.
pub struct GitEngine<'a> {
    repo: &'a Repository,
    workdir: PathBuf,
}

impl<'a> GitEngine<'a> {
    /// Requires a working tree; bare repositories are rejected upstream.
    pub fn new(repo: &'a Repository) -> Result<Self> {
        let workdir = repo.workdir().ok_or(GitError::NoWorkdir)?.to_path_buf();
        Ok(Self { repo, workdir })
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    debug!(?args, "running git");
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| GitError::CommandFailed(format!("failed to spawn git: {e}")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(GitError::CommandFailed(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )))
    }
}

fn short_id(oid: Oid) -> String {
    let hex = oid.to_string();
    hex[..7].to_string()
}

impl Engine for GitEngine<'_> {
    fn branch_tip(&self, branch: &str) -> Result<Option<Oid>> {
        match self.repo.find_branch(branch, BranchType::Local) {
            Ok(found) => Ok(Some(found.get().peel_to_commit()?.id())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create_branch(&self, branch: &str, target: Oid) -> Result<()> {
        let commit = self.repo.find_commit(target)?;
        self.repo.branch(branch, &commit, true)?;
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.repo.set_head(&format!("refs/heads/{branch}"))?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout))?;
        Ok(())
    }

    fn rebase(&self, onto: &str) -> Result<String> {
        run_git(&self.workdir, &["rebase", onto])
    }

    fn abort_rebase(&self) -> Result<()> {
        run_git(&self.workdir, &["rebase", "--abort"]).map(|_| ())
    }

    fn reset_hard(&self) -> Result<()> {
        run_git(&self.workdir, &["reset", "--hard"]).map(|_| ())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<Vec<String>> {
        let mut found = self.repo.find_remote(remote)?;
        let config = self.repo.config()?;
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        debug!(remote, %refspec, "fetching");

        let mut updates = Vec::new();
        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|url, username_from_url, allowed_types| {
                // Try SSH agent first for SSH URLs
                if allowed_types.contains(git2::CredentialType::SSH_KEY)
                    && let Some(username) = username_from_url
                {
                    return Cred::ssh_key_from_agent(username);
                }

                // For HTTPS, use git2's native credential helper support
                if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT)
                    && let Ok(cred) = Cred::credential_helper(&config, url, username_from_url)
                {
                    return Ok(cred);
                }

                // Fallback to default credentials
                Cred::default()
            });
            callbacks.update_tips(|refname, old, new| {
                if old.is_zero() {
                    updates.push(format!("{refname}: [new] {}", short_id(new)));
                } else {
                    updates.push(format!("{refname}: {} -> {}", short_id(old), short_id(new)));
                }
                true
            });

            let mut fetch_opts = FetchOptions::new();
            fetch_opts.remote_callbacks(callbacks);

            found.fetch(&[refspec.as_str()], Some(&mut fetch_opts), None)?;
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::TestRepo;

    #[test]
    fn branch_tip_returns_none_for_missing_branch() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        assert_eq!(engine.branch_tip("no-such-branch").unwrap(), None);
    }

    #[test]
    fn branch_tip_returns_commit_of_existing_branch() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        let head = test_repo.head();
        assert_eq!(engine.branch_tip("master").unwrap(), Some(head));
    }

    #[test]
    fn create_branch_force_repoints_existing_branch() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        let base = test_repo.head();
        let next = test_repo.commit_file("a.txt", "a", "second", Some(base));

        engine.create_branch("topic", base).unwrap();
        assert_eq!(engine.branch_tip("topic").unwrap(), Some(base));

        engine.create_branch("topic", next).unwrap();
        assert_eq!(engine.branch_tip("topic").unwrap(), Some(next));
    }

    #[test]
    fn checkout_moves_head_to_branch() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        engine.create_branch("topic", test_repo.head()).unwrap();
        engine.checkout("topic").unwrap();

        let head = repo.head().unwrap();
        assert_eq!(head.shorthand(), Some("topic"));
    }

    #[test]
    fn rebase_fast_forwards_onto_descendant() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        let base = test_repo.head();
        let next = test_repo.commit_file("a.txt", "a", "second", Some(base));
        test_repo.set_remote_ref("origin", "topic", next);

        engine.create_branch("topic", base).unwrap();
        engine.checkout("topic").unwrap();
        engine.rebase("origin/topic").unwrap();

        assert_eq!(engine.branch_tip("topic").unwrap(), Some(next));
    }

    #[test]
    fn abort_rebase_fails_when_nothing_in_progress() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        assert!(engine.abort_rebase().is_err());
    }

    #[test]
    fn reset_hard_succeeds_on_clean_tree() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        engine.reset_hard().unwrap();
    }

    #[test]
    fn clear_in_progress_reports_nothing_to_abort() {
        let test_repo = TestRepo::new();
        let repo = test_repo.open();
        let engine = GitEngine::new(&repo).unwrap();

        let recovery = engine.clear_in_progress();
        assert!(!recovery.rebase_aborted);
        assert!(recovery.tree_reset);
    }
}
