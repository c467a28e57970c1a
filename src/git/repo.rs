//! Repository operations.

use std::path::Path;

use git2::{Repository, RepositoryOpenFlags};

use super::error::{GitError, Result};

/// Open a git repository at the given path, discovering upward through
/// parent directories like the git CLI does.
pub fn open_repo_at(path: &Path) -> Result<Repository> {
    Repository::open_ext(
        path,
        RepositoryOpenFlags::empty(),
        std::iter::empty::<&Path>(),
    )
    .map_err(|_| GitError::NotARepo(path.display().to_string()))
}

/// A remote's name and URL as configured in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
}

/// List configured remotes in repository order.
pub fn list_remotes(repo: &Repository) -> Result<Vec<RemoteInfo>> {
    let names = repo.remotes()?;
    let mut remotes = Vec::new();

    for name in names.iter().flatten() {
        let remote = repo.find_remote(name)?;
        remotes.push(RemoteInfo {
            name: name.to_string(),
            url: remote.url().unwrap_or("(no url)").to_string(),
        });
    }

    Ok(remotes)
}
