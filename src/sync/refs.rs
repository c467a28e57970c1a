//! Remote reference enumeration and filtering.

use std::collections::{BTreeMap, HashMap};

use git2::{Oid, Repository};
use regex::Regex;

use super::error::{Result, SyncError};
use crate::git::GitError;

/// Reserved symbolic name; never admitted into any group.
const HEAD: &str = "HEAD";

/// Snapshot of a remote-tracking reference at enumeration time. May go
/// stale if the remote is fetched afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Remote the reference belongs to.
    pub remote: String,
    /// Qualified reference name, e.g. `origin/main`.
    pub name: String,
    /// Local branch name derived by stripping the remote prefix.
    pub branch: String,
    /// Commit the reference pointed at when enumerated.
    pub target: Oid,
}

/// Per-remote branch filters. A remote without an entry matches everything.
#[derive(Debug, Default)]
pub struct BranchFilters {
    patterns: HashMap<String, Regex>,
}

impl BranchFilters {
    /// Build filters from config entries plus `remote=pattern` arguments.
    /// An argument entry wins over the config entry for the same remote.
    pub fn new(config: &BTreeMap<String, String>, args: &[String]) -> Result<Self> {
        let mut patterns = HashMap::new();

        for (remote, pattern) in config {
            patterns.insert(remote.clone(), compile(remote, pattern)?);
        }

        for arg in args {
            let Some((remote, pattern)) = arg.split_once('=') else {
                return Err(SyncError::InvalidFilter {
                    input: arg.clone(),
                    reason: "expected REMOTE=PATTERN".to_string(),
                });
            };
            patterns.insert(remote.to_string(), compile(arg, pattern)?);
        }

        Ok(Self { patterns })
    }

    /// Whether `branch` from `remote` passes the filter. Patterns match at
    /// the start of the branch name; a proper prefix match is enough.
    pub fn matches(&self, remote: &str, branch: &str) -> bool {
        match self.patterns.get(remote) {
            Some(pattern) => pattern.is_match(branch),
            None => true,
        }
    }
}

fn compile(input: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| SyncError::InvalidFilter {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Derive the local branch name from a qualified reference name.
/// The name must carry the owning remote's `<name>/` prefix.
pub fn derive_branch_name(remote: &str, name: &str) -> Result<String> {
    name.strip_prefix(&format!("{remote}/"))
        .map(str::to_string)
        .ok_or_else(|| SyncError::MalformedReference {
            remote: remote.to_string(),
            name: name.to_string(),
        })
}

/// Enumerate every remote-tracking reference of every remote, excluding the
/// symbolic `HEAD` entry and references rejected by the filters. Remotes
/// are visited in repository order, references in name order within each
/// remote.
pub fn enumerate_remote_refs(
    repo: &Repository,
    filters: &BranchFilters,
) -> Result<Vec<RemoteRef>> {
    let mut refs = Vec::new();
    let remotes = repo.remotes().map_err(GitError::from)?;

    for remote in remotes.iter().flatten() {
        let glob = format!("refs/remotes/{remote}/*");
        for reference in repo.references_glob(&glob).map_err(GitError::from)? {
            let reference = reference.map_err(GitError::from)?;
            let Some(name) = reference.shorthand() else {
                continue;
            };

            let branch = derive_branch_name(remote, name)?;
            if branch == HEAD {
                continue;
            }
            if !filters.matches(remote, &branch) {
                continue;
            }

            let target = reference.peel_to_commit().map_err(GitError::from)?.id();
            refs.push(RemoteRef {
                remote: remote.to_string(),
                name: name.to_string(),
                branch,
                target,
            });
        }
    }

    Ok(refs)
}
