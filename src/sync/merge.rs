//! Sequential rebase reconciliation of one branch group.

use git2::Oid;
use tracing::{debug, warn};

use super::engine::Engine;
use super::error::Result;
use super::group::BranchGroup;

/// Reconciles branch groups against the local repository through an
/// [`Engine`].
pub struct Merger<'a, E: Engine> {
    engine: &'a E,
}

impl<'a, E: Engine> Merger<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Merge every reference of a group into the local branch of the same
    /// name. Skipped when the local branch exists and already agrees with
    /// every reference. In-progress repository state is cleared on every
    /// exit path, so a failed step never leaves a rebase behind.
    pub fn merge(&self, group: &BranchGroup, fetch: bool) -> Result<()> {
        print!("{}", header(group));

        if fetch {
            self.fetch_references(group);
        }

        if let Some(shared) = self.identical_commit(group)? {
            println!(
                "Branch: {} has the same state in every remote and locally: {shared}",
                group.branch
            );
            print!("{}", footer(group));
            return Ok(());
        }

        let recovery = self.engine.clear_in_progress();
        debug!(branch = %group.branch, ?recovery, "cleared repository state");

        let result = self.rebase_group(group);

        let recovery = self.engine.clear_in_progress();
        debug!(branch = %group.branch, ?recovery, "cleared repository state after rebase");
        print!("{}", footer(group));

        result
    }

    /// The single commit shared by the local branch and every reference,
    /// or None when they disagree. A missing local branch never counts as
    /// identical; it must be materialized first.
    fn identical_commit(&self, group: &BranchGroup) -> Result<Option<Oid>> {
        let Some(local) = self.engine.branch_tip(&group.branch)? else {
            return Ok(None);
        };

        if group.refs.iter().all(|r| r.target == local) {
            Ok(Some(local))
        } else {
            Ok(None)
        }
    }

    /// Seed the local branch from the first reference, then rebase it onto
    /// every reference in group order. A failing step stops the group.
    fn rebase_group(&self, group: &BranchGroup) -> Result<()> {
        let Some(first) = group.refs.first() else {
            return Ok(());
        };

        self.engine.create_branch(&group.branch, first.target)?;
        self.engine.checkout(&group.branch)?;
        let recovery = self.engine.clear_in_progress();
        debug!(branch = %group.branch, ?recovery, "cleared repository state after checkout");

        for r in &group.refs {
            println!("Rebase {} <- {}", group.branch, r.name);
            let output = self.engine.rebase(&r.name)?;
            if !output.is_empty() {
                println!("{output}");
            }
        }

        Ok(())
    }

    /// Fetch every reference of the group from its remote. Failures are
    /// reported and skipped; remaining pairs are still attempted.
    fn fetch_references(&self, group: &BranchGroup) {
        if group.refs.is_empty() {
            return;
        }

        println!("Fetching remote references for branch: {}", group.branch);

        for r in &group.refs {
            match self.engine.fetch(&r.remote, &r.branch) {
                Ok(updates) => {
                    for info in updates {
                        println!(
                            "Updating reference: {} for remote: {} info: {info}",
                            r.branch, r.remote
                        );
                    }
                }
                Err(e) => {
                    warn!(remote = %r.remote, branch = %r.branch, error = %e, "prefetch failed");
                    println!(
                        "Failed to prefetch reference from remote: {} branch: {}. Error: {e}",
                        r.remote, r.branch
                    );
                }
            }
        }

        println!();
    }
}

fn title_line(branch: &str) -> String {
    let frame = "=".repeat(28);
    format!("{frame} {branch} {frame}")
}

/// Section header: framed title plus the list of qualified reference names.
fn header(group: &BranchGroup) -> String {
    let names: Vec<&str> = group.refs.iter().map(|r| r.name.as_str()).collect();
    format!(
        "{}\nReferences to merge: {}\n\n",
        title_line(&group.branch),
        names.join(", ")
    )
}

/// Section footer: a `=` row as wide as the title, then a blank line.
fn footer(group: &BranchGroup) -> String {
    format!("{}\n\n", "=".repeat(title_line(&group.branch).len()))
}
