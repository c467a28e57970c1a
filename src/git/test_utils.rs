//! Test fixtures for temporary git repositories.

use std::path::PathBuf;

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A temporary git repository with an initial commit on `master`.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repo");

        // Identity for commits created by the git CLI during rebases.
        let mut config = repo.config().expect("repo config");
        config.set_str("user.name", "Test User").expect("user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("user.email");

        let sig = Signature::now("Test User", "test@example.com").expect("signature");
        let tree_id = repo.index().expect("index").write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .expect("initial commit");

        Self { dir }
    }

    /// Canonicalized repository path (resolves /var -> /private/var on macOS).
    pub fn path(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("canonicalize path")
    }

    pub fn open(&self) -> Repository {
        Repository::open(self.path()).expect("open repo")
    }

    /// HEAD commit id.
    pub fn head(&self) -> Oid {
        self.open()
            .head()
            .expect("head")
            .peel_to_commit()
            .expect("peel head")
            .id()
    }

    /// Add a remote with a placeholder URL.
    pub fn add_remote(&self, name: &str) {
        let repo = self.open();
        repo.remote(name, &format!("https://example.com/{name}/repo.git"))
            .expect("add remote");
    }

    /// Create a commit writing one file on top of `parent` (parentless when
    /// None), without touching HEAD or the working tree. Returns the id.
    pub fn commit_file(
        &self,
        file: &str,
        content: &str,
        message: &str,
        parent: Option<Oid>,
    ) -> Oid {
        let repo = self.open();
        let sig = Signature::now("Test User", "test@example.com").expect("signature");

        let blob = repo.blob(content.as_bytes()).expect("blob");
        let parent_commit = parent.map(|id| repo.find_commit(id).expect("find parent"));

        let mut builder = match &parent_commit {
            Some(commit) => repo
                .treebuilder(Some(&commit.tree().expect("parent tree")))
                .expect("treebuilder"),
            None => repo.treebuilder(None).expect("treebuilder"),
        };
        builder.insert(file, blob, 0o100_644).expect("insert blob");
        let tree_id = builder.write().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");

        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();
        repo.commit(None, &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    /// Point `refs/remotes/<remote>/<branch>` at a commit.
    pub fn set_remote_ref(&self, remote: &str, branch: &str, target: Oid) {
        let repo = self.open();
        repo.reference(
            &format!("refs/remotes/{remote}/{branch}"),
            target,
            true,
            "test remote ref",
        )
        .expect("create remote ref");
    }

    /// Create the symbolic `refs/remotes/<remote>/HEAD` entry.
    pub fn set_remote_head(&self, remote: &str, branch: &str) {
        let repo = self.open();
        repo.reference_symbolic(
            &format!("refs/remotes/{remote}/HEAD"),
            &format!("refs/remotes/{remote}/{branch}"),
            true,
            "test remote HEAD",
        )
        .expect("create remote HEAD");
    }
}
