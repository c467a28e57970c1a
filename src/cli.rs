use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

/// Synchronize same-named branches from every remote into one local branch
/// each, by sequentially rebasing the remotes' versions on top of each other.
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(name = "git-remote-sync", version, about)]
pub struct Cli {
    /// Path to the repository to synchronize
    #[arg(default_value = ".")]
    pub repository: PathBuf,

    /// Fetch each branch from its remote before comparing
    #[arg(long)]
    pub fetch: bool,

    /// Synchronize only branches whose name starts with a match of PATTERN
    /// for REMOTE (repeatable; remotes without a filter match everything)
    #[arg(long = "filter", value_name = "REMOTE=PATTERN")]
    pub filters: Vec<String>,

    /// Generate a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_current_directory() {
        let cli = Cli::parse_from(["git-remote-sync"]);
        assert_eq!(cli.repository, PathBuf::from("."));
        assert!(!cli.fetch);
        assert!(cli.filters.is_empty());
    }

    #[test]
    fn filter_is_repeatable() {
        let cli = Cli::parse_from([
            "git-remote-sync",
            "--filter",
            "origin=^feature/",
            "--filter",
            "backup=main",
            "/tmp/repo",
        ]);
        assert_eq!(cli.filters, vec!["origin=^feature/", "backup=main"]);
        assert_eq!(cli.repository, PathBuf::from("/tmp/repo"));
    }
}
