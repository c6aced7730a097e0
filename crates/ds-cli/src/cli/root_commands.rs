use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sync one project into the vault.
    Sync(SyncArgs),
    /// List projects visible to the API token.
    Projects,
    /// Check that the API token is accepted.
    TestConnection,
    /// Print the effective configuration (token masked).
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Project ID. Falls back to `default_project`, then to an interactive picker.
    #[arg(long)]
    pub project: Option<String>,
}
