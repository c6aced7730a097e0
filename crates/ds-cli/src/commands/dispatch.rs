use ds_config::DsyncConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &DsyncConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, config, flags).await,
        Commands::Projects => commands::projects::handle(config, flags).await,
        Commands::TestConnection => commands::test_connection::handle(config, flags).await,
        Commands::Config => commands::config::handle(config, flags),
    }
}
