pub mod config;
pub mod dispatch;
pub mod projects;
pub mod sync;
pub mod test_connection;

use anyhow::Context;
use ds_config::DsyncConfig;
use ds_remote::ZeplinClient;

/// API client from validated configuration.
pub fn client(config: &DsyncConfig) -> anyhow::Result<ZeplinClient> {
    config.validate_for_api()?;
    ZeplinClient::from_config(&config.api).context("failed to build design API client")
}
