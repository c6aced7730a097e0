use ds_config::DsyncConfig;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Effective configuration with the API token masked.
fn redacted(config: &DsyncConfig) -> DsyncConfig {
    let mut shown = config.clone();
    shown.api.token = config.api.masked_token();
    shown
}

/// Handle `dsync config`.
pub fn handle(config: &DsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&redacted(config), flags.format)
}
