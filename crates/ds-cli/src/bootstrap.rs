use anyhow::Context;
use ds_config::DsyncConfig;

use crate::cli::GlobalFlags;

/// `.env` plus every config source, with command-line overrides applied.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DsyncConfig> {
    let mut config = DsyncConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut DsyncConfig, flags: &GlobalFlags) {
    if let Some(vault) = flags.vault.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        tracing::debug!(vault, "vault path overridden from the command line");
        config.vault.path = vault.to_string();
    }
}
