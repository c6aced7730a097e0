use ds_config::DsyncConfig;
use ds_remote::DesignSource;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ConnectionStatus {
    ok: bool,
    base_url: String,
    token: String,
}

/// Handle `dsync test-connection`.
pub async fn handle(config: &DsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let spinner = Progress::spinner("Contacting design API");
    if let Err(error) = client.test_connection().await {
        spinner.finish_err("connection failed");
        anyhow::bail!("connection test failed [{}]: {error}", error.category());
    }
    spinner.finish_clear();

    output(
        &ConnectionStatus {
            ok: true,
            base_url: config.api.base_url.clone(),
            token: config.api.masked_token(),
        },
        flags.format,
    )
}
