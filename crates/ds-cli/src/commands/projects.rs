use ds_config::DsyncConfig;
use ds_core::entities::Project;
use ds_remote::DesignSource;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ProjectRow {
    id: String,
    name: String,
    platform: String,
    status: String,
}

impl From<Project> for ProjectRow {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            platform: project.platform,
            status: project.status,
        }
    }
}

/// Handle `dsync projects`.
pub async fn handle(config: &DsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let spinner = Progress::spinner("Fetching projects");
    let projects = match client.get_projects().await {
        Ok(projects) => {
            spinner.finish_clear();
            projects
        }
        Err(error) => {
            spinner.finish_err("failed to fetch projects");
            return Err(error.into());
        }
    };

    let rows: Vec<ProjectRow> = projects.into_iter().map(ProjectRow::from).collect();
    output(&rows, flags.format)
}
