use anyhow::Context;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use ds_config::{DsyncConfig, VaultBackend, VaultConfig};
use ds_core::entities::Project;
use ds_remote::{DesignSource, ZeplinClient};
use ds_sync::{KindCounts, SyncOptions, SyncOrchestrator, SyncReport};
use ds_vault::{MarkdownVault, OutlineGraph, UnitStore};

use crate::cli::{GlobalFlags, OutputFormat, SyncArgs};
use crate::output::{output, table};
use crate::progress::{Progress, SyncSpinner};
use crate::ui;

/// Handle `dsync sync`.
pub async fn handle(
    args: &SyncArgs,
    config: &DsyncConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    config.validate_for_sync()?;
    let options = SyncOptions::from_config(config)?;
    let client = super::client(config)?;

    let Some(project_id) = resolve_project(args, config, &client).await? else {
        if !flags.quiet {
            eprintln!("Sync cancelled.");
        }
        return Ok(());
    };

    let mut store = open_store(&config.vault)?;
    let mut spinner = SyncSpinner::new(Progress::spinner("Fetching project"));
    let result = SyncOrchestrator::new(&client, &mut *store, options)
        .sync_project_with(&project_id, &mut spinner)
        .await;

    match result {
        Ok(report) => {
            spinner.progress().finish_clear();
            print_report(&report, flags)
        }
        Err(error) => {
            spinner.progress().finish_err("sync failed");
            Err(error).with_context(|| format!("sync of project {project_id} failed"))
        }
    }
}

/// `--project`, then `default_project`, then the interactive picker.
/// `None` means the user cancelled the picker.
async fn resolve_project(
    args: &SyncArgs,
    config: &DsyncConfig,
    client: &ZeplinClient,
) -> anyhow::Result<Option<String>> {
    if let Some(id) = args.project.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(Some(id.to_string()));
    }
    if let Some(id) = config.default_project() {
        return Ok(Some(id.to_string()));
    }
    if !ui::prefs().interactive {
        anyhow::bail!("no project given; pass --project or set default_project");
    }

    let spinner = Progress::spinner("Fetching projects");
    let projects = client.get_projects().await;
    spinner.finish_clear();
    let projects = projects?;
    if projects.is_empty() {
        anyhow::bail!("the API token has no visible projects");
    }
    pick_project(&projects)
}

fn project_label(project: &Project) -> String {
    let facts: Vec<&str> = [project.platform.trim(), project.status.trim()]
        .into_iter()
        .filter(|fact| !fact.is_empty())
        .collect();
    if facts.is_empty() {
        project.name.clone()
    } else {
        format!("{} ({})", project.name, facts.join(", "))
    }
}

fn pick_project(projects: &[Project]) -> anyhow::Result<Option<String>> {
    let labels: Vec<String> = projects.iter().map(project_label).collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Project to sync")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("project picker failed")?;
    Ok(choice.map(|index| projects[index].id.clone()))
}

fn open_store(vault: &VaultConfig) -> anyhow::Result<Box<dyn UnitStore>> {
    let store: Box<dyn UnitStore> = match vault.backend {
        VaultBackend::Markdown => Box::new(
            MarkdownVault::open(&vault.path, &vault.assets_dir)
                .with_context(|| format!("failed to open vault at {}", vault.path))?,
        ),
        VaultBackend::Outline => Box::new(
            OutlineGraph::open(&vault.path, &vault.assets_dir)
                .with_context(|| format!("failed to open graph at {}", vault.path))?,
        ),
    };
    Ok(store)
}

fn count_row(kind: &str, counts: &KindCounts) -> Vec<String> {
    vec![
        kind.to_string(),
        counts.created.to_string(),
        counts.updated.to_string(),
        counts.removed.to_string(),
        counts.excluded.to_string(),
        counts.skipped.to_string(),
    ]
}

fn print_report(report: &SyncReport, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format != OutputFormat::Table {
        return output(report, flags.format);
    }

    let rows = vec![
        count_row("components", &report.components),
        count_row("screens", &report.screens),
        count_row("colors", &report.colors),
        count_row("text styles", &report.text_styles),
    ];
    println!(
        "{}",
        table::render(
            &["kind", "created", "updated", "removed", "excluded", "skipped"],
            &rows,
            ui::prefs().term_width,
        )
    );
    if !flags.quiet {
        println!("{} in {} ms", report.summary(), report.duration_ms);
    }
    Ok(())
}
