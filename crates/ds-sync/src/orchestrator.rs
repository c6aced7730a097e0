//! Sequential sync of one project into a [`UnitStore`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use ds_config::DsyncConfig;
use ds_core::entities::{DesignEntity, Project, SectionRef};
use ds_core::enums::{EntityKind, ImageStorage, TemplateDetail};
use ds_remote::DesignSource;
use ds_vault::{ChildUnit, Metadata, UnitPath, UnitStore, keys};

use crate::error::SyncError;
use crate::exclude::ExcludeFilter;
use crate::image::{ImageRequest, materialize_image, resolve_image_url};
use crate::paths::PathOptions;
use crate::render::{
    IndexEntries, RenderContext, color_child, deep_link, render_entity, render_index,
    render_palette, text_style_child, version_children,
};
use crate::report::{KindCounts, SyncReport};
use crate::upsert::{Upsert, upsert};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Everything a sync run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub paths: PathOptions,
    pub template: TemplateDetail,
    pub image_storage: ImageStorage,
    pub image_timeout: Duration,
    pub app_url: String,
    pub exclude: ExcludeFilter,
}

impl SyncOptions {
    /// Options from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Pattern`] when an exclude pattern does not compile.
    pub fn from_config(config: &DsyncConfig) -> Result<Self, SyncError> {
        Ok(Self {
            paths: PathOptions::from_vault_config(&config.vault),
            template: config.render.template,
            image_storage: config.render.image_storage,
            image_timeout: Duration::from_secs(config.render.image_timeout_secs),
            app_url: config.api.app_url.clone(),
            exclude: ExcludeFilter::from_text(&config.filter.exclude_patterns)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress hooks for interactive front ends. Every method defaults to a
/// no-op.
pub trait SyncProgress {
    /// A collection is about to be processed; `total` counts fetched items
    /// before exclusion.
    fn phase_started(&mut self, _kind: EntityKind, _total: usize) {}

    fn item_synced(&mut self, _kind: EntityKind, _name: &str) {}
}

impl SyncProgress for () {}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives one project sync: fetch, filter, render, upsert, index.
///
/// Every remote call and store write is awaited before the next starts; the
/// first unrecovered error aborts the run.
pub struct SyncOrchestrator<'a, S, U: ?Sized> {
    source: &'a S,
    store: &'a mut U,
    options: SyncOptions,
}

/// State scoped to one run.
struct Run<'p> {
    project: &'p Project,
    synced_at: DateTime<Utc>,
    sections: HashMap<String, String>,
}

impl<'a, S, U> SyncOrchestrator<'a, S, U>
where
    S: DesignSource,
    U: UnitStore + ?Sized,
{
    pub fn new(source: &'a S, store: &'a mut U, options: SyncOptions) -> Self {
        Self {
            source,
            store,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sync one project without progress reporting.
    ///
    /// # Errors
    ///
    /// Remote failures are returned unchanged as [`SyncError::Api`]; store
    /// failures as [`SyncError::Store`].
    pub async fn sync_project(&mut self, project_id: &str) -> Result<SyncReport, SyncError> {
        self.sync_project_with(project_id, &mut ()).await
    }

    /// Sync one project, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// See [`Self::sync_project`].
    pub async fn sync_project_with<P: SyncProgress + ?Sized>(
        &mut self,
        project_id: &str,
        progress: &mut P,
    ) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let synced_at = Utc::now();

        let project = self.source.get_project(project_id).await?;
        tracing::info!(project = %project.name, id = %project.id, "syncing project");
        let base = self.options.paths.project_base(&project.name);
        if !base.is_empty() {
            self.store.ensure_container(&base)?;
        }

        let sections = self
            .source
            .get_sections(&project.id)
            .await?
            .into_iter()
            .map(|section| (section.id, section.name))
            .collect();
        let run = Run {
            project: &project,
            synced_at,
            sections,
        };

        let mut report = SyncReport::new(&project.id, &project.name, synced_at);
        let mut entries = IndexEntries::default();

        entries.components = self
            .sync_components(&run, &mut report.components, progress)
            .await?;
        entries.screens = self
            .sync_screens(&run, &mut report.screens, progress)
            .await?;
        if let Some(path) = self.sync_colors(&run, &mut report.colors, progress).await? {
            entries.palettes.push(path);
        }
        if let Some(path) = self
            .sync_text_styles(&run, &mut report.text_styles, progress)
            .await?
        {
            entries.palettes.push(path);
        }

        report.index = self.sync_index(&run, &entries)?;
        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            project = %project.name,
            duration_ms = report.duration_ms,
            "sync finished"
        );
        Ok(report)
    }

    fn render_context<'r>(&'r self, run: &'r Run<'_>) -> RenderContext<'r> {
        RenderContext {
            app_url: &self.options.app_url,
            project_id: &run.project.id,
            template: self.options.template,
            synced_at: run.synced_at,
        }
    }

    /// Section name from the run's lookup map, falling back to the name the
    /// item payload carried.
    fn section_name<'r>(run: &'r Run<'_>, section: Option<&'r SectionRef>) -> Option<&'r str> {
        let section = section?;
        run.sections
            .get(&section.id)
            .map(String::as_str)
            .or(section.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    fn excluded(&self, kind: EntityKind, name: &str, counts: &mut KindCounts) -> bool {
        match self.options.exclude.matching_pattern(name) {
            Some(pattern) => {
                tracing::debug!(%kind, name, pattern, "excluded");
                counts.excluded += 1;
                true
            }
            None => false,
        }
    }

    async fn sync_components<P: SyncProgress + ?Sized>(
        &mut self,
        run: &Run<'_>,
        counts: &mut KindCounts,
        progress: &mut P,
    ) -> Result<Vec<UnitPath>, SyncError> {
        let listed = self.source.get_components(&run.project.id).await?;
        progress.phase_started(EntityKind::Component, listed.len());
        let mut paths = Vec::new();
        for item in listed {
            if self.excluded(EntityKind::Component, &item.name, counts) {
                continue;
            }
            let component = self
                .source
                .get_component(&run.project.id, &item.id)
                .await?;
            let section = component.section.as_ref().or(item.section.as_ref());
            let section = Self::section_name(run, section);
            if let Some(path) = self
                .sync_entity(run, &component, section, &[], counts)
                .await?
            {
                paths.push(path);
            }
            progress.item_synced(EntityKind::Component, &component.name);
        }
        Ok(paths)
    }

    async fn sync_screens<P: SyncProgress + ?Sized>(
        &mut self,
        run: &Run<'_>,
        counts: &mut KindCounts,
        progress: &mut P,
    ) -> Result<Vec<UnitPath>, SyncError> {
        let listed = self.source.get_screens(&run.project.id).await?;
        progress.phase_started(EntityKind::Screen, listed.len());
        let mut paths = Vec::new();
        for item in listed {
            if self.excluded(EntityKind::Screen, &item.name, counts) {
                continue;
            }
            let screen = self.source.get_screen(&run.project.id, &item.id).await?;
            let section = screen.section.as_ref().or(item.section.as_ref());
            let section = Self::section_name(run, section);
            let versions = version_children(screen.name.trim(), &screen.images);
            if let Some(path) = self
                .sync_entity(run, &screen, section, &versions, counts)
                .await?
            {
                paths.push(path);
            }
            progress.item_synced(EntityKind::Screen, &screen.name);
        }
        Ok(paths)
    }

    /// Path, image, render and upsert for one component or screen. Returns
    /// the unit's final path for the index.
    async fn sync_entity<E: DesignEntity>(
        &mut self,
        run: &Run<'_>,
        entity: &E,
        section: Option<&str>,
        children: &[ChildUnit],
        counts: &mut KindCounts,
    ) -> Result<Option<UnitPath>, SyncError> {
        let kind = entity.kind();
        let path = self.options.paths.build(
            &run.project.name,
            kind,
            section,
            Some(entity.name()),
        );
        let parent = path.parent();
        self.store.ensure_container(&parent)?;

        let image = match resolve_image_url(entity) {
            Some(url) => {
                let token = entity
                    .last_modified()
                    .unwrap_or(run.synced_at)
                    .timestamp()
                    .to_string();
                let request = ImageRequest {
                    project: &run.project.name,
                    kind,
                    name: entity.name().trim(),
                    url,
                    token: &token,
                };
                Some(
                    materialize_image(
                        self.source,
                        &mut *self.store,
                        &request,
                        self.options.image_storage,
                        self.options.image_timeout,
                    )
                    .await,
                )
            }
            None => {
                tracing::debug!(%kind, name = entity.name(), "no preview image");
                None
            }
        };

        let ctx = self.render_context(run);
        let content = render_entity(entity, section, image.as_deref(), &ctx);
        let source_url = deep_link(ctx.app_url, ctx.project_id, kind, entity.id());
        let request = Upsert {
            parent: &parent,
            name: path.name(),
            content: &content,
            remote_id: entity.id(),
            metadata: entity_metadata(kind, &source_url),
            children,
        };
        let Some(outcome) = upsert(&mut *self.store, &request, run.synced_at)? else {
            tracing::warn!(%kind, name = entity.name(), "unit not created; skipping");
            counts.skipped += 1;
            return Ok(None);
        };
        counts.record(outcome.action);
        tracing::debug!(%kind, unit = %outcome.id, action = ?outcome.action, "synced");
        Ok(Some(self.store.path_of(&outcome.id)?))
    }

    async fn sync_colors<P: SyncProgress + ?Sized>(
        &mut self,
        run: &Run<'_>,
        counts: &mut KindCounts,
        progress: &mut P,
    ) -> Result<Option<UnitPath>, SyncError> {
        let colors = self.source.get_colors(&run.project.id).await?;
        progress.phase_started(EntityKind::Colors, colors.len());
        let children: Vec<ChildUnit> = colors
            .iter()
            .filter(|color| !self.excluded(EntityKind::Color, &color.display_name(), counts))
            .map(color_child)
            .collect();
        let path = self.sync_palette(run, EntityKind::Colors, &children, counts)?;
        progress.item_synced(EntityKind::Colors, EntityKind::Colors.label());
        Ok(path)
    }

    async fn sync_text_styles<P: SyncProgress + ?Sized>(
        &mut self,
        run: &Run<'_>,
        counts: &mut KindCounts,
        progress: &mut P,
    ) -> Result<Option<UnitPath>, SyncError> {
        let styles = self.source.get_text_styles(&run.project.id).await?;
        progress.phase_started(EntityKind::TextStyles, styles.len());
        let children: Vec<ChildUnit> = styles
            .iter()
            .filter(|style| !self.excluded(EntityKind::TextStyle, &style.name, counts))
            .map(text_style_child)
            .collect();
        let path = self.sync_palette(run, EntityKind::TextStyles, &children, counts)?;
        progress.item_synced(EntityKind::TextStyles, EntityKind::TextStyles.label());
        Ok(path)
    }

    /// One unit per palette kind, entries as children. An empty palette
    /// creates nothing; an existing unit is still refreshed.
    fn sync_palette(
        &mut self,
        run: &Run<'_>,
        kind: EntityKind,
        children: &[ChildUnit],
        counts: &mut KindCounts,
    ) -> Result<Option<UnitPath>, SyncError> {
        let remote_id = format!("{}:{}", run.project.id, kind.as_str());
        if children.is_empty()
            && self
                .store
                .find_by_metadata(keys::REMOTE_ID, &remote_id)?
                .is_none()
        {
            return Ok(None);
        }

        let folder = self
            .options
            .paths
            .build(&run.project.name, kind, None, None);
        let parent = folder.parent();
        if !parent.is_empty() {
            self.store.ensure_container(&parent)?;
        }
        let ctx = self.render_context(run);
        let content = render_palette(kind, run.project, &ctx);
        let source_url = deep_link(ctx.app_url, ctx.project_id, kind, "");
        let request = Upsert {
            parent: &parent,
            name: folder.name(),
            content: &content,
            remote_id: &remote_id,
            metadata: entity_metadata(kind, &source_url),
            children,
        };
        let Some(outcome) = upsert(&mut *self.store, &request, run.synced_at)? else {
            tracing::warn!(%kind, "palette unit not created; skipping");
            counts.skipped += 1;
            return Ok(None);
        };
        counts.record_children(outcome.children);
        Ok(Some(self.store.path_of(&outcome.id)?))
    }

    fn sync_index(
        &mut self,
        run: &Run<'_>,
        entries: &IndexEntries,
    ) -> Result<Option<String>, SyncError> {
        let path = self.options.paths.index(&run.project.name);
        let parent = path.parent();
        if !parent.is_empty() {
            self.store.ensure_container(&parent)?;
        }
        let ctx = self.render_context(run);
        let content = render_index(run.project, entries, &ctx);
        let source_url = deep_link(ctx.app_url, ctx.project_id, EntityKind::Project, "");
        let request = Upsert {
            parent: &parent,
            name: path.name(),
            content: &content,
            remote_id: &run.project.id,
            metadata: entity_metadata(EntityKind::Project, &source_url),
            children: &[],
        };
        let outcome = upsert(&mut *self.store, &request, run.synced_at)?;
        if outcome.is_none() {
            tracing::warn!(project = %run.project.name, "index unit not created");
        }
        Ok(outcome.map(|o| o.id.to_string()))
    }
}

fn entity_metadata(kind: EntityKind, source_url: &str) -> Metadata {
    Metadata::from([
        (keys::REMOTE_TYPE.to_string(), kind.as_str().to_string()),
        (keys::SOURCE_URL.to_string(), source_url.to_string()),
    ])
}

