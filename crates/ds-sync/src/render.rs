//! Content rendering for synced units.
//!
//! Output is markdown that both hosts accept; paragraphs are separated by
//! blank lines so the outline host can turn each into a block.

use chrono::{DateTime, SecondsFormat, Utc};
use ds_core::entities::{Color, DesignEntity, ImageRef, Project, TextStyle};
use ds_core::enums::{EntityKind, TemplateDetail};
use ds_core::format_text_style;
use ds_vault::{ChildUnit, UnitPath, keys};

use crate::image::{best_url, image_markup};

/// Settings shared by every render call of one sync run.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub app_url: &'a str,
    pub project_id: &'a str,
    pub template: TemplateDetail,
    pub synced_at: DateTime<Utc>,
}

impl RenderContext<'_> {
    fn provenance(&self) -> String {
        format!(
            "*Synced from Zeplin at {}*",
            self.synced_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Link back into the design tool.
pub fn deep_link(app_url: &str, project_id: &str, kind: EntityKind, entity_id: &str) -> String {
    let app_url = app_url.trim_end_matches('/');
    match kind {
        EntityKind::Component => {
            format!("{app_url}/project/{project_id}/components?coid={entity_id}")
        }
        EntityKind::Screen => format!("{app_url}/project/{project_id}/screen/{entity_id}"),
        EntityKind::Colors | EntityKind::Color => {
            format!("{app_url}/project/{project_id}/styleguide/colors")
        }
        EntityKind::TextStyles | EntityKind::TextStyle => {
            format!("{app_url}/project/{project_id}/styleguide/textstyles")
        }
        EntityKind::Project => format!("{app_url}/project/{project_id}"),
    }
}

/// `[[a/b/c]]`
pub fn wiki_link(path: &UnitPath) -> String {
    format!("[[{}]]", path.to_link_target())
}

fn tag_line(tags: &[String]) -> Option<String> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join("-"))
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{t}"))
        .collect();
    (!tags.is_empty()).then(|| tags.join(" "))
}

/// Content of a component or screen unit.
///
/// Fixed order, absent fields omitted: type and section, tags, deep link,
/// description, image, sync provenance. Minimal mode drops the description
/// and the headings.
pub fn render_entity<E: DesignEntity + ?Sized>(
    entity: &E,
    section: Option<&str>,
    image: Option<&str>,
    ctx: &RenderContext<'_>,
) -> String {
    let mut header = vec![match section {
        Some(section) => format!("**{}** · {section}", entity.kind().label()),
        None => format!("**{}**", entity.kind().label()),
    }];
    if let Some(tags) = tag_line(entity.tags()) {
        header.push(tags);
    }
    header.push(format!(
        "[Open in Zeplin]({})",
        deep_link(ctx.app_url, ctx.project_id, entity.kind(), entity.id())
    ));

    match ctx.template {
        TemplateDetail::Detailed => {
            let mut blocks = vec![header.join("\n")];
            if let Some(description) = entity.description() {
                blocks.push(format!("## Description\n{}", description.trim()));
            }
            if let Some(image) = image {
                blocks.push(format!("## Image\n{image}"));
            }
            blocks.push(ctx.provenance());
            blocks.join("\n\n")
        }
        TemplateDetail::Minimal => {
            if let Some(image) = image {
                header.push(image.to_string());
            }
            header.push(ctx.provenance());
            header.join("\n")
        }
    }
}

/// One child per history image that has an ID.
pub fn version_children(name: &str, history: &[ImageRef]) -> Vec<ChildUnit> {
    history
        .iter()
        .filter_map(|image| {
            let id = image.id.as_deref().filter(|id| !id.trim().is_empty())?;
            let label = image.created.map_or_else(
                || format!("{name} ({id})"),
                |created| format!("{name} ({})", created.format("%Y-%m-%d %H:%M")),
            );
            let content = best_url(image)
                .map_or_else(|| label.clone(), |url| image_markup(&label, url));
            Some(
                ChildUnit::new(id, content).with_metadata(keys::REMOTE_TYPE, "version"),
            )
        })
        .collect()
}

pub fn color_child(color: &Color) -> ChildUnit {
    ChildUnit::new(
        &color.id,
        format!("**{}**: `{}`", color.display_name(), color.hex()),
    )
    .with_metadata(keys::REMOTE_TYPE, EntityKind::Color.as_str())
}

pub fn text_style_child(style: &TextStyle) -> ChildUnit {
    ChildUnit::new(
        &style.id,
        format!("**{}**: {}", style.name.trim(), format_text_style(style)),
    )
    .with_metadata(keys::REMOTE_TYPE, EntityKind::TextStyle.as_str())
}

/// Body of a palette unit (`Colors`, `Text Styles`); entries are children.
pub fn render_palette(kind: EntityKind, project: &Project, ctx: &RenderContext<'_>) -> String {
    [
        format!("**{}** · {}", kind.label(), project.name.trim()),
        format!(
            "[Open in Zeplin]({})",
            deep_link(ctx.app_url, ctx.project_id, kind, "")
        ),
        String::new(),
        ctx.provenance(),
    ]
    .join("\n")
}

/// Links collected during a sync for the project index.
#[derive(Debug, Clone, Default)]
pub struct IndexEntries {
    pub components: Vec<UnitPath>,
    pub screens: Vec<UnitPath>,
    pub palettes: Vec<UnitPath>,
}

fn link_list(title: &str, paths: &[UnitPath]) -> Option<String> {
    if paths.is_empty() {
        return None;
    }
    let mut block = format!("## {title}");
    for path in paths {
        block.push_str(&format!("\n- {}", wiki_link(path)));
    }
    Some(block)
}

/// Body of the project index unit.
pub fn render_index(project: &Project, entries: &IndexEntries, ctx: &RenderContext<'_>) -> String {
    let mut header = vec![String::from("**Project**")];
    for fact in [&project.platform, &project.status] {
        if !fact.trim().is_empty() {
            header.push(fact.trim().to_string());
        }
    }
    let mut blocks = vec![format!(
        "{}\n[Open in Zeplin]({})",
        header.join(" · "),
        deep_link(ctx.app_url, ctx.project_id, EntityKind::Project, "")
    )];

    if ctx.template == TemplateDetail::Detailed {
        blocks.push(format!(
            "## Summary\n- Screens: {}\n- Components: {}\n- Colors: {}\n- Text styles: {}",
            project.number_of_screens,
            project.number_of_components,
            project.number_of_colors,
            project.number_of_text_styles
        ));
    }
    blocks.extend(link_list("Components", &entries.components));
    blocks.extend(link_list("Screens", &entries.screens));
    blocks.extend(link_list("Styleguide", &entries.palettes));
    blocks.push(ctx.provenance());
    blocks.join("\n\n")
}
