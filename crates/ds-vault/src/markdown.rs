//! File-tree host: one markdown file per unit.
//!
//! ```text
//! ---
//! remote-id: 5e2f1b
//! remote-type: component
//! ---
//!
//! main content
//!
//! <!-- child remote-id="v1" -->
//! child content
//! <!-- /child -->
//! ```

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::document::{Document, Segment};
use crate::error::FormatError;
use crate::store::{FileStore, Layout, PageFormat};
use crate::{Capabilities, ChildUnit, Metadata, UnitPath, keys};

/// Folder tree of `.md` files with YAML frontmatter.
pub type MarkdownVault = FileStore<MarkdownFormat>;

const CHILD_CLOSE: &str = "<!-- /child -->";

static CHILD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--\s*child\s+(.*?)\s*-->$").expect("valid child regex"));

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).expect("valid attribute regex"));

pub struct MarkdownFormat;

impl PageFormat for MarkdownFormat {
    fn capabilities() -> Capabilities {
        Capabilities {
            pages: true,
            blocks: false,
            assets: true,
        }
    }

    fn layout(root: &Path, assets_dir: &str) -> Layout {
        let dir = assets_dir.trim().trim_matches('/');
        let dir = if dir.is_empty() { "assets" } else { dir };
        Layout {
            pages: root.to_path_buf(),
            assets: root.join(dir),
            asset_link_prefix: format!("{dir}/"),
        }
    }

    fn file_for(path: &UnitPath) -> PathBuf {
        let mut file: PathBuf = path.parent().segments().iter().collect();
        file.push(format!("{}.md", path.name()));
        file
    }

    fn path_for(relative: &Path) -> Option<UnitPath> {
        let mut segments = Vec::new();
        for component in relative.components() {
            let Component::Normal(part) = component else {
                return None;
            };
            segments.push(part.to_str()?.to_string());
        }
        let name = segments.pop()?;
        segments.push(name.strip_suffix(".md")?.to_string());
        Some(UnitPath::new(segments))
    }

    fn container_dir(layout: &Layout, path: &UnitPath) -> Option<PathBuf> {
        Some(
            path.segments()
                .iter()
                .fold(layout.pages.clone(), |dir, segment| dir.join(segment)),
        )
    }

    fn parse(text: &str) -> Result<Document, FormatError> {
        let (front, rest) = split_frontmatter(text);
        let properties = match front {
            Some(yaml) if !yaml.trim().is_empty() => match serde_yaml::from_str(yaml)? {
                Value::Mapping(mapping) => mapping,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(FormatError::Malformed(
                        "frontmatter is not a mapping".into(),
                    ));
                }
            },
            _ => Mapping::new(),
        };

        let mut body = Vec::new();
        let mut tail = Vec::new();
        let mut text_run: Vec<&str> = Vec::new();
        let mut in_tail = false;

        let mut lines = rest.lines();
        while let Some(line) = lines.next() {
            let Some(open) = CHILD_OPEN.captures(line.trim()) else {
                if in_tail {
                    text_run.push(line);
                } else {
                    body.push(line);
                }
                continue;
            };
            in_tail = true;
            flush_text(&mut text_run, &mut tail);

            let mut content = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim() == CHILD_CLOSE {
                    break;
                }
                content.push(inner);
            }

            let mut metadata = parse_attributes(&open[1]);
            match metadata.remove(keys::REMOTE_ID) {
                Some(remote_id) => tail.push(Segment::Child(ChildUnit {
                    remote_id,
                    content: content.join("\n").trim().to_string(),
                    metadata,
                })),
                None => {
                    let raw = format!("{line}\n{}\n{CHILD_CLOSE}", content.join("\n"));
                    tail.push(Segment::Text(raw));
                }
            }
        }
        flush_text(&mut text_run, &mut tail);

        Ok(Document {
            properties,
            body: body.join("\n").trim().to_string(),
            tail,
        })
    }

    fn render(doc: &Document) -> Result<String, FormatError> {
        let mut out = String::new();
        if !doc.properties.is_empty() {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(&doc.properties)?);
            out.push_str("---\n");
        }

        let mut blocks = Vec::new();
        if !doc.body.is_empty() {
            blocks.push(doc.body.clone());
        }
        for segment in &doc.tail {
            match segment {
                Segment::Child(child) => blocks.push(render_child(child)),
                Segment::Text(text) if !text.trim().is_empty() => {
                    blocks.push(text.trim().to_string());
                }
                Segment::Text(_) => {}
            }
        }
        if !blocks.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&blocks.join("\n\n"));
            out.push('\n');
        }
        Ok(out)
    }
}

/// Split `---` delimited frontmatter from the rest. An unterminated block is
/// treated as plain content.
fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

fn flush_text(run: &mut Vec<&str>, tail: &mut Vec<Segment>) {
    let text = run.join("\n");
    run.clear();
    let text = text.trim();
    if !text.is_empty() {
        tail.push(Segment::Text(text.to_string()));
    }
}

fn parse_attributes(raw: &str) -> Metadata {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|c| (c[1].to_string(), unescape(&c[2])))
        .collect()
}

fn render_child(child: &ChildUnit) -> String {
    let mut attributes = format!("{}=\"{}\"", keys::REMOTE_ID, escape(&child.remote_id));
    for (key, value) in &child.metadata {
        if key != keys::REMOTE_ID {
            attributes.push_str(&format!(" {key}=\"{}\"", escape(value)));
        }
    }
    format!(
        "<!-- child {attributes} -->\n{}\n{CHILD_CLOSE}",
        child.content.trim()
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('>', "&gt;")
}

fn unescape(value: &str) -> String {
    value
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
