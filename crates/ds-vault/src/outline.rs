//! Block-tree host: outline pages in a flat `pages/` directory.
//!
//! A unit path `a/b/c` is the namespace page `pages/a___b___c.md`. Page
//! properties are `key:: value` lines; content is a list of top-level
//! `- ` blocks; a child is a top-level block carrying `remote-id::`.
//!
//! ```text
//! remote-id:: 5e2f1b
//! remote-type:: screen
//!
//! - main content
//! - ![v1](https://cdn.example.com/v1.png)
//!   remote-id:: v1
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::document::{Document, Segment, scalar_string};
use crate::error::FormatError;
use crate::store::{FileStore, Layout, PageFormat};
use crate::{Capabilities, ChildUnit, Metadata, UnitPath, keys};

/// Outline graph with namespace pages.
pub type OutlineGraph = FileStore<OutlineFormat>;

const NAMESPACE_SEPARATOR: &str = "___";

static PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+):: ?(.*)$").expect("valid property regex"));

pub struct OutlineFormat;

/// One top-level block as read from disk.
struct Block {
    /// Lines with the bullet and one level of indentation removed.
    lines: Vec<String>,
    /// Original text, for blocks kept verbatim.
    raw: String,
}

impl Block {
    fn properties(&self) -> Metadata {
        self.lines
            .iter()
            .skip(1)
            .filter_map(|line| {
                let caps = PROPERTY.captures(line)?;
                Some((caps[1].to_string(), caps[2].trim().to_string()))
            })
            .collect()
    }

    fn content(&self) -> String {
        let mut content = self.lines.first().cloned().unwrap_or_default();
        for line in self.lines.iter().skip(1) {
            if !PROPERTY.is_match(line) {
                content.push('\n');
                content.push_str(line);
            }
        }
        content.trim().to_string()
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl PageFormat for OutlineFormat {
    fn capabilities() -> Capabilities {
        Capabilities {
            pages: true,
            blocks: true,
            assets: true,
        }
    }

    fn layout(root: &Path, _assets_dir: &str) -> Layout {
        Layout {
            pages: root.join("pages"),
            assets: root.join("assets"),
            asset_link_prefix: "../assets/".into(),
        }
    }

    fn file_for(path: &UnitPath) -> PathBuf {
        PathBuf::from(format!(
            "{}.md",
            path.segments().join(NAMESPACE_SEPARATOR)
        ))
    }

    fn path_for(relative: &Path) -> Option<UnitPath> {
        if relative.components().count() != 1 {
            return None;
        }
        let stem = relative.to_str()?.strip_suffix(".md")?;
        Some(UnitPath::new(stem.split(NAMESPACE_SEPARATOR)))
    }

    fn container_dir(_layout: &Layout, _path: &UnitPath) -> Option<PathBuf> {
        None
    }

    fn parse(text: &str) -> Result<Document, FormatError> {
        let mut lines = text.lines().peekable();

        let mut properties = Mapping::new();
        while let Some(&line) = lines.peek() {
            let Some(caps) = PROPERTY.captures(line) else {
                break;
            };
            properties.insert(
                Value::String(caps[1].to_string()),
                Value::String(caps[2].trim().to_string()),
            );
            lines.next();
        }

        let mut blocks: Vec<Block> = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(first) = line.strip_prefix("- ").or_else(|| (line == "-").then_some(""))
            {
                blocks.push(Block {
                    lines: vec![first.to_string()],
                    raw: line.to_string(),
                });
                continue;
            }
            let Some(block) = blocks.last_mut() else {
                return Err(FormatError::Malformed(format!(
                    "text outside of a block: {line:?}"
                )));
            };
            let unindented = line
                .strip_prefix("  ")
                .or_else(|| line.strip_prefix('\t'))
                .unwrap_or(line);
            block.lines.push(unindented.to_string());
            block.raw.push('\n');
            block.raw.push_str(line);
        }

        let mut body = Vec::new();
        let mut tail = Vec::new();
        for block in blocks {
            let mut metadata = block.properties();
            match metadata.remove(keys::REMOTE_ID) {
                Some(remote_id) => tail.push(Segment::Child(ChildUnit {
                    remote_id,
                    content: block.content(),
                    metadata,
                })),
                None if tail.is_empty() => body.push(block.text()),
                None => tail.push(Segment::Text(block.raw)),
            }
        }

        Ok(Document {
            properties,
            body: body.join("\n\n").trim().to_string(),
            tail,
        })
    }

    fn render(doc: &Document) -> Result<String, FormatError> {
        let mut out = String::new();
        for (key, value) in &doc.properties {
            let (Some(key), Some(value)) = (key.as_str(), scalar_string(value)) else {
                continue;
            };
            out.push_str(&format!("{key}:: {}\n", single_line(&value)));
        }

        let mut blocks = Vec::new();
        for paragraph in paragraphs(&doc.body) {
            blocks.push(bullet(&paragraph));
        }
        for segment in &doc.tail {
            match segment {
                Segment::Child(child) => blocks.push(render_child(child)),
                Segment::Text(raw) if !raw.trim().is_empty() => {
                    blocks.push(raw.trim_end().to_string());
                }
                Segment::Text(_) => {}
            }
        }
        if !blocks.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&blocks.join("\n"));
            out.push('\n');
        }
        Ok(out)
    }
}

/// Split on blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

fn bullet(text: &str) -> String {
    let mut lines = text.lines();
    let mut out = format!("- {}", lines.next().unwrap_or_default());
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

fn render_child(child: &ChildUnit) -> String {
    let mut out = bullet(child.content.trim());
    out.push_str(&format!(
        "\n  {}:: {}",
        keys::REMOTE_ID,
        single_line(&child.remote_id)
    ));
    for (key, value) in &child.metadata {
        if key != keys::REMOTE_ID {
            out.push_str(&format!("\n  {key}:: {}", single_line(value)));
        }
    }
    out
}

fn single_line(value: &str) -> String {
    value.lines().map(str::trim).collect::<Vec<_>>().join(" ")
}
