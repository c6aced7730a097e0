//! Preview image resolution and materialization.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ds_core::entities::{DesignEntity, ImageRef};
use ds_core::enums::{EntityKind, ImageStorage};
use ds_remote::DesignSource;
use ds_vault::UnitStore;

use crate::paths::sanitize;

const EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "svg", "webp"];

fn present(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.trim().is_empty())
}

/// Best URL of one image: large thumbnail, original, medium thumbnail, then
/// the generic URL.
pub fn best_url(image: &ImageRef) -> Option<&str> {
    present(image.large_thumbnail())
        .or_else(|| present(image.original_url.as_deref()))
        .or_else(|| present(image.medium_thumbnail()))
        .or_else(|| present(image.url.as_deref()))
}

/// Preview URL of an entity: the primary image, then the latest version's
/// image, then the first history entry. `None` means no preview.
pub fn resolve_image_url<E: DesignEntity + ?Sized>(entity: &E) -> Option<&str> {
    let sources = entity.image_sources();
    sources
        .primary
        .and_then(best_url)
        .or_else(|| sources.latest.and_then(best_url))
        .or_else(|| sources.history.first().and_then(best_url))
}

/// Lowercase file extension from the URL path when it is a known image
/// type, `png` otherwise.
pub fn image_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    let Some((_, ext)) = file.rsplit_once('.') else {
        return "png";
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|known| **known == ext)
        .copied()
        .unwrap_or("png")
}

fn mime_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

/// `{project}-{kind}-{name}-{token}.{ext}`, every part sanitized.
pub fn asset_file_name(
    project: &str,
    kind: EntityKind,
    name: &str,
    token: &str,
    url: &str,
) -> String {
    let file = format!(
        "{}-{}-{}-{}.{}",
        sanitize(project),
        kind.as_str(),
        sanitize(name),
        sanitize(token),
        image_extension(url)
    );
    sanitize(&file)
}

/// Markdown image reference. Brackets are dropped from the alt text.
pub fn image_markup(alt: &str, target: &str) -> String {
    let alt: String = alt.chars().filter(|c| !matches!(c, '[' | ']')).collect();
    format!("![{alt}]({target})")
}

/// Largest image embedded as a data URI; bigger ones are linked.
pub const MAX_INLINE_BYTES: usize = 2 * 1024 * 1024;

/// What to materialize and under which names.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub project: &'a str,
    pub kind: EntityKind,
    pub name: &'a str,
    pub url: &'a str,
    /// Uniqueness token for persisted asset names.
    pub token: &'a str,
}

/// Turn a resolved URL into image markup according to `mode`.
///
/// Fetch and write failures never fail the item: the result falls back to a
/// direct link to `url`.
pub async fn materialize_image<S, U>(
    source: &S,
    store: &mut U,
    request: &ImageRequest<'_>,
    mode: ImageStorage,
    timeout: Duration,
) -> String
where
    S: DesignSource,
    U: UnitStore + ?Sized,
{
    let fallback = || image_markup(request.name, request.url);
    match mode {
        ImageStorage::Assets => fallback(),
        ImageStorage::Inline => match source.fetch_bytes(request.url, timeout).await {
            Ok(bytes) if bytes.len() > MAX_INLINE_BYTES => {
                tracing::warn!(
                    url = request.url,
                    bytes = bytes.len(),
                    "image too large to inline; linking instead"
                );
                fallback()
            }
            Ok(bytes) => {
                let mime = mime_type(image_extension(request.url));
                let data = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
                image_markup(request.name, &data)
            }
            Err(error) => {
                tracing::warn!(url = request.url, %error, "image fetch failed; linking instead");
                fallback()
            }
        },
        ImageStorage::Local => {
            if !store.capabilities().assets {
                tracing::warn!("store has no asset support; linking image instead");
                return fallback();
            }
            let bytes = match source.fetch_bytes(request.url, timeout).await {
                Ok(bytes) => bytes,
                Err(error) => {
                    tracing::warn!(url = request.url, %error, "image fetch failed; linking instead");
                    return fallback();
                }
            };
            let file_name = asset_file_name(
                request.project,
                request.kind,
                request.name,
                request.token,
                request.url,
            );
            match store.write_asset(&file_name, &bytes) {
                Ok(target) => image_markup(request.name, &target),
                Err(error) => {
                    tracing::warn!(%file_name, %error, "asset write failed; linking instead");
                    fallback()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::entities::{Component, Screen, Thumbnails, VersionRef};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn component(image: Option<ImageRef>) -> Component {
        Component {
            id: "c1".into(),
            name: "Button".into(),
            description: None,
            section: None,
            image,
            latest_version: None,
            images: Vec::new(),
            created: None,
            updated: None,
        }
    }

    fn thumbs(medium: Option<&str>, large: Option<&str>) -> Option<Thumbnails> {
        Some(Thumbnails {
            small: None,
            medium: medium.map(Into::into),
            large: large.map(Into::into),
        })
    }

    #[test]
    fn large_thumbnail_beats_medium() {
        let entity = component(Some(ImageRef {
            thumbnails: thumbs(Some("m"), Some("l")),
            original_url: Some("o".into()),
            ..ImageRef::default()
        }));
        assert_eq!(resolve_image_url(&entity), Some("l"));
    }

    #[test]
    fn original_url_alone() {
        let entity = component(Some(ImageRef {
            original_url: Some("o".into()),
            ..ImageRef::default()
        }));
        assert_eq!(resolve_image_url(&entity), Some("o"));
    }

    #[test]
    fn medium_then_generic_url() {
        let entity = component(Some(ImageRef {
            thumbnails: thumbs(Some("m"), None),
            url: Some("u".into()),
            ..ImageRef::default()
        }));
        assert_eq!(resolve_image_url(&entity), Some("m"));
        let entity = component(Some(ImageRef {
            url: Some("u".into()),
            ..ImageRef::default()
        }));
        assert_eq!(resolve_image_url(&entity), Some("u"));
    }

    #[test]
    fn no_image_fields_is_none() {
        assert_eq!(resolve_image_url(&component(None)), None);
        assert_eq!(resolve_image_url(&component(Some(ImageRef::default()))), None);
    }

    #[test]
    fn latest_version_then_history() {
        let mut entity = component(Some(ImageRef {
            url: Some("   ".into()),
            ..ImageRef::default()
        }));
        entity.images = vec![ImageRef {
            url: Some("h".into()),
            ..ImageRef::default()
        }];
        assert_eq!(resolve_image_url(&entity), Some("h"));

        entity.latest_version = Some(VersionRef {
            image: Some(ImageRef {
                original_url: Some("v".into()),
                ..ImageRef::default()
            }),
            ..VersionRef::default()
        });
        assert_eq!(resolve_image_url(&entity), Some("v"));
    }

    #[test]
    fn screens_resolve_the_same_way() {
        let screen: Screen = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Login",
            "images": [{ "id": "v1", "original_url": "first" }, { "id": "v2", "original_url": "second" }]
        }))
        .unwrap();
        assert_eq!(resolve_image_url(&screen), Some("first"));
    }

    #[rstest]
    #[case("https://cdn.example.com/a/b.PNG?w=200", "png")]
    #[case("https://cdn.example.com/a/b.jpeg", "jpeg")]
    #[case("https://cdn.example.com/a/b.webp#frag", "webp")]
    #[case("https://cdn.example.com/a/b.tiff", "png")]
    #[case("https://cdn.example.com/a/b", "png")]
    #[case("https://cdn.example.com.v2/image", "png")]
    fn extension_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(image_extension(url), expected);
    }

    #[test]
    fn asset_names_are_sanitized() {
        assert_eq!(
            asset_file_name(
                "Atlas / Web",
                EntityKind::Screen,
                "Log: in",
                "1517184000",
                "https://cdn/x.gif"
            ),
            "Atlas - Web-screen-Log- in-1517184000.gif"
        );
    }

    #[test]
    fn alt_text_drops_brackets() {
        assert_eq!(image_markup("[Draft] Login", "u"), "![Draft Login](u)");
    }
}
