//! Parse design API payloads into ds-core entities.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use ds_core::entities::{Color, Component, DesignEntity, Project, Screen, TextStyle};
use ds_core::enums::EntityKind;

const COMPONENT: &str = r#"{
    "id": "5e2f1b",
    "name": "Button / Primary",
    "description": "Main call to action",
    "section": { "id": "sec-inputs" },
    "image": {
        "width": 120,
        "height": 40,
        "original_url": "https://cdn.example.com/button.png",
        "thumbnails": {
            "small": "https://cdn.example.com/button-s.png",
            "medium": "https://cdn.example.com/button-m.png",
            "large": "https://cdn.example.com/button-l.png"
        }
    },
    "latest_version": {
        "id": "v2",
        "image": { "original_url": "https://cdn.example.com/button-v2.png" }
    },
    "created": 1517184000,
    "updated": 1517270400
}"#;

#[test]
fn component_payload_parses() {
    let component: Component = serde_json::from_str(COMPONENT).unwrap();

    assert_eq!(component.kind(), EntityKind::Component);
    assert_eq!(component.name(), "Button / Primary");
    assert_eq!(component.section_id(), Some("sec-inputs"));
    assert_eq!(component.description(), Some("Main call to action"));
    assert_eq!(
        component.created,
        Some(Utc.timestamp_opt(1_517_184_000, 0).unwrap())
    );
    assert!(component.tags().is_empty());

    let sources = component.image_sources();
    assert_eq!(
        sources.primary.and_then(|i| i.large_thumbnail()),
        Some("https://cdn.example.com/button-l.png")
    );
    assert_eq!(
        sources.latest.and_then(|i| i.original_url.as_deref()),
        Some("https://cdn.example.com/button-v2.png")
    );
    assert!(sources.history.is_empty());
}

#[test]
fn screen_payload_with_history_parses() {
    let screen: Screen = serde_json::from_str(
        r#"{
            "id": "scr-1",
            "name": "Login",
            "description": "   ",
            "tags": ["auth", "mobile"],
            "images": [
                { "id": "ver-1", "url": "https://cdn.example.com/login-1.png", "created": 1517184000 },
                { "id": "ver-2", "url": "https://cdn.example.com/login-2.png" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(screen.kind(), EntityKind::Screen);
    assert_eq!(screen.tags(), ["auth".to_string(), "mobile".to_string()]);
    assert_eq!(screen.description(), None, "blank descriptions are absent");
    assert!(screen.image_sources().primary.is_none());
    assert_eq!(screen.image_sources().history.len(), 2);
}

#[test]
fn project_counts_default_to_zero() {
    let project: Project =
        serde_json::from_str(r#"{ "id": "p1", "name": "Atlas", "platform": "web" }"#).unwrap();
    assert_eq!(project.status, "");
    assert_eq!(project.number_of_components, 0);
}

#[test]
fn color_without_alpha_is_opaque() {
    let color: Color =
        serde_json::from_str(r#"{ "id": "c1", "name": "Brand", "r": 1.0, "g": 0.0, "b": 0.0 }"#)
            .unwrap();
    assert_eq!(color.hex(), "#ff0000");
    assert_eq!(color.display_name(), "Brand");

    let unnamed = Color { name: None, ..color };
    assert_eq!(unnamed.display_name(), "#ff0000");
}

#[test]
fn text_style_defaults_weight() {
    let style: TextStyle = serde_json::from_str(
        r#"{ "id": "t1", "name": "Caption", "font_family": "Inter", "font_size": 12 }"#,
    )
    .unwrap();
    assert!((style.font_weight - 400.0).abs() < f64::EPSILON);
    assert_eq!(ds_core::format_text_style(&style), "Inter 12px, weight 400");
}
