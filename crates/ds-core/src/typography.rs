//! Text style summaries.

use crate::entities::TextStyle;

/// Format a float without a trailing `.0` for whole values.
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        let rendered = format!("{value:.2}");
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// One-line typography summary, e.g. `Inter 16px/24px, weight 600, #1a1a1a`.
///
/// Optional attributes are omitted when absent; order is fixed.
#[must_use]
pub fn format_text_style(style: &TextStyle) -> String {
    let mut size = format!("{}px", number(style.font_size));
    if let Some(line_height) = style.line_height {
        size.push_str(&format!("/{}px", number(line_height)));
    }

    let mut parts = vec![
        format!("{} {size}", style.font_family.trim()),
        format!("weight {}", number(style.font_weight)),
    ];
    if let Some(spacing) = style.letter_spacing.filter(|s| *s != 0.0) {
        parts.push(format!("letter spacing {}", number(spacing)));
    }
    if let Some(color) = &style.color {
        parts.push(color.hex());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ColorValue;

    fn style() -> TextStyle {
        TextStyle {
            id: "ts1".into(),
            name: "Body".into(),
            font_family: "Inter".into(),
            font_size: 16.0,
            font_weight: 400.0,
            line_height: None,
            letter_spacing: None,
            color: None,
        }
    }

    #[test]
    fn minimal_style() {
        assert_eq!(format_text_style(&style()), "Inter 16px, weight 400");
    }

    #[test]
    fn full_style_keeps_field_order() {
        let full = TextStyle {
            line_height: Some(24.0),
            letter_spacing: Some(0.25),
            font_weight: 600.0,
            color: Some(ColorValue {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            }),
            ..style()
        };
        assert_eq!(
            format_text_style(&full),
            "Inter 16px/24px, weight 600, letter spacing 0.25, #000000"
        );
    }

    #[test]
    fn fractional_sizes_are_trimmed() {
        let fractional = TextStyle {
            font_size: 13.5,
            ..style()
        };
        assert!(format_text_style(&fractional).starts_with("Inter 13.5px"));
    }
}
