//! Color formatting.

/// Convert a normalized float channel to its 0-255 byte value.
fn channel_to_byte(value: f64) -> u8 {
    let scaled = (value.clamp(0.0, 1.0) * 255.0).round();
    // Clamped to [0, 255] above, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = scaled as u8;
    byte
}

/// Render normalized RGBA channels as a lowercase hex color.
///
/// Fully opaque colors produce `#rrggbb`; anything with `a < 1` appends the
/// alpha byte (`#rrggbbaa`). Channels outside `[0, 1]` are clamped.
#[must_use]
pub fn rgba_to_hex(r: f64, g: f64, b: f64, a: f64) -> String {
    let mut hex = format!(
        "#{:02x}{:02x}{:02x}",
        channel_to_byte(r),
        channel_to_byte(g),
        channel_to_byte(b)
    );
    if a < 1.0 {
        hex.push_str(&format!("{:02x}", channel_to_byte(a)));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 0.0, 1.0, "#000000")]
    #[case(1.0, 1.0, 1.0, 1.0, "#ffffff")]
    #[case(1.0, 0.0, 0.0, 0.5, "#ff000080")]
    #[case(0.0, 1.0, 0.0, 1.0, "#00ff00")]
    #[case(0.0, 0.0, 1.0, 0.0, "#0000ff00")]
    fn known_fixtures(
        #[case] r: f64,
        #[case] g: f64,
        #[case] b: f64,
        #[case] a: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(rgba_to_hex(r, g, b, a), expected);
    }

    #[test]
    fn channels_are_zero_padded() {
        assert_eq!(rgba_to_hex(1.0 / 255.0, 0.0, 0.0, 1.0), "#010000");
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(rgba_to_hex(1.5, -0.2, 0.0, 2.0), "#ff0000");
    }
}
