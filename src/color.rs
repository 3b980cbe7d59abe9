use crate::error::ChartError;
use plotters::style::RGBColor;

/// Default series palette (matplotlib's tab10)
pub const DEFAULT_PALETTE: &[RGBColor] = &[
    RGBColor(31, 119, 180),  // tab:blue
    RGBColor(255, 127, 14),  // tab:orange
    RGBColor(44, 160, 44),   // tab:green
    RGBColor(214, 39, 40),   // tab:red
    RGBColor(148, 103, 189), // tab:purple
    RGBColor(140, 86, 75),   // tab:brown
    RGBColor(227, 119, 194), // tab:pink
    RGBColor(127, 127, 127), // tab:gray
    RGBColor(188, 189, 34),  // tab:olive
    RGBColor(23, 190, 207),  // tab:cyan
];

const NAMED_COLORS: &[(&str, RGBColor)] = &[
    ("b", RGBColor(0, 0, 255)),
    ("g", RGBColor(0, 128, 0)),
    ("r", RGBColor(255, 0, 0)),
    ("c", RGBColor(0, 191, 191)),
    ("m", RGBColor(191, 0, 191)),
    ("y", RGBColor(191, 191, 0)),
    ("k", RGBColor(0, 0, 0)),
    ("w", RGBColor(255, 255, 255)),
    ("tab:blue", DEFAULT_PALETTE[0]),
    ("tab:orange", DEFAULT_PALETTE[1]),
    ("tab:green", DEFAULT_PALETTE[2]),
    ("tab:red", DEFAULT_PALETTE[3]),
    ("tab:purple", DEFAULT_PALETTE[4]),
    ("tab:brown", DEFAULT_PALETTE[5]),
    ("tab:pink", DEFAULT_PALETTE[6]),
    ("tab:gray", DEFAULT_PALETTE[7]),
    ("tab:grey", DEFAULT_PALETTE[7]),
    ("tab:olive", DEFAULT_PALETTE[8]),
    ("tab:cyan", DEFAULT_PALETTE[9]),
    ("black", RGBColor(0, 0, 0)),
    ("white", RGBColor(255, 255, 255)),
    ("red", RGBColor(255, 0, 0)),
    ("green", RGBColor(0, 128, 0)),
    ("lime", RGBColor(0, 255, 0)),
    ("blue", RGBColor(0, 0, 255)),
    ("navy", RGBColor(0, 0, 128)),
    ("yellow", RGBColor(255, 255, 0)),
    ("gold", RGBColor(255, 215, 0)),
    ("orange", RGBColor(255, 165, 0)),
    ("darkorange", RGBColor(255, 140, 0)),
    ("purple", RGBColor(128, 0, 128)),
    ("violet", RGBColor(238, 130, 238)),
    ("magenta", RGBColor(255, 0, 255)),
    ("cyan", RGBColor(0, 255, 255)),
    ("teal", RGBColor(0, 128, 128)),
    ("brown", RGBColor(165, 42, 42)),
    ("maroon", RGBColor(128, 0, 0)),
    ("olive", RGBColor(128, 128, 0)),
    ("pink", RGBColor(255, 192, 203)),
    ("salmon", RGBColor(250, 128, 114)),
    ("coral", RGBColor(255, 127, 80)),
    ("gray", RGBColor(128, 128, 128)),
    ("grey", RGBColor(128, 128, 128)),
    ("darkgray", RGBColor(169, 169, 169)),
    ("lightgray", RGBColor(211, 211, 211)),
    ("silver", RGBColor(192, 192, 192)),
    ("darkblue", RGBColor(0, 0, 139)),
    ("darkgreen", RGBColor(0, 100, 0)),
    ("darkred", RGBColor(139, 0, 0)),
    ("skyblue", RGBColor(135, 206, 235)),
    ("steelblue", RGBColor(70, 130, 180)),
    ("royalblue", RGBColor(65, 105, 225)),
    ("indigo", RGBColor(75, 0, 130)),
    ("crimson", RGBColor(220, 20, 60)),
    ("tomato", RGBColor(255, 99, 71)),
    ("turquoise", RGBColor(64, 224, 208)),
    ("peachpuff", RGBColor(255, 218, 185)),
];

/// Parse `#rgb`, `#rrggbb` or a known color name (case-insensitive).
pub fn parse_color(value: &str) -> Option<RGBColor> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some(RGBColor(rgb.next()??, rgb.next()??, rgb.next()??))
        }
        6 => Some(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Validate every override, failing on the first bad one.
pub fn validate_colors(colors: &[String]) -> Result<Vec<RGBColor>, ChartError> {
    colors
        .iter()
        .map(|c| parse_color(c).ok_or_else(|| ChartError::InvalidColor { value: c.clone() }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#1f77b4"), Some(RGBColor(31, 119, 180)));
        assert_eq!(parse_color("#FFF"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gggggg"), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_color("red"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("Tab:Blue"), Some(DEFAULT_PALETTE[0]));
        assert_eq!(parse_color("k"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color("reddish"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_validate_reports_offender() {
        let colors = vec!["red".to_string(), "nope".to_string(), "bad".to_string()];
        assert_eq!(
            validate_colors(&colors),
            Err(ChartError::InvalidColor {
                value: "nope".to_string()
            })
        );
        assert_eq!(validate_colors(&colors), validate_colors(&colors));

        let good = vec!["#000".to_string(), "blue".to_string()];
        assert_eq!(validate_colors(&good).unwrap().len(), 2);
    }
}
