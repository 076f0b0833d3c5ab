//! # Color Parsing
//!
//! Resolves the `color()` module's first argument per §4.4: a CSS-style
//! name, a `#rgb`/`#rrggbb`/`#rrggbbaa` hex literal, or (handled by the
//! caller, not here) an RGB/RGBA number vector. An unrecognized name falls
//! back to medium gray, matching the source language's "never hard-error on
//! a color string" behavior.

/// Medium gray, the fallback for an unrecognized color name.
pub const FALLBACK_GRAY: [f64; 4] = [0.5, 0.5, 0.5, 1.0];

/// Resolve a CSS-style color string: `#rgb`, `#rrggbb`, `#rrggbbaa`, or a
/// named color. Falls back to [`FALLBACK_GRAY`] rather than failing.
pub fn resolve_color_str(s: &str) -> [f64; 4] {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if let Some(rgba) = parse_hex(hex) {
            return rgba;
        }
        return FALLBACK_GRAY;
    }
    named_color(&s.to_ascii_lowercase()).unwrap_or(FALLBACK_GRAY)
}

/// Parse the hex digits after `#`: 3 (`rgb`), 6 (`rrggbb`), or 8
/// (`rrggbbaa`) digits. Returns `None` for any other length or non-hex
/// character, letting the caller fall back to gray.
fn parse_hex(hex: &str) -> Option<[f64; 4]> {
    let digit_pair = |s: &str| -> Option<f64> { u8::from_str_radix(s, 16).ok().map(|v| v as f64 / 255.0) };
    let digit_single = |c: char| -> Option<f64> {
        c.to_digit(16).map(|v| (v * 17) as f64 / 255.0) // "f" -> "ff"
    };

    match hex.len() {
        3 => {
            let mut chars = hex.chars();
            let r = digit_single(chars.next()?)?;
            let g = digit_single(chars.next()?)?;
            let b = digit_single(chars.next()?)?;
            Some([r, g, b, 1.0])
        }
        6 => {
            let r = digit_pair(&hex[0..2])?;
            let g = digit_pair(&hex[2..4])?;
            let b = digit_pair(&hex[4..6])?;
            Some([r, g, b, 1.0])
        }
        8 => {
            let r = digit_pair(&hex[0..2])?;
            let g = digit_pair(&hex[2..4])?;
            let b = digit_pair(&hex[4..6])?;
            let a = digit_pair(&hex[6..8])?;
            Some([r, g, b, a])
        }
        _ => None,
    }
}

/// Look up a lowercased CSS/SVG color name. Covers the common names an
/// OpenSCAD script actually reaches for; anything else falls back to gray
/// in [`resolve_color_str`].
fn named_color(name: &str) -> Option<[f64; 4]> {
    let rgb: [u8; 3] = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "silver" => [192, 192, 192],
        "gray" | "grey" => [128, 128, 128],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "navy" => [0, 0, 128],
        "orange" => [255, 165, 0],
        "orangered" => [255, 69, 0],
        "pink" => [255, 192, 203],
        "hotpink" => [255, 105, 180],
        "deeppink" => [255, 20, 147],
        "brown" => [165, 42, 42],
        "chocolate" => [210, 105, 30],
        "tan" => [210, 180, 140],
        "gold" => [255, 215, 0],
        "khaki" => [240, 230, 140],
        "indigo" => [75, 0, 130],
        "violet" => [238, 130, 238],
        "plum" => [221, 160, 221],
        "orchid" => [218, 112, 214],
        "lavender" => [230, 230, 250],
        "salmon" => [250, 128, 114],
        "coral" => [255, 127, 80],
        "tomato" => [255, 99, 71],
        "crimson" => [220, 20, 60],
        "firebrick" => [178, 34, 34],
        "darkred" => [139, 0, 0],
        "darkgreen" => [0, 100, 0],
        "darkblue" => [0, 0, 139],
        "darkorange" => [255, 140, 0],
        "darkviolet" => [148, 0, 211],
        "darkgray" | "darkgrey" => [169, 169, 169],
        "lightgray" | "lightgrey" => [211, 211, 211],
        "lightblue" => [173, 216, 230],
        "lightgreen" => [144, 238, 144],
        "lightyellow" => [255, 255, 224],
        "lightpink" => [255, 182, 193],
        "skyblue" => [135, 206, 235],
        "steelblue" => [70, 130, 180],
        "royalblue" => [65, 105, 225],
        "slateblue" => [106, 90, 205],
        "turquoise" => [64, 224, 208],
        "aquamarine" => [127, 255, 212],
        "beige" => [245, 245, 220],
        "ivory" => [255, 255, 240],
        "mintcream" => [245, 255, 250],
        "snow" => [255, 250, 250],
        "chartreuse" => [127, 255, 0],
        "springgreen" => [0, 255, 127],
        "seagreen" => [46, 139, 87],
        "forestgreen" => [34, 139, 34],
        "olivedrab" => [107, 142, 35],
        "yellowgreen" => [154, 205, 50],
        "goldenrod" => [218, 165, 32],
        "peru" => [205, 133, 63],
        "sienna" => [160, 82, 45],
        "indianred" => [205, 92, 92],
        "rosybrown" => [188, 143, 143],
        "slategray" | "slategrey" => [112, 128, 144],
        "dimgray" | "dimgrey" => [105, 105, 105],
        "gainsboro" => [220, 220, 220],
        "whitesmoke" => [245, 245, 245],
        "transparent" => return Some([0.0, 0.0, 0.0, 0.0]),
        _ => return None,
    };
    Some([rgb[0] as f64 / 255.0, rgb[1] as f64 / 255.0, rgb[2] as f64 / 255.0, 1.0])
}
