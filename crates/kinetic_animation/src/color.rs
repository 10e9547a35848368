//! Color normalization
//!
//! Every recognized color becomes an `rgb(r,g,b)` (or `rgba(r,g,b,a)`) string
//! before decomposition, so its channels interpolate as plain numbers.
//! Shapes are matched, not validated.

use crate::value::push_number;
use regex::Regex;
use std::sync::LazyLock;

static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#([0-9a-f]{6}|[0-9a-f]{3})$").expect("hex color pattern compiles")
});

static HSL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hsla?\((\d+),\s*([\d.]+)%,\s*([\d.]+)%(?:,\s*([\d.]+))?\)")
        .expect("hsl color pattern compiles")
});

/// Color keywords accepted next to hex/rgb/hsl
const NAMED_COLORS: [(&str, [u8; 3]); 15] = [
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("silver", [192, 192, 192]),
];

fn named(value: &str) -> Option<[u8; 3]> {
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, rgb)| *rgb)
}

pub fn is_hex(value: &str) -> bool {
    HEX.is_match(value)
}

pub fn is_rgb(value: &str) -> bool {
    value.starts_with("rgb")
}

pub fn is_hsl(value: &str) -> bool {
    value.starts_with("hsl")
}

/// Whether `value` is treated as a color
pub fn is_color(value: &str) -> bool {
    is_hex(value) || is_rgb(value) || is_hsl(value) || named(value).is_some()
}

/// Normalize a color to `rgb(...)` form, or `None` if `value` is not a color
pub fn color_to_rgb(value: &str) -> Option<String> {
    if is_rgb(value) {
        return Some(value.to_string());
    }
    if is_hex(value) {
        return hex_to_rgb(value);
    }
    if is_hsl(value) {
        // Unmatched hsl shapes are passed through untouched
        return Some(hsl_to_rgb(value).unwrap_or_else(|| value.to_string()));
    }
    named(value).map(|[r, g, b]| format!("rgb({r},{g},{b})"))
}

/// `#FFF` / `#ffffff` -> `rgb(255,255,255)`
pub fn hex_to_rgb(value: &str) -> Option<String> {
    let caps = HEX.captures(value)?;
    let digits = &caps[1];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(format!("rgb({},{},{})", channel(0)?, channel(2)?, channel(4)?))
}

/// `hsl(h, s%, l%)` -> `rgb(...)`; `hsla` keeps its alpha as `rgba(...)`
///
/// Channels are not rounded here; color tweens round them on output.
pub fn hsl_to_rgb(value: &str) -> Option<String> {
    let caps = HSL.captures(value)?;
    let h = parse_int(&caps[1]) / 360.0;
    let s = parse_int(&caps[2]) / 100.0;
    let l = parse_int(&caps[3]) / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };

    let alpha = caps.get(4).map(|m| m.as_str());
    let mut out = String::from(if alpha.is_some() { "rgba(" } else { "rgb(" });
    push_number(&mut out, r * 255.0);
    out.push(',');
    push_number(&mut out, g * 255.0);
    out.push(',');
    push_number(&mut out, b * 255.0);
    if let Some(alpha) = alpha {
        out.push(',');
        out.push_str(alpha);
    }
    out.push(')');
    Some(out)
}

/// Integer prefix of a decimal string (`"50.5"` -> 50)
fn parse_int(digits: &str) -> f64 {
    digits
        .split('.')
        .next()
        .and_then(|whole| whole.parse::<u32>().ok())
        .map_or(0.0, f64::from)
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_expansion() {
        assert_eq!(hex_to_rgb("#FFF").as_deref(), Some("rgb(255,255,255)"));
        assert_eq!(hex_to_rgb("#ff8000").as_deref(), Some("rgb(255,128,0)"));
        assert_eq!(hex_to_rgb("#12"), None);
        assert!(!is_hex("fff"));
    }

    #[test]
    fn test_hsl_conversion() {
        assert_eq!(hsl_to_rgb("hsl(0, 100%, 50%)").as_deref(), Some("rgb(255,0,0)"));
        assert_eq!(hsl_to_rgb("hsl(0, 0%, 50%)").as_deref(), Some("rgb(127.5,127.5,127.5)"));
        assert_eq!(
            hsl_to_rgb("hsla(0, 0%, 100%, 0.5)").as_deref(),
            Some("rgba(255,255,255,0.5)")
        );
    }

    #[test]
    fn test_color_detection() {
        assert!(is_color("#abc"));
        assert!(is_color("rgba(0,0,0,0.2)"));
        assert!(is_color("hsl(10, 20%, 30%)"));
        assert!(is_color("Orange"));
        assert!(!is_color("10px"));
        assert!(!is_color("translate"));
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb("rgb(1,2,3)").as_deref(), Some("rgb(1,2,3)"));
        assert_eq!(color_to_rgb("blue").as_deref(), Some("rgb(0,0,255)"));
        assert_eq!(color_to_rgb("hsl(bogus)").as_deref(), Some("hsl(bogus)"));
        assert_eq!(color_to_rgb("42"), None);
    }
}
