//! Color parsing and contrast helpers.
//!
//! Accepts the color notations authored content uses (`#rgb`, `#rrggbb`,
//! `rgb(r, g, b)`, `rgba(r, g, b, a)` and a few named colors) and picks
//! readable text colors using WCAG 2.x relative luminance.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum contrast ratio for WCAG AA body text.
pub const WCAG_CONTRAST_THRESHOLD_AA: f64 = 4.5;

/// Color used when an authored color cannot be parsed.
pub const FALLBACK_COLOR: Rgb = Rgb::new(128, 128, 128);

pub const CONTRAST_COLOR_DARK: Rgb = Rgb::new(0, 0, 0);
pub const CONTRAST_COLOR_LIGHT: Rgb = Rgb::new(255, 255, 255);

/// Lightness steps tried by [`accessible_contrast_color`] before giving up.
pub const TINT_ATTEMPTS: u32 = 20;

/// HSL lightness change per step.
pub const TINT_STEP: f64 = 0.1;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color, falling back to [`FALLBACK_COLOR`] with a warning.
    pub fn parse_or_fallback(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            tracing::warn!(color = value, error = %err, "invalid color, using fallback");
            FALLBACK_COLOR
        })
    }

    /// YIQ brightness below 128 counts as dark.
    pub fn is_dark(self) -> bool {
        let yiq = (u32::from(self.r) * 2126 + u32::from(self.g) * 7152 + u32::from(self.b) * 722)
            / 10_000;
        yiq < 128
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(self) -> f64 {
        fn channel(value: u8) -> f64 {
            let c = f64::from(value) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio in `[1, 21]`.
    pub fn contrast(self, other: Rgb) -> f64 {
        let a = self.luminance();
        let b = other.luminance();
        let (light, dark) = if a > b { (a, b) } else { (b, a) };
        (light + 0.05) / (dark + 0.05)
    }

    /// Scales HSL lightness by `1 + amount`.
    pub fn lighten(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l * (1.0 + amount)).clamp(0.0, 1.0))
    }

    /// Scales HSL lightness by `1 - amount`.
    pub fn darken(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l * (1.0 - amount)).clamp(0.0, 1.0))
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);
        let delta = max - min;
        if delta == 0.0 {
            return (0.0, 0.0, l);
        }
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let h = if (max - r).abs() < f64::EPSILON {
            ((g - b) / delta).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        (h * 60.0, s, l)
    }

    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r1), to_u8(g1), to_u8(b1))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim().to_ascii_lowercase();

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).with_context(|| format!("invalid hex color '#{hex}'"));
        }

        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if !(parts.len() == 3 || parts.len() == 4) {
                bail!("expected 3 or 4 components in '{value}'");
            }
            let channel = |part: &str| -> Result<u8> {
                part.parse::<u8>()
                    .with_context(|| format!("invalid channel '{part}' in '{value}'"))
            };
            return Ok(Self::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
            ));
        }

        match value.as_str() {
            "black" => Ok(Self::new(0, 0, 0)),
            "white" => Ok(Self::new(255, 255, 255)),
            "gray" | "grey" => Ok(Self::new(128, 128, 128)),
            "red" => Ok(Self::new(255, 0, 0)),
            "green" => Ok(Self::new(0, 128, 0)),
            "blue" => Ok(Self::new(0, 0, 255)),
            _ => bail!("unknown color '{value}'"),
        }
    }
}

fn parse_hex(hex: &str) -> Result<Rgb> {
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()
        .context("non-hex digit")?;
    match digits.as_slice() {
        [r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] | [r1, r2, g1, g2, b1, b2, _, _] => Ok(Rgb::new(
            r1 * 16 + r2,
            g1 * 16 + g2,
            b1 * 16 + b2,
        )),
        _ => bail!("expected 3, 6 or 8 hex digits"),
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Rgb::parse_or_fallback(&raw))
    }
}

/// Black on light backgrounds, white on dark ones.
pub fn default_contrast_color(base: Rgb) -> Rgb {
    if base.is_dark() {
        CONTRAST_COLOR_LIGHT
    } else {
        CONTRAST_COLOR_DARK
    }
}

/// Finds a tint of `base` that reaches WCAG AA contrast against it.
///
/// Lightens dark bases and darkens light ones in `step` increments, giving up
/// after `max_attempts` and returning white or black instead.
pub fn accessible_contrast_color(base: Rgb, max_attempts: u32, step: f64) -> Rgb {
    let dark = base.is_dark();
    for attempt in 1..=max_attempts {
        let amount = step * f64::from(attempt);
        let candidate = if dark {
            base.lighten(amount)
        } else {
            base.darken(amount)
        };
        if base.contrast(candidate) >= WCAG_CONTRAST_THRESHOLD_AA {
            return candidate;
        }
    }
    default_contrast_color(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notations() {
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
        assert_eq!("#1a2B3c".parse::<Rgb>().unwrap(), Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(
            "rgb(10, 20, 30)".parse::<Rgb>().unwrap(),
            Rgb::new(10, 20, 30)
        );
        assert_eq!(
            "rgba(10,20,30,0.5)".parse::<Rgb>().unwrap(),
            Rgb::new(10, 20, 30)
        );
        assert_eq!("White".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12".parse::<Rgb>().is_err());
        assert!("rgb(300, 0, 0)".parse::<Rgb>().is_err());
        assert!("chartreuse-ish".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_parse_or_fallback() {
        assert_eq!(Rgb::parse_or_fallback("nope"), FALLBACK_COLOR);
    }

    #[test]
    fn test_default_contrast_color() {
        assert_eq!(
            default_contrast_color(Rgb::new(0, 0, 0)),
            CONTRAST_COLOR_LIGHT
        );
        assert_eq!(
            default_contrast_color(Rgb::new(255, 255, 255)),
            CONTRAST_COLOR_DARK
        );
        assert_eq!(
            default_contrast_color(Rgb::new(0x1d, 0x4e, 0xd8)),
            CONTRAST_COLOR_LIGHT
        );
        assert_eq!(
            default_contrast_color(Rgb::new(0xf0, 0xf0, 0xf0)),
            CONTRAST_COLOR_DARK
        );
    }

    #[test]
    fn test_contrast_extremes() {
        let ratio = Rgb::new(0, 0, 0).contrast(Rgb::new(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01);
        let same = Rgb::new(40, 90, 200).contrast(Rgb::new(40, 90, 200));
        assert!((same - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_accessible_contrast_meets_threshold() {
        for base in [
            Rgb::new(0x1d, 0x4e, 0xd8),
            Rgb::new(0xe5, 0xe7, 0xeb),
            Rgb::new(0x33, 0x33, 0x33),
        ] {
            let text = accessible_contrast_color(base, TINT_ATTEMPTS, TINT_STEP);
            assert!(
                base.contrast(text) >= WCAG_CONTRAST_THRESHOLD_AA,
                "{base} -> {text}"
            );
        }
    }

    #[test]
    fn test_accessible_contrast_falls_back() {
        // Mid gray cannot be darkened far enough with a single attempt.
        let text = accessible_contrast_color(Rgb::new(128, 128, 128), 1, 0.1);
        assert_eq!(text, CONTRAST_COLOR_DARK);
    }

    #[test]
    fn test_hsl_round_trip_preserves_color() {
        let color = Rgb::new(0x1d, 0x4e, 0xd8);
        assert_eq!(color.lighten(0.0), color);
    }
}
