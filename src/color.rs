//! Per-fragment color assignment.
//!
//! Each fragment gets one hue. [`palette`] turns it into colors for every
//! resource kind; [`HueCursor`] hands out hues, stepping around the color
//! wheel so consecutive fragments are easy to tell apart.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resources::ResourceKind;

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from channels in `[0, 255]`, truncating fractions.
    #[must_use]
    pub fn from_rgb_f64(rgb: [f64; 3]) -> Self {
        Self {
            r: rgb[0] as u8,
            g: rgb[1] as u8,
            b: rgb[2] as u8,
        }
    }

    /// Create a color from HSV (`h` in degrees, `s` and `v` in `[0, 1]`).
    #[must_use]
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        Self::from_rgb_f64(hsv_to_rgb(h, s, v))
    }

    /// Channels as an array.
    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// CSS `rgb(r, g, b)` representation.
    #[must_use]
    pub fn to_style(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Convert HSV to RGB channels scaled to `[0, 255]`.
#[must_use]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let channel = |n: f64| {
        let k = (n + h / 60.0) % 6.0;
        v - v * s * k.min(4.0 - k).min(1.0).max(0.0)
    };
    [channel(5.0) * 255.0, channel(3.0) * 255.0, channel(1.0) * 255.0]
}

/// Colors of every resource kind of one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Reference structure.
    pub reference: Color,
    /// Base waters.
    pub base: Color,
    /// Step waters.
    pub step: Color,
    /// Phosphate waters.
    pub phos: Color,
}

impl Palette {
    /// Color of a resource kind.
    #[must_use]
    pub fn get(&self, kind: ResourceKind) -> Color {
        match kind {
            ResourceKind::Reference => self.reference,
            ResourceKind::Base => self.base,
            ResourceKind::Step => self.step,
            ResourceKind::Phos => self.phos,
        }
    }

    /// Copy with the color of one kind replaced.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, color: Color) -> Self {
        match kind {
            ResourceKind::Reference => self.reference = color,
            ResourceKind::Base => self.base = color,
            ResourceKind::Step => self.step = color,
            ResourceKind::Phos => self.phos = color,
        }
        self
    }
}

/// Derive the palette of a fragment from its hue.
#[must_use]
pub fn palette(hue: f64) -> Palette {
    let base = Color::from_hsv(hue, 1.0, 1.0);
    Palette {
        reference: base,
        base,
        step: Color::from_hsv((hue + 40.0) % 360.0, 0.8, 0.5),
        phos: Color::from_hsv((hue + 80.0) % 360.0, 0.6, 1.0),
    }
}

/// Next hue to hand out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueCursor {
    hue: f64,
    increment: f64,
}

impl HueCursor {
    /// Cursor starting at `start` degrees, advancing by `increment`.
    #[must_use]
    pub fn new(start: f64, increment: f64) -> Self {
        Self {
            hue: start.rem_euclid(360.0),
            increment,
        }
    }

    /// Hue the next new fragment will receive.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.hue
    }

    /// Step to the next hue.
    pub fn advance(&mut self) {
        self.hue = (self.hue + self.increment).rem_euclid(360.0);
    }
}

impl Default for HueCursor {
    fn default() -> Self {
        Self::new(0.0, 95.0)
    }
}

/// Output format of [`ColorInfo`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorFormat {
    /// CSS color strings.
    #[default]
    Style,
    /// `[r, g, b]` arrays in `0..=255`.
    Rgb,
}

/// One exported color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// CSS color string.
    Style(String),
    /// RGB triplet.
    Rgb([u8; 3]),
}

impl ColorValue {
    fn new(color: Color, format: ColorFormat) -> Self {
        match format {
            ColorFormat::Style => Self::Style(color.to_style()),
            ColorFormat::Rgb => Self::Rgb(color.to_rgb()),
        }
    }
}

/// Colors of a fragment, as exported to embedding code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    /// Reference structure.
    pub reference: ColorValue,
    /// Base waters.
    pub base: ColorValue,
    /// Phosphate waters.
    pub phos: ColorValue,
    /// Step waters.
    pub step: ColorValue,
}

impl ColorInfo {
    /// Export the colors of `palette`.
    #[must_use]
    pub fn new(palette: &Palette, format: ColorFormat) -> Self {
        Self {
            reference: ColorValue::new(palette.reference, format),
            base: ColorValue::new(palette.base, format),
            phos: ColorValue::new(palette.phos, format),
            step: ColorValue::new(palette.step, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0), Color::new(255, 0, 0));
        assert_eq!(Color::from_hsv(120.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(Color::from_hsv(240.0, 1.0, 1.0), Color::new(0, 0, 255));
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_eq!(Color::from_hsv(200.0, 0.0, 0.5), Color::new(127, 127, 127));
    }

    #[test]
    fn palette_offsets_hues() {
        let p = palette(0.0);
        assert_eq!(p.reference, p.base);
        assert_eq!(p.base, Color::new(255, 0, 0));
        // hue 40, s 0.8, v 0.5
        assert_eq!(p.step, Color::new(127, 93, 25));
        // hue 80 is yellow-green: green saturates
        assert_eq!(p.phos.g, 255);
    }

    #[test]
    fn palette_is_deterministic() {
        assert_eq!(palette(190.0), palette(190.0));
        assert_ne!(palette(0.0), palette(95.0));
    }

    #[test]
    fn hue_cursor_wraps() {
        let mut cursor = HueCursor::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(cursor.current());
            cursor.advance();
        }
        assert_eq!(seen, vec![0.0, 95.0, 190.0, 285.0, 20.0]);
    }

    #[test]
    fn color_info_formats() {
        let p = palette(0.0);
        let style = ColorInfo::new(&p, ColorFormat::Style);
        assert_eq!(style.base, ColorValue::Style("rgb(255, 0, 0)".to_owned()));
        assert_eq!(style.reference, style.base);
        let rgb = ColorInfo::new(&p, ColorFormat::Rgb);
        assert_eq!(rgb.step, ColorValue::Rgb([127, 93, 25]));
        assert_eq!(
            serde_json::to_string(&rgb.base).unwrap(),
            "[255,0,0]"
        );
    }

    #[test]
    fn palette_override_touches_one_kind() {
        let p = palette(0.0);
        let q = p.with(ResourceKind::Reference, Color::new(1, 2, 3));
        assert_eq!(q.reference, Color::new(1, 2, 3));
        assert_eq!(q.base, p.base);
        let info = ColorInfo::new(&q, ColorFormat::Rgb);
        assert_eq!(info.reference, ColorValue::Rgb([1, 2, 3]));
    }
}
