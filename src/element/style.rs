use egui::Color32;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

pub const MIN_BLOCK_SIZE: u32 = 2;
pub const MAX_BLOCK_SIZE: u32 = 128;
pub const MIN_ALPHA: f32 = 0.1;
pub const MAX_ALPHA: f32 = 1.0;
pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 200;

/// How a redaction object alters the pixels under it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    Pixelate,
    Fill,
    Mark,
}

impl RedactionMode {
    pub const ALL: [RedactionMode; 3] = [RedactionMode::Pixelate, RedactionMode::Fill, RedactionMode::Mark];

    pub fn label(self) -> &'static str {
        match self {
            RedactionMode::Pixelate => "Pixelate",
            RedactionMode::Fill => "Fill",
            RedactionMode::Mark => "Mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelateParams {
    #[serde(deserialize_with = "deserialize_rounded")]
    pub block_size: u32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkParams {
    pub stroke_color: String,
    #[serde(deserialize_with = "deserialize_rounded")]
    pub stroke_width: u32,
}

/// Style attached to every redaction object.
///
/// All three parameter sets are kept so switching `mode` back and forth does not
/// lose the user's settings; only the one selected by `mode` is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParams {
    pub mode: RedactionMode,
    pub pixelate: PixelateParams,
    pub fill: FillParams,
    #[serde(default = "default_mark")]
    pub mark: MarkParams,
    /// Stroke width of line shapes in fill mode
    #[serde(deserialize_with = "deserialize_rounded")]
    pub line_width: u32,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            mode: RedactionMode::Pixelate,
            pixelate: PixelateParams {
                block_size: 12,
                alpha: 0.9,
            },
            fill: FillParams {
                color: "#000000".to_owned(),
            },
            mark: MarkParams {
                stroke_color: "#ff3b30".to_owned(),
                stroke_width: 4,
            },
            line_width: 24,
        }
    }
}

impl StyleParams {
    /// Returns a copy with every parameter forced into its valid range.
    /// Invalid colours fall back to the defaults.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        Self {
            mode: self.mode,
            pixelate: PixelateParams {
                block_size: clamp_block_size(self.pixelate.block_size),
                alpha: clamp_alpha(self.pixelate.alpha),
            },
            fill: FillParams {
                color: valid_hex_or(&self.fill.color, &defaults.fill.color),
            },
            mark: MarkParams {
                stroke_color: valid_hex_or(&self.mark.stroke_color, &defaults.mark.stroke_color),
                stroke_width: self.mark.stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            },
            line_width: self.line_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
        }
    }

    pub fn fill_color(&self) -> Color32 {
        parse_hex_color(&self.fill.color).unwrap_or(Color32::BLACK)
    }

    pub fn mark_color(&self) -> Color32 {
        parse_hex_color(&self.mark.stroke_color).unwrap_or(Color32::RED)
    }
}

pub fn clamp_block_size(block_size: u32) -> u32 {
    block_size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)
}

pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return MAX_ALPHA;
    }
    alpha.clamp(MIN_ALPHA, MAX_ALPHA)
}

/// Parses `#rrggbb` into an opaque colour
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

pub fn to_hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn default_mark() -> MarkParams {
    StyleParams::default().mark
}

/// Accepts any finite JSON number for integer parameters and rounds it
fn deserialize_rounded<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom("expected a finite number"));
    }
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn valid_hex_or(value: &str, fallback: &str) -> String {
    if parse_hex_color(value).is_some() {
        value.to_owned()
    } else {
        fallback.to_owned()
    }
}
