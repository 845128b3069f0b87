use std::ops::Index;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const PALETTE_STEPS: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

const WHITE: &str = "#ffffff";
const BLACK: &str = "#000000";

// Blend weight toward white (light steps) or black (dark steps); 500 is the base.
const LIGHT_WEIGHTS: [(u16, f64); 5] = [
    (50, 0.95),
    (100, 0.90),
    (200, 0.75),
    (300, 0.60),
    (400, 0.30),
];
const DARK_WEIGHTS: [(u16, f64); 4] = [(600, 0.10), (700, 0.25), (800, 0.40), (900, 0.60)];

// (dark step, light step it takes its shade from)
const DARK_STEP_SOURCES: [(u16, u16); 10] = [
    (50, 900),
    (100, 800),
    (200, 700),
    (300, 600),
    (400, 500),
    (500, 400),
    (600, 300),
    (700, 200),
    (800, 100),
    (900, 50),
];

/// Ten-step color ramp keyed by `PALETTE_STEPS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    shades: [String; 10],
}

impl ColorPalette {
    pub fn get(&self, step: u16) -> Option<&str> {
        step_index(step).map(|idx| self.shades[idx].as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        PALETTE_STEPS
            .iter()
            .copied()
            .zip(self.shades.iter().map(String::as_str))
    }

    fn from_fn(mut shade: impl FnMut(u16) -> String) -> Self {
        Self {
            shades: PALETTE_STEPS.map(|step| shade(step)),
        }
    }
}

/// # Panics
///
/// Panics when `step` is not one of [`PALETTE_STEPS`]; use
/// [`ColorPalette::get`] for untrusted steps.
impl Index<u16> for ColorPalette {
    type Output = str;

    fn index(&self, step: u16) -> &str {
        match self.get(step) {
            Some(shade) => shade,
            None => panic!("{step} is not a palette step"),
        }
    }
}

impl Serialize for ColorPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PALETTE_STEPS.len()))?;
        for (step, shade) in self.iter() {
            map.serialize_entry(&step.to_string(), shade)?;
        }
        map.end()
    }
}

fn step_index(step: u16) -> Option<usize> {
    PALETTE_STEPS.iter().position(|candidate| *candidate == step)
}

/// Parses `#rrggbb` or `rrggbb` into channels.
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let digits = color.trim().strip_prefix('#').unwrap_or(color.trim());
    if digits.len() != 6 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some([bytes[0], bytes[1], bytes[2]])
}

pub fn to_hex(channels: [u8; 3]) -> String {
    format!("#{}", hex::encode(channels))
}

/// Linear per-channel mix of `color1` toward `color2` by `weight`.
///
/// Returns `color1` unchanged when either color is not a six-digit hex.
pub fn blend(color1: &str, color2: &str, weight: f64) -> String {
    let (Some(from), Some(to)) = (parse_hex(color1), parse_hex(color2)) else {
        return color1.to_string();
    };
    let mix = |left: u8, right: u8| -> u8 {
        (f64::from(left) * (1.0 - weight) + f64::from(right) * weight).round() as u8
    };
    to_hex([
        mix(from[0], to[0]),
        mix(from[1], to[1]),
        mix(from[2], to[2]),
    ])
}

pub fn generate_palette(base_color: &str) -> ColorPalette {
    ColorPalette::from_fn(|step| {
        if let Some((_, weight)) = LIGHT_WEIGHTS.iter().find(|(light, _)| *light == step) {
            return blend(base_color, WHITE, *weight);
        }
        if let Some((_, weight)) = DARK_WEIGHTS.iter().find(|(dark, _)| *dark == step) {
            return blend(base_color, BLACK, *weight);
        }
        base_color.to_string()
    })
}

/// The light ramp reversed, so dark themes reuse the same shades.
pub fn generate_dark_palette(base_color: &str) -> ColorPalette {
    let light = generate_palette(base_color);
    ColorPalette::from_fn(|step| {
        DARK_STEP_SOURCES
            .iter()
            .find(|(dark, _)| *dark == step)
            .and_then(|(_, source)| light.get(*source))
            .unwrap_or(base_color)
            .to_string()
    })
}
