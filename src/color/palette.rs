//! Color palettes for recoloring voxels

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::rgb::Rgb;
use crate::core::error::Error;

/// Ordered list of colors, darkest-mapped first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }

    /// Build from hex strings, failing on the first bad entry
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self, Error> {
        hexes
            .iter()
            .map(|h| Rgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Palette color for item `index` of `count` items sorted by brightness.
    ///
    /// Index is linearly mapped and rounded down, so the first item gets the
    /// first color and the last item gets the last color. Returns `None`
    /// for an empty palette.
    pub fn color_for(&self, index: usize, count: usize) -> Option<Rgb> {
        let last = self.0.len().checked_sub(1)?;
        if count <= 1 {
            return self.0.first().copied();
        }
        let t = index as f64 / (count - 1) as f64;
        let slot = ((t * last as f64).floor() as usize).min(last);
        Some(self.0[slot])
    }

    /// Look up a built-in palette by name
    pub fn preset(name: &str) -> Option<Self> {
        let hexes: &[&str] = match name.to_ascii_lowercase().as_str() {
            "pastel" => &PASTEL,
            "neon" => &NEON,
            "earth" => &EARTH,
            "ocean" => &OCEAN,
            _ => return None,
        };
        Self::from_hex(hexes).ok()
    }

    /// The swatch themes offered next to the named presets
    pub fn themes() -> Vec<Self> {
        THEMES
            .iter()
            .filter_map(|&hexes| Self::from_hex(hexes).ok())
            .collect()
    }
}

impl FromStr for Palette {
    type Err = Error;

    /// A preset name, or a comma-separated list of hex colors
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(preset) = Self::preset(s.trim()) {
            return Ok(preset);
        }
        let hexes: Vec<&str> = s.split(',').map(str::trim).filter(|h| !h.is_empty()).collect();
        if hexes.is_empty() {
            return Err(Error::InvalidColor(s.to_string()));
        }
        Self::from_hex(&hexes)
    }
}

pub const PASTEL: [&str; 5] = ["#fddde6", "#d7c0f6", "#c5f4f0", "#ffe6c9", "#ffd1dc"];
pub const NEON: [&str; 5] = ["#ff00ff", "#00ffff", "#00ff00", "#ffff00", "#ff0000"];
pub const EARTH: [&str; 5] = ["#8B4513", "#556B2F", "#A0522D", "#CD853F", "#6E8B3D"];
pub const OCEAN: [&str; 5] = ["#00008B", "#0000CD", "#4169E1", "#87CEEB", "#ADD8E6"];

const THEMES: [&[&str]; 20] = [
    &["#f5f5f5"],
    &["#dcdce6"],
    &["#b5b5c0"],
    &["#888893"],
    &["#4f4f54"],
    &["#d5c9f5"],
    &["#d6bcf4"],
    &["#fbc8ea"],
    &["#fda6d2"],
    &["#fc85ce"],
    &["#365cf0", "#365cf0", "#365cf0", "#365cf0"],
    &["#ff2cd4", "#ff2cd4", "#ff2cd4", "#ff2cd4"],
    &["#ff8e6c", "#ffc898", "#ffd899", "#f6ffc6"],
    &["#ffe688", "#e6fcb2", "#b6f6d2", "#a8f2e8"],
    &["#ffc8ec", "#b8ebfc", "#c0fccc", "#e9fcb9"],
    &["#b9ff69", "#97fcb6", "#a0fcee", "#a2bbf9"],
    &["#71f6f6", "#5bd1f3", "#8ce7c9", "#c4fdcd"],
    &["#b0fdd9", "#c3f7b7", "#eafcb8", "#fdd6fa"],
    &["#dbc8fd", "#c8cbfd", "#d3d4ff", "#ebc7fb"],
    &["#c3f6b0", "#c7f2d6", "#d9f8e6", "#d6f0fc"],
];
