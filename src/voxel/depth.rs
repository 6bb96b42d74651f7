//! Color -> depth mapping

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::core::error::Error;

/// Which color quantity drives the Z offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthMode {
    Red,
    Green,
    Blue,
    #[default]
    Brightness,
    Saturation,
    Hue,
}

impl DepthMode {
    pub const ALL: [DepthMode; 6] = [
        DepthMode::Brightness,
        DepthMode::Red,
        DepthMode::Green,
        DepthMode::Blue,
        DepthMode::Saturation,
        DepthMode::Hue,
    ];

    /// The driving quantity for `color`, in 0.0-255.0
    pub fn channel_value(&self, color: Rgb) -> f32 {
        match self {
            DepthMode::Red => color.r as f32,
            DepthMode::Green => color.g as f32,
            DepthMode::Blue => color.b as f32,
            DepthMode::Brightness => color.brightness(),
            DepthMode::Saturation => color.to_hsb().1,
            DepthMode::Hue => color.to_hsb().0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DepthMode::Red => "red",
            DepthMode::Green => "green",
            DepthMode::Blue => "blue",
            DepthMode::Brightness => "brightness",
            DepthMode::Saturation => "saturation",
            DepthMode::Hue => "hue",
        }
    }
}

impl fmt::Display for DepthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DepthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DepthMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| Error::InvalidDepthMode(s.to_string()))
    }
}

/// Depth mapping parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthParams {
    pub mode: DepthMode,
    /// Maximum absolute Z offset
    pub scale: f32,
    /// Flip so darker values come toward the viewer
    pub invert: bool,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            mode: DepthMode::Brightness,
            scale: 50.0,
            invert: false,
        }
    }
}

impl DepthParams {
    pub fn new(mode: DepthMode, scale: f32, invert: bool) -> Self {
        Self { mode, scale, invert }
    }
}

/// Z offset for a color.
///
/// The channel value is mapped linearly from [0, 255] onto
/// [scale, -scale], or onto [-scale, scale] when inverted.
pub fn depth(color: Rgb, params: &DepthParams) -> f32 {
    let t = params.mode.channel_value(color) / 255.0;
    let (from, to) = if params.invert {
        (-params.scale, params.scale)
    } else {
        (params.scale, -params.scale)
    };
    from + (to - from) * t
}
