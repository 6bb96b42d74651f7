//! Editor configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::voxel::depth::DepthParams;
use crate::voxel::grid_key::{is_valid_cell_size, MIN_CELL_SIZE};

/// Settings that drive voxel generation and editing.
///
/// Every field has a default so partial JSON files load cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Edge length of one grid cell, in source pixels.
    pub cell_size: f32,
    /// Depth mapping (channel, scale, inversion).
    pub depth: DepthParams,
    /// Percentage (0-100) of cells randomly dropped on regeneration.
    pub reduce_percent: f32,
    /// Color distance used by selection and background removal.
    pub color_threshold: f32,
    /// Canvas the image is fitted into before sampling.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Seed for the thinning RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Emit full columns from z = 0 to the computed depth.
    pub extrude: bool,
    /// Maximum number of undo snapshots kept. `None` = unbounded.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            depth: DepthParams::default(),
            reduce_percent: 0.0,
            color_threshold: 30.0,
            canvas_width: 800,
            canvas_height: 600,
            seed: None,
            extrude: false,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    /// Load a config from a JSON file. The result is validated.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Reject settings an image cannot be laid out with.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_cell_size(self.cell_size) {
            return Err(Error::InvalidConfig(format!(
                "cell_size must be a finite number >= {}, got {}",
                MIN_CELL_SIZE, self.cell_size
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    /// Write this config as pretty JSON.
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Largest image size that fits the canvas with padding.
    pub fn fit_bounds(&self) -> (f32, f32) {
        (self.canvas_width as f32 * 0.8, self.canvas_height as f32 * 0.8)
    }
}
