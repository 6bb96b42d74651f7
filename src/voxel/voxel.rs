//! Voxel record

use crate::color::Rgb;
use crate::core::types::{Vec2, Vec3};
use crate::voxel::grid_key::{CellKey, GridParams};

/// One cube of the sculpture.
///
/// Identity is the cell; `world` is derived from the cell and the grid
/// parameters it was generated with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    pub cell: CellKey,
    /// Centered X/Y position
    pub world: Vec2,
    /// Depth offset
    pub z: f32,
    pub color: Rgb,
}

impl Voxel {
    /// Voxel at `cell`, positioned on `grid`
    pub fn new(cell: CellKey, grid: &GridParams, z: f32, color: Rgb) -> Self {
        Self {
            cell,
            world: grid.world_of(cell),
            z,
            color,
        }
    }

    /// Cube center in world space
    pub fn center(&self) -> Vec3 {
        self.world.extend(self.z)
    }
}
