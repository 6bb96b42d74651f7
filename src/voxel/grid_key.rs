//! Cell addressing: cell keys and the cell <-> world mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Slack added before flooring so world positions computed from a cell
/// always map back to that cell despite float error.
const CELL_EPSILON: f64 = 1e-4;

/// Smallest cell edge, in source pixels, accepted for laying out an image
pub const MIN_CELL_SIZE: f32 = 1.0;

/// True for cell sizes an image grid can be laid out with
pub fn is_valid_cell_size(size: f32) -> bool {
    size.is_finite() && size >= MIN_CELL_SIZE
}

/// Integer cell coordinate in the sampling grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Grid dimensions and cell size. The grid is centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub cols: u32,
    pub rows: u32,
    /// Edge length of a cell in source pixels (and world units)
    pub cell_size: f32,
}

impl GridParams {
    pub fn new(cols: u32, rows: u32, cell_size: f32) -> Self {
        Self { cols, rows, cell_size }
    }

    /// Grid that covers an image of the given size, at least 1x1 and at
    /// most one cell per pixel along each axis.
    pub fn for_image(width: u32, height: u32, cell_size: f32) -> Self {
        let fit = |extent: u32| {
            let n = (extent as f32 / cell_size).floor();
            if n.is_nan() {
                1
            } else {
                n.clamp(1.0, extent.max(1) as f32) as u32
            }
        };
        Self::new(fit(width), fit(height), cell_size)
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, cell: CellKey) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }

    /// Centered world position of a cell
    pub fn world_of(&self, cell: CellKey) -> Vec2 {
        let half_w = self.cols as f32 * self.cell_size / 2.0;
        let half_h = self.rows as f32 * self.cell_size / 2.0;
        Vec2::new(
            cell.x as f32 * self.cell_size - half_w,
            cell.y as f32 * self.cell_size - half_h,
        )
    }

    /// Cell containing a world position, or `None` outside the grid.
    pub fn cell_of(&self, world: Vec2) -> Option<CellKey> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let size = self.cell_size as f64;
        let half_w = self.cols as f64 * size / 2.0;
        let half_h = self.rows as f64 * size / 2.0;

        let x = ((world.x as f64 + half_w) / size + CELL_EPSILON).floor();
        let y = ((world.y as f64 + half_h) / size + CELL_EPSILON).floor();
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let cell = CellKey::new(x as i32, y as i32);
        self.contains(cell).then_some(cell)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellKey> + use<> {
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        (0..rows).flat_map(move |y| (0..cols).map(move |x| CellKey::new(x, y)))
    }
}
