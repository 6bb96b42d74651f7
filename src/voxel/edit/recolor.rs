//! Palette application by brightness order.

use std::collections::{HashMap, HashSet};

use crate::color::{Palette, Rgb};
use crate::voxel::grid::VoxelGrid;
use crate::voxel::grid_key::CellKey;

/// Recolor `targets` from `palette`, darkest cell first.
///
/// Cells are sorted by ascending brightness (stable, so equal brightness
/// keeps voxel order) and cell `i` of `n` receives palette slot
/// `floor(i / (n - 1) * (len - 1))`. Colors go both into the override map
/// and onto the live voxels. Returns the number of cells recolored.
pub fn apply_palette(grid: &mut VoxelGrid, targets: &[CellKey], palette: &Palette) -> usize {
    if palette.is_empty() || targets.is_empty() {
        return 0;
    }

    let wanted: HashSet<CellKey> = targets.iter().copied().collect();
    let mut seen = HashSet::with_capacity(wanted.len());
    let mut cells: Vec<(CellKey, Rgb)> = grid
        .voxels()
        .iter()
        .filter(|v| wanted.contains(&v.cell) && seen.insert(v.cell))
        .map(|v| (v.cell, v.color))
        .collect();

    cells.sort_by(|a, b| a.1.brightness().total_cmp(&b.1.brightness()));

    let count = cells.len();
    let assignments: HashMap<CellKey, Rgb> = cells
        .into_iter()
        .enumerate()
        .filter_map(|(i, (cell, _))| palette.color_for(i, count).map(|color| (cell, color)))
        .collect();

    grid.recolor_cells(&assignments);
    count
}
