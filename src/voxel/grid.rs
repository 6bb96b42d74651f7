//! Voxel grid: owns the live voxel set and regenerates it from an image.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::color::Rgb;
use crate::source::PixelSource;
use crate::voxel::depth::{depth, DepthParams};
use crate::voxel::grid_key::{CellKey, GridParams};
use crate::voxel::overrides::CellOverrides;
use crate::voxel::voxel::Voxel;

/// Parameters for one regeneration pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerateOptions {
    pub depth: DepthParams,
    /// Chance (0-100) that a cell is skipped
    pub reduce_percent: f32,
    /// Emit a full column per cell instead of a single voxel
    pub extrude: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            depth: DepthParams::default(),
            reduce_percent: 0.0,
            extrude: false,
        }
    }
}

/// Owned copy of the voxel set plus the grid it was laid out on.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSnapshot {
    pub params: GridParams,
    pub voxels: Vec<Voxel>,
}

/// Z values of an extruded column: every `step` from 0 toward `end`,
/// inclusive of `end` when it lands on a step.
pub fn column_depths(end: f32, step: f32) -> Vec<f32> {
    if step <= 0.0 || !end.is_finite() {
        return vec![end];
    }
    let dir = if end > 0.0 { 1.0 } else { -1.0 };
    let steps = (end.abs() / step + 1e-4).floor() as usize;
    (0..=steps).map(|i| dir * i as f32 * step).collect()
}

/// Build voxels for every non-deleted cell in row-major order.
pub fn generate_voxels<R: Rng + ?Sized>(
    source: &dyn PixelSource,
    params: &GridParams,
    options: &GenerateOptions,
    overrides: &CellOverrides,
    rng: &mut R,
) -> Vec<Voxel> {
    let mut voxels = Vec::with_capacity(params.cell_count());
    let reduce = options.reduce_percent.clamp(0.0, 100.0);

    for cell in params.cells() {
        if overrides.is_deleted(cell) {
            continue;
        }
        if reduce > 0.0 && rng.gen_range(0.0f32..100.0) < reduce {
            continue;
        }

        let color = overrides.color(cell).unwrap_or_else(|| {
            source.sample(
                (cell.x as f32 * params.cell_size) as i64,
                (cell.y as f32 * params.cell_size) as i64,
            )
        });
        let z = depth(color, &options.depth);

        if options.extrude {
            for layer_z in column_depths(z, params.cell_size) {
                voxels.push(Voxel::new(cell, params, layer_z, color));
            }
        } else {
            voxels.push(Voxel::new(cell, params, z, color));
        }
    }

    voxels
}

/// The live voxel set with its overrides.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    params: GridParams,
    voxels: Vec<Voxel>,
    overrides: CellOverrides,
}

impl VoxelGrid {
    /// Empty grid laid out with `params`
    pub fn new(params: GridParams) -> Self {
        Self {
            params,
            voxels: Vec::new(),
            overrides: CellOverrides::new(),
        }
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Change the layout. Existing voxels keep stale positions until the
    /// next regeneration.
    pub fn set_params(&mut self, params: GridParams) {
        self.params = params;
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn overrides(&self) -> &CellOverrides {
        &self.overrides
    }

    /// Drop every override (new image).
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    /// First voxel of a cell
    pub fn voxel_at(&self, cell: CellKey) -> Option<&Voxel> {
        self.voxels.iter().find(|v| v.cell == cell)
    }

    /// Replace the live set from `source`. No source leaves the grid empty.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        source: Option<&dyn PixelSource>,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> usize {
        self.voxels = match source {
            Some(source) => generate_voxels(source, &self.params, options, &self.overrides, rng),
            None => {
                log::debug!("Regenerate skipped: no image loaded");
                Vec::new()
            }
        };
        self.voxels.len()
    }

    /// Delete every voxel in `cells` and mark the cells deleted.
    /// Returns the number of voxels removed.
    pub fn remove_cells(&mut self, cells: &HashSet<CellKey>) -> usize {
        for &cell in cells {
            self.overrides.mark_deleted(cell);
        }
        let before = self.voxels.len();
        self.voxels.retain(|v| !cells.contains(&v.cell));
        before - self.voxels.len()
    }

    /// Set color overrides for many cells and recolor their live voxels in
    /// one pass.
    pub fn recolor_cells(&mut self, colors: &HashMap<CellKey, Rgb>) {
        for (&cell, &color) in colors {
            self.overrides.set_color(cell, color);
        }
        for voxel in &mut self.voxels {
            if let Some(&color) = colors.get(&voxel.cell) {
                voxel.color = color;
            }
        }
    }

    /// Recompute Z of every live voxel from its current color.
    /// Extruded columns are rebuilt to the new depth.
    pub fn recompute_depths(&mut self, params: &DepthParams, extrude: bool) {
        if !extrude {
            for voxel in &mut self.voxels {
                voxel.z = depth(voxel.color, params);
            }
            return;
        }

        let mut seen = HashSet::new();
        let mut rebuilt = Vec::with_capacity(self.voxels.len());
        for voxel in &self.voxels {
            if !seen.insert(voxel.cell) {
                continue;
            }
            let z = depth(voxel.color, params);
            for layer_z in column_depths(z, self.params.cell_size) {
                rebuilt.push(Voxel { z: layer_z, ..*voxel });
            }
        }
        self.voxels = rebuilt;
    }

    /// Owned copy of the current state for the history stacks
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            params: self.params,
            voxels: self.voxels.clone(),
        }
    }

    /// Restore a snapshot and rebuild the overrides from it.
    pub fn restore(&mut self, snapshot: GridSnapshot) {
        self.params = snapshot.params;
        self.voxels = snapshot.voxels;
        self.overrides.rebuild_from(&self.voxels);
    }

    /// True when no two voxels share a cell
    pub fn has_unique_cells(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.voxels.len());
        self.voxels.iter().all(|v| seen.insert(v.cell))
    }
}
