//! Per-cell override maps layered over fresh image sampling.

use std::collections::HashMap;

use crate::color::Rgb;
use crate::voxel::grid_key::CellKey;
use crate::voxel::voxel::Voxel;

/// Edit state of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Excluded from regeneration
    Deleted,
    /// Present after a manual edit or a history restore
    Active,
}

/// Sparse cell-state and cell-color overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellOverrides {
    /// Cell key -> edit state
    states: HashMap<CellKey, CellState>,
    /// Cell key -> color used instead of sampling
    colors: HashMap<CellKey, Rgb>,
}

impl CellOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, cell: CellKey) -> Option<CellState> {
        self.states.get(&cell).copied()
    }

    pub fn is_deleted(&self, cell: CellKey) -> bool {
        self.state(cell) == Some(CellState::Deleted)
    }

    pub fn mark_deleted(&mut self, cell: CellKey) {
        self.states.insert(cell, CellState::Deleted);
    }

    pub fn mark_active(&mut self, cell: CellKey) {
        self.states.insert(cell, CellState::Active);
    }

    pub fn color(&self, cell: CellKey) -> Option<Rgb> {
        self.colors.get(&cell).copied()
    }

    pub fn set_color(&mut self, cell: CellKey, color: Rgb) {
        self.colors.insert(cell, color);
    }

    /// Number of deleted cells
    pub fn deleted_count(&self) -> usize {
        self.states.values().filter(|s| **s == CellState::Deleted).count()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.colors.clear();
    }

    /// Replace both maps with the state implied by `voxels`.
    ///
    /// Every present cell becomes `Active` with its current color. Cells not
    /// present end up with no entry, so they are not deleted.
    pub fn rebuild_from(&mut self, voxels: &[Voxel]) {
        self.clear();
        for voxel in voxels {
            self.states.insert(voxel.cell, CellState::Active);
            self.colors.insert(voxel.cell, voxel.color);
        }
    }
}
