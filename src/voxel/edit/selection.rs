//! Color-similarity selection

use std::collections::HashSet;

use crate::color::Rgb;
use crate::voxel::grid_key::CellKey;
use crate::voxel::voxel::Voxel;

/// Voxels whose color lies within `threshold` of `reference` (inclusive).
pub fn select(voxels: &[Voxel], reference: Rgb, threshold: f32) -> Vec<Voxel> {
    voxels
        .iter()
        .filter(|v| v.color.distance(reference) <= threshold)
        .copied()
        .collect()
}

/// Derived selection state.
///
/// `members` is never edited directly: it is recomputed from the reference
/// color and threshold whenever either, or the voxel set, changes.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    reference: Option<Rgb>,
    threshold: f32,
    members: Vec<Voxel>,
}

impl Selection {
    pub fn new(threshold: f32) -> Self {
        Self {
            reference: None,
            threshold,
            members: Vec::new(),
        }
    }

    pub fn reference(&self) -> Option<Rgb> {
        self.reference
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn members(&self) -> &[Voxel] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, cell: CellKey) -> bool {
        self.members.iter().any(|v| v.cell == cell)
    }

    /// Distinct cells of the members
    pub fn cells(&self) -> HashSet<CellKey> {
        self.members.iter().map(|v| v.cell).collect()
    }

    pub fn set_reference(&mut self, reference: Rgb, voxels: &[Voxel]) {
        self.reference = Some(reference);
        self.refresh(voxels);
    }

    pub fn set_threshold(&mut self, threshold: f32, voxels: &[Voxel]) {
        self.threshold = threshold;
        self.refresh(voxels);
    }

    /// Drop the reference color and empty the selection
    pub fn clear(&mut self) {
        self.reference = None;
        self.members.clear();
    }

    /// Recompute members against the current voxel set
    pub fn refresh(&mut self, voxels: &[Voxel]) {
        self.members = match self.reference {
            Some(reference) => select(voxels, reference, self.threshold),
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::grid_key::GridParams;

    fn voxels(colors: &[Rgb]) -> Vec<Voxel> {
        let grid = GridParams::new(colors.len() as u32, 1, 1.0);
        colors
            .iter()
            .enumerate()
            .map(|(i, &c)| Voxel::new(CellKey::new(i as i32, 0), &grid, 0.0, c))
            .collect()
    }

    #[test]
    fn test_select_threshold() {
        let set = voxels(&[Rgb::new(105, 102, 98), Rgb::new(120, 100, 100)]);
        let picked = select(&set, Rgb::new(100, 100, 100), 10.0);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].color, Rgb::new(105, 102, 98));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let set = voxels(&[Rgb::new(120, 100, 100)]);
        assert_eq!(select(&set, Rgb::new(100, 100, 100), 20.0).len(), 1);
    }

    #[test]
    fn test_no_reference_is_empty() {
        let set = voxels(&[Rgb::BLACK, Rgb::WHITE]);
        let mut selection = Selection::new(1000.0);
        selection.refresh(&set);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_threshold_change_recomputes() {
        let set = voxels(&[
            Rgb::new(100, 100, 100),
            Rgb::new(110, 100, 100),
            Rgb::new(140, 100, 100),
        ]);
        let mut selection = Selection::new(5.0);

        selection.set_reference(Rgb::new(100, 100, 100), &set);
        assert_eq!(selection.len(), 1);

        selection.set_threshold(15.0, &set);
        assert_eq!(selection.len(), 2);
        assert!(selection.contains(CellKey::new(1, 0)));
        assert!(!selection.contains(CellKey::new(2, 0)));
    }

    #[test]
    fn test_refresh_tracks_voxel_set() {
        let mut set = voxels(&[Rgb::BLACK, Rgb::BLACK, Rgb::WHITE]);
        let mut selection = Selection::new(0.0);
        selection.set_reference(Rgb::BLACK, &set);
        assert_eq!(selection.len(), 2);

        set[0].color = Rgb::WHITE;
        selection.refresh(&set);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_clear() {
        let set = voxels(&[Rgb::BLACK]);
        let mut selection = Selection::new(0.0);
        selection.set_reference(Rgb::BLACK, &set);
        selection.clear();
        assert!(selection.reference().is_none());
        assert!(selection.is_empty());
    }
}
