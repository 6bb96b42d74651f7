//! Dominant-color background detection.

use std::collections::{HashMap, HashSet};

use crate::color::Rgb;
use crate::voxel::grid_key::CellKey;
use crate::voxel::voxel::Voxel;

/// Most frequent voxel color and its count.
///
/// Ties go to the color seen first in voxel order.
pub fn dominant_color(voxels: &[Voxel]) -> Option<(Rgb, usize)> {
    // color -> (count, first index)
    let mut counts: HashMap<Rgb, (usize, usize)> = HashMap::new();
    for (i, voxel) in voxels.iter().enumerate() {
        counts.entry(voxel.color).or_insert((0, i)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(color, (count, _))| (color, count))
}

/// Result of background detection
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundMatch {
    pub color: Rgb,
    /// Voxels that share the dominant color
    pub frequency: usize,
    /// Cells within the threshold of the dominant color
    pub cells: HashSet<CellKey>,
}

/// Cells whose color lies within `threshold` of the dominant color.
pub fn background_cells(voxels: &[Voxel], threshold: f32) -> Option<BackgroundMatch> {
    let (color, frequency) = dominant_color(voxels)?;
    let cells = voxels
        .iter()
        .filter(|v| v.color.distance(color) <= threshold)
        .map(|v| v.cell)
        .collect();

    Some(BackgroundMatch {
        color,
        frequency,
        cells,
    })
}
