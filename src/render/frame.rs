//! Frame data for drawing the voxel set

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::voxel::voxel::Voxel;

/// Color given to selected voxels
pub const SELECTION_HIGHLIGHT: [f32; 3] = [1.0, 1.0, 0.0];

/// Something that can draw a frame (GPU backend, software rasterizer, test
/// recorder...).
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Everything needed to draw one frame. Borrowed from the session, so a
/// renderer can never mutate editor state.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub voxels: &'a [Voxel],
    pub selection: &'a [Voxel],
    /// Camera transform (pan, zoom, rotation)
    pub camera: Mat4,
    /// Cube edge length
    pub cube_size: f32,
}

/// Per-voxel instance data (must match shader struct exactly)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VoxelInstance {
    /// Model matrix: camera * translate(center) * scale(cube_size)
    pub model: [[f32; 4]; 4],
    /// Linear RGB in 0..1, alpha 1
    pub color: [f32; 4],
}

impl<'a> Frame<'a> {
    pub fn is_selected(&self, voxel: &Voxel) -> bool {
        self.selection.iter().any(|s| s.cell == voxel.cell)
    }

    /// Instance data for every voxel, selected ones highlighted.
    pub fn instances(&self) -> Vec<VoxelInstance> {
        self.voxels
            .iter()
            .map(|voxel| {
                let model = self.camera
                    * Mat4::from_translation(voxel.center())
                    * Mat4::from_scale(Vec3::splat(self.cube_size));
                let [r, g, b] = if self.is_selected(voxel) {
                    SELECTION_HIGHLIGHT
                } else {
                    voxel.color.to_unit()
                };
                VoxelInstance {
                    model: model.to_cols_array_2d(),
                    color: [r, g, b, 1.0],
                }
            })
            .collect()
    }
}

/// Raw bytes of an instance slice for upload into a vertex buffer
pub fn instance_bytes(instances: &[VoxelInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
