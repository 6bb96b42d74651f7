//! Voxel data structures and generation

pub mod voxel;
pub mod grid_key;
pub mod depth;
pub mod overrides;
pub mod grid;
pub mod edit;

pub use voxel::Voxel;
pub use grid_key::{CellKey, GridParams};
pub use depth::{depth, DepthMode, DepthParams};
pub use overrides::{CellOverrides, CellState};
pub use grid::{generate_voxels, GenerateOptions, GridSnapshot, VoxelGrid};
