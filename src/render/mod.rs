//! Rendering seam: per-frame voxel data handed to an external renderer

pub mod frame;

pub use frame::{instance_bytes, Frame, Renderer, VoxelInstance, SELECTION_HIGHLIGHT};
