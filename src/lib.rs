//! Pixvox - turn raster images into editable voxel sculptures
//!
//! An image is sampled on a regular grid; every cell becomes a cube whose
//! depth is derived from its color. The [`editor::VoxelEditorSession`] owns
//! the result and offers color selection, deletion, palette recoloring,
//! background removal and depth recalculation, all with undo/redo.

pub mod core;
pub mod color;
pub mod source;
pub mod voxel;
pub mod editor;
pub mod render;
pub mod export;
pub mod view;
