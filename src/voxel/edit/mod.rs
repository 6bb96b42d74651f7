//! Voxel edit operations.
//!
//! Edits act on whole cells of a [`VoxelGrid`](crate::voxel::VoxelGrid) and
//! are recorded as full snapshots for undo/redo.

pub mod history;
pub mod selection;
pub mod recolor;
pub mod background;

pub use history::EditHistory;
pub use selection::{select, Selection};
pub use recolor::apply_palette;
pub use background::{background_cells, dominant_color, BackgroundMatch};
