//! Editing session tying generation, edits and history together

pub mod session;

pub use session::VoxelEditorSession;
