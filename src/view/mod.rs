//! Named camera views

pub mod store;

pub use store::{CameraView, ViewStore};
