//! Error types for pixvox

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid depth mode: {0}")]
    InvalidDepthMode(String),

    #[error("Invalid export format: {0}")]
    InvalidExportFormat(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid view data: {0}")]
    InvalidView(String),

    #[error("Nothing to export: the voxel set is empty")]
    EmptyExport,
}
