//! Mesh export of the voxel set.
//!
//! Every voxel becomes an axis-aligned cube of edge `cell_size` centered on
//! the voxel. Writers take any `io::Write`; [`export_to_dir`] handles file
//! naming for the CLI and the session.

pub mod obj;
pub mod ply;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::voxel::voxel::Voxel;

pub use obj::{write_mtl, write_obj, write_obj_with_mtl};
pub use ply::write_ply;

/// Cube corners: bottom ring (-z) then top ring (+z), counter-clockwise
/// starting at (-x, -y).
pub fn cube_vertices(center: Vec3, size: f32) -> [Vec3; 8] {
    let s = size / 2.0;
    let Vec3 { x, y, z } = center;
    [
        Vec3::new(x - s, y - s, z - s),
        Vec3::new(x + s, y - s, z - s),
        Vec3::new(x + s, y + s, z - s),
        Vec3::new(x - s, y + s, z - s),
        Vec3::new(x - s, y - s, z + s),
        Vec3::new(x + s, y - s, z + s),
        Vec3::new(x + s, y + s, z + s),
        Vec3::new(x - s, y + s, z + s),
    ]
}

/// Quad faces over [`cube_vertices`]
pub const CUBE_QUADS: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// Triangulated faces over [`cube_vertices`], two per side
pub const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [5, 4, 7],
    [5, 7, 6],
    [4, 0, 3],
    [4, 3, 7],
    [1, 5, 6],
    [1, 6, 2],
    [0, 4, 5],
    [0, 5, 1],
    [3, 2, 6],
    [3, 6, 7],
];

/// Supported output formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Geometry only, quad faces
    #[default]
    Obj,
    /// Triangulated OBJ plus a material per distinct color
    ObjMtl,
    /// ASCII PLY with per-vertex colors
    Ply,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Obj => "obj",
            ExportFormat::ObjMtl => "obj-mtl",
            ExportFormat::Ply => "ply",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obj" => Ok(ExportFormat::Obj),
            "obj-mtl" | "objmtl" | "mtl" => Ok(ExportFormat::ObjMtl),
            "ply" => Ok(ExportFormat::Ply),
            other => Err(Error::InvalidExportFormat(other.to_string())),
        }
    }
}

/// Write `voxels` into `dir` as `{stem}.obj`, `{stem}.obj` + `{stem}.mtl`,
/// or `{stem}.ply`. Returns the written paths.
pub fn export_to_dir(
    dir: &Path,
    stem: &str,
    format: ExportFormat,
    voxels: &[Voxel],
    cell_size: f32,
) -> Result<Vec<PathBuf>> {
    if voxels.is_empty() {
        return Err(Error::EmptyExport);
    }

    let paths = match format {
        ExportFormat::Obj => {
            let path = dir.join(format!("{stem}.obj"));
            let mut writer = BufWriter::new(File::create(&path)?);
            write_obj(voxels, cell_size, &mut writer)?;
            writer.flush()?;
            vec![path]
        }
        ExportFormat::ObjMtl => {
            let obj_path = dir.join(format!("{stem}.obj"));
            let mtl_name = format!("{stem}.mtl");
            let mtl_path = dir.join(&mtl_name);

            let mut obj_writer = BufWriter::new(File::create(&obj_path)?);
            let materials = write_obj_with_mtl(voxels, cell_size, &mtl_name, &mut obj_writer)?;
            obj_writer.flush()?;
            let mut mtl_writer = BufWriter::new(File::create(&mtl_path)?);
            write_mtl(&materials, &mut mtl_writer)?;
            mtl_writer.flush()?;
            vec![obj_path, mtl_path]
        }
        ExportFormat::Ply => {
            let path = dir.join(format!("{stem}.ply"));
            let mut writer = BufWriter::new(File::create(&path)?);
            write_ply(voxels, cell_size, &mut writer)?;
            writer.flush()?;
            vec![path]
        }
    };

    log::info!("Exported {} voxels as {} to {}", voxels.len(), format, dir.display());
    Ok(paths)
}
