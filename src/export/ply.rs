//! ASCII PLY export with per-vertex colors.

use std::io::{self, Write};

use super::{cube_vertices, CUBE_QUADS};
use crate::voxel::voxel::Voxel;

/// Write voxels as an ASCII PLY mesh: 8 colored vertices and 6 quads per cube.
pub fn write_ply<W: Write>(voxels: &[Voxel], cell_size: f32, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", voxels.len() * 8)?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "element face {}", voxels.len() * CUBE_QUADS.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for voxel in voxels {
        let c = voxel.color;
        for v in cube_vertices(voxel.center(), cell_size) {
            writeln!(writer, "{:.6} {:.6} {:.6} {} {} {}", v.x, v.y, v.z, c.r, c.g, c.b)?;
        }
    }

    // PLY indices are 0-based
    for i in 0..voxels.len() {
        let offset = i * 8;
        for [a, b, c, d] in CUBE_QUADS {
            writeln!(writer, "4 {} {} {} {}", a + offset, b + offset, c + offset, d + offset)?;
        }
    }

    Ok(())
}
