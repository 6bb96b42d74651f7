//! Wavefront OBJ/MTL export.

use std::collections::HashMap;
use std::io::{self, Write};

use super::{cube_vertices, CUBE_QUADS, CUBE_TRIANGLES};
use crate::color::Rgb;
use crate::voxel::voxel::Voxel;

/// Write voxels as OBJ cubes with quad faces. No materials.
pub fn write_obj<W: Write>(voxels: &[Voxel], cell_size: f32, writer: &mut W) -> io::Result<()> {
    // OBJ indices are 1-based
    let mut offset = 1;
    for voxel in voxels {
        for v in cube_vertices(voxel.center(), cell_size) {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for [a, b, c, d] in CUBE_QUADS {
            writeln!(writer, "f {} {} {} {}", a + offset, b + offset, c + offset, d + offset)?;
        }
        offset += 8;
    }
    Ok(())
}

/// Write triangulated OBJ cubes with one material per distinct color.
///
/// The OBJ references `mtl_name` and names materials `material_N` in
/// first-seen order. Returns the materials for [`write_mtl`].
pub fn write_obj_with_mtl<W: Write>(
    voxels: &[Voxel],
    cell_size: f32,
    mtl_name: &str,
    writer: &mut W,
) -> io::Result<Vec<Rgb>> {
    let mut materials: Vec<Rgb> = Vec::new();
    let mut index: HashMap<Rgb, usize> = HashMap::new();

    writeln!(writer, "mtllib {mtl_name}")?;

    let mut offset = 1;
    for voxel in voxels {
        let material = *index.entry(voxel.color).or_insert_with(|| {
            materials.push(voxel.color);
            materials.len() - 1
        });
        writeln!(writer, "usemtl material_{material}")?;

        for v in cube_vertices(voxel.center(), cell_size) {
            writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
        }
        for [a, b, c] in CUBE_TRIANGLES {
            writeln!(writer, "f {} {} {}", a + offset, b + offset, c + offset)?;
        }
        offset += 8;
    }

    Ok(materials)
}

/// Write an MTL library for `materials`, named `material_0..`.
pub fn write_mtl<W: Write>(materials: &[Rgb], writer: &mut W) -> io::Result<()> {
    for (i, color) in materials.iter().enumerate() {
        let [r, g, b] = color.to_unit();
        writeln!(writer, "newmtl material_{i}")?;
        writeln!(writer, "Ka 0.2 0.2 0.2")?;
        writeln!(writer, "Kd {r:.6} {g:.6} {b:.6}")?;
        writeln!(writer, "Ks 0.1 0.1 0.1")?;
        writeln!(writer, "Ns 10.0")?;
        writeln!(writer, "illum 2")?;
        writeln!(writer)?;
    }
    Ok(())
}
