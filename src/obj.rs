//! Wavefront OBJ export of an octree.
//!
//! Every non-void voxel becomes a cube: eight `v` records for its
//! corners, twelve `f` triangles referencing them, and six shared `vn`
//! face normals emitted once. Coordinates are written in grid units,
//! untransformed.

use std::io::{self, Write};

use crate::octree::Octree;
use crate::voxel::{Material, Voxel};

/// Outward face normals, in -X, +X, -Y, +Y, -Z, +Z order.
const NORMALS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

/// One cube face: a normal index and two triangles given as corner
/// indices into [`Voxel::corners`]. Winding is counter-clockwise seen
/// from outside, so each triangle's geometric normal matches the
/// `NORMALS` entry.
struct Face {
    normal: usize,
    vertices: [usize; 6],
}

const FACES: [Face; 6] = [
    // Left (-X)
    Face {
        normal: 0,
        vertices: [0, 4, 6, 0, 6, 2],
    },
    // Right (+X)
    Face {
        normal: 1,
        vertices: [1, 3, 7, 1, 7, 5],
    },
    // Bottom (-Y)
    Face {
        normal: 2,
        vertices: [0, 1, 5, 0, 5, 4],
    },
    // Top (+Y)
    Face {
        normal: 3,
        vertices: [2, 6, 7, 2, 7, 3],
    },
    // Back (-Z)
    Face {
        normal: 4,
        vertices: [0, 2, 3, 0, 3, 1],
    },
    // Front (+Z)
    Face {
        normal: 5,
        vertices: [4, 5, 7, 4, 7, 6],
    },
];

fn solid_voxels(octree: &Octree) -> impl Iterator<Item = Voxel> + '_ {
    octree
        .voxels()
        .iter()
        .copied()
        .filter(|v| v.material() != Material::VOID)
}

/// Write the octree's solid voxels as an indexed triangle mesh.
///
/// Emits all vertex positions, then the six face normals, then the
/// faces, using 1-based `v//vn` references as OBJ requires.
pub fn write_obj<W: Write>(octree: &Octree, writer: &mut W) -> io::Result<()> {
    for v in solid_voxels(octree) {
        for corner in v.corners() {
            writeln!(writer, "v {} {} {}", corner.x, corner.y, corner.z)?;
        }
    }

    for n in NORMALS {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    for (cube, _) in solid_voxels(octree).enumerate() {
        let base = cube * 8 + 1;
        for face in &FACES {
            for triangle in face.vertices.chunks_exact(3) {
                writeln!(
                    writer,
                    "f {}//{} {}//{} {}//{}",
                    base + triangle[0],
                    face.normal + 1,
                    base + triangle[1],
                    face.normal + 1,
                    base + triangle[2],
                    face.normal + 1,
                )?;
            }
        }
    }

    Ok(())
}
