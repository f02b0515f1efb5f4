use std::fmt::Write as _;

use label_geom::TriangleMesh;

use crate::errors::ExportError;

/// Serialize a mesh as ASCII STL.
///
/// The mesh is de-indexed into a working copy first; face normals come from
/// the cross product of the triangle edge vectors, with +Z substituted for
/// degenerate faces. Coordinates are 6-decimal fixed point.
pub fn write_ascii_stl(mesh: &TriangleMesh, name: &str) -> Result<String, ExportError> {
    if mesh.triangle_count() == 0 {
        return Err(ExportError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    for &idx in &mesh.indices {
        if idx as usize >= vertex_count {
            return Err(ExportError::IndexOutOfRange {
                index: idx,
                vertex_count,
            });
        }
    }

    let working = mesh.to_non_indexed();
    let tri_count = working.triangle_count();

    let mut out = String::with_capacity(tri_count * 300);
    let _ = writeln!(out, "solid {}", name);

    for tri in 0..tri_count {
        let [a, b, c] = working.triangle(tri);
        let normal = (b - a)
            .cross(&(c - a))
            .normalized()
            .unwrap_or(label_geom::Vec3::Z);

        let _ = writeln!(
            out,
            "  facet normal {:.6} {:.6} {:.6}",
            normal.x, normal.y, normal.z
        );
        out.push_str("    outer loop\n");
        for p in [a, b, c] {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {}", name);
    Ok(out)
}
