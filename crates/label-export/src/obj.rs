use std::fmt::Write as _;

use label_geom::TriangleMesh;
use label_types::rgb_to_normalized;

/// Serialize the plate and text meshes to Wavefront OBJ.
///
/// Each mesh becomes one named/grouped object section referencing its
/// material. Meshes are de-indexed into per-triangle vertices (the source is
/// untouched), so face lines are consecutive 1-based triples with a running
/// offset between sections.
pub fn write_obj(plate: &TriangleMesh, text: &TriangleMesh) -> String {
    let mut out = String::from("mtllib label.mtl\n");
    let mut vertex_offset = 0usize;
    vertex_offset = object_section(&mut out, plate, "Plate", vertex_offset);
    object_section(&mut out, text, "Text", vertex_offset);
    out
}

fn object_section(
    out: &mut String,
    mesh: &TriangleMesh,
    name: &str,
    vertex_offset: usize,
) -> usize {
    let working = mesh.to_non_indexed();
    let _ = writeln!(out, "o {}", name);
    let _ = writeln!(out, "g {}", name);
    let _ = writeln!(out, "usemtl {}", name);

    for chunk in working.positions.chunks_exact(3) {
        let _ = writeln!(out, "v {:.5} {:.5} {:.5}", chunk[0], chunk[1], chunk[2]);
    }
    let vertex_count = working.vertex_count();
    for i in (0..vertex_count).step_by(3) {
        let _ = writeln!(
            out,
            "f {} {} {}",
            vertex_offset + i + 1,
            vertex_offset + i + 2,
            vertex_offset + i + 3
        );
    }
    vertex_offset + vertex_count
}

/// Serialize the two-material library: diffuse colors in normalized RGB.
pub fn write_mtl(plate_rgb: [u8; 3], text_rgb: [u8; 3]) -> String {
    let mut out = String::new();
    for (name, rgb) in [("Plate", plate_rgb), ("Text", text_rgb)] {
        let [r, g, b] = rgb_to_normalized(rgb);
        let _ = writeln!(out, "newmtl {}", name);
        let _ = writeln!(out, "Kd {:.6} {:.6} {:.6}", r, g, b);
        out.push('\n');
    }
    out
}
