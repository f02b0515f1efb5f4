use tracing::warn;

use crate::geometry::{Point2d, Point3d};
use crate::mesh::TriangleMesh;
use crate::profile::{signed_area, Polygon};

/// Extrude a closed 2D region along +Z into an indexed solid mesh.
///
/// Caps are triangulated with earcut (holes supported); side walls share the
/// ring vertices with the caps, so a single extrusion is already welded along
/// its own seams. The exterior is normalized to counter-clockwise winding and
/// holes to clockwise, which puts every face normal on the outside.
pub fn extrude_polygon(polygon: &Polygon, depth: f64) -> TriangleMesh {
    if polygon.exterior.len() < 3 {
        return TriangleMesh::new();
    }

    let mut exterior = polygon.exterior.clone();
    if signed_area(&exterior) < 0.0 {
        exterior.reverse();
    }
    let mut holes: Vec<Vec<Point2d>> = polygon
        .holes
        .iter()
        .filter(|hole| hole.len() >= 3)
        .cloned()
        .collect();
    for hole in &mut holes {
        if signed_area(hole) > 0.0 {
            hole.reverse();
        }
    }

    let mut coords: Vec<f64> = Vec::new();
    let mut hole_starts: Vec<usize> = Vec::new();
    for p in &exterior {
        coords.push(p.x);
        coords.push(p.y);
    }
    for hole in &holes {
        hole_starts.push(coords.len() / 2);
        for p in hole {
            coords.push(p.x);
            coords.push(p.y);
        }
    }

    let cap = earcutr::earcut(&coords, &hole_starts, 2).unwrap_or_default();
    if cap.is_empty() {
        warn!(
            ring_points = coords.len() / 2,
            "cap triangulation produced no triangles"
        );
    }

    let ring_vertices = coords.len() / 2;
    let mut mesh = TriangleMesh::new();
    for chunk in coords.chunks_exact(2) {
        mesh.add_vertex(Point3d::new(chunk[0], chunk[1], 0.0));
    }
    for chunk in coords.chunks_exact(2) {
        mesh.add_vertex(Point3d::new(chunk[0], chunk[1], depth));
    }

    let n = ring_vertices as u32;
    for tri in cap.chunks_exact(3) {
        // Bottom cap faces -Z: reverse the planar winding.
        mesh.add_triangle(tri[2] as u32, tri[1] as u32, tri[0] as u32);
    }
    for tri in cap.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32 + n, tri[1] as u32 + n, tri[2] as u32 + n);
    }

    let mut offset = 0u32;
    let mut ring_lengths = vec![exterior.len() as u32];
    ring_lengths.extend(holes.iter().map(|h| h.len() as u32));
    for len in ring_lengths {
        for i in 0..len {
            let j = (i + 1) % len;
            let b0 = offset + i;
            let b1 = offset + j;
            let t0 = b0 + n;
            let t1 = b1 + n;
            mesh.add_triangle(b0, b1, t1);
            mesh.add_triangle(b0, t1, t0);
        }
        offset += len;
    }

    mesh
}
