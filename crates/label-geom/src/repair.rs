use std::collections::HashMap;

use tracing::warn;

use crate::mesh::TriangleMesh;

/// Default weld distance for seam repair.
pub const WELD_TOLERANCE: f64 = 1e-4;

/// Internal failures of the weld pass. Never surfaced past [`repair`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepairError {
    #[error("position buffer length {len} is not a multiple of 3")]
    MalformedBuffer { len: usize },

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("non-finite coordinate at vertex {vertex}")]
    NonFiniteCoordinate { vertex: usize },
}

/// Result of a repair pass. The welded and best-effort paths stay
/// distinguishable so callers (and tests) can tell which one ran; most call
/// sites collapse the distinction with [`RepairOutcome::into_mesh`].
#[derive(Debug, Clone)]
pub enum RepairOutcome {
    /// Duplicate vertices were welded and normals/bounds recomputed.
    Welded(TriangleMesh),
    /// Welding failed; the original mesh with best-effort normals.
    BestEffort(TriangleMesh),
}

impl RepairOutcome {
    pub fn mesh(&self) -> &TriangleMesh {
        match self {
            RepairOutcome::Welded(mesh) | RepairOutcome::BestEffort(mesh) => mesh,
        }
    }

    pub fn into_mesh(self) -> TriangleMesh {
        match self {
            RepairOutcome::Welded(mesh) | RepairOutcome::BestEffort(mesh) => mesh,
        }
    }

    pub fn was_welded(&self) -> bool {
        matches!(self, RepairOutcome::Welded(_))
    }
}

/// Weld vertices closer than `tolerance`, then recompute vertex normals.
///
/// Repair failure is non-fatal: the original mesh comes back with normals
/// recomputed where the buffers allow it and a warning in the log. Welding an
/// already-welded mesh is a no-op.
pub fn repair(mesh: TriangleMesh, tolerance: f64) -> RepairOutcome {
    match weld_vertices(&mesh, tolerance) {
        Ok(mut welded) => {
            welded.compute_vertex_normals();
            RepairOutcome::Welded(welded)
        }
        Err(err) => {
            warn!(error = %err, "geometry repair failed, keeping unwelded mesh");
            let mut original = mesh;
            // Normal recomputation walks the triangles, so it is only safe
            // when the buffers are structurally sound. The validation order
            // in weld_vertices guarantees that for a non-finite coordinate;
            // a malformed buffer or bad index leaves normals untouched.
            if matches!(err, RepairError::NonFiniteCoordinate { .. }) {
                original.compute_vertex_normals();
            }
            RepairOutcome::BestEffort(original)
        }
    }
}

/// Collapse positions that quantize to the same cell at `tolerance`,
/// producing an indexed mesh. Triangles that collapse to a line or point are
/// dropped.
fn weld_vertices(mesh: &TriangleMesh, tolerance: f64) -> Result<TriangleMesh, RepairError> {
    if mesh.positions.len() % 3 != 0 {
        return Err(RepairError::MalformedBuffer {
            len: mesh.positions.len(),
        });
    }
    let vertex_count = mesh.vertex_count();
    for &idx in &mesh.indices {
        if idx as usize >= vertex_count {
            return Err(RepairError::IndexOutOfRange {
                index: idx,
                vertex_count,
            });
        }
    }
    for (vertex, chunk) in mesh.positions.chunks_exact(3).enumerate() {
        if chunk.iter().any(|c| !c.is_finite()) {
            return Err(RepairError::NonFiniteCoordinate { vertex });
        }
    }

    let tolerance = tolerance.max(f64::EPSILON);
    let quantize = |v: f64| -> i64 { (v / tolerance).round() as i64 };

    let mut cells: HashMap<[i64; 3], u32> = HashMap::new();
    let mut welded = TriangleMesh::new();
    let mut remap: Vec<u32> = Vec::with_capacity(vertex_count);
    for chunk in mesh.positions.chunks_exact(3) {
        let key = [quantize(chunk[0]), quantize(chunk[1]), quantize(chunk[2])];
        let next = welded.vertex_count() as u32;
        let mapped = *cells.entry(key).or_insert_with(|| {
            welded.positions.extend_from_slice(chunk);
            next
        });
        remap.push(mapped);
    }

    let source_triangles = mesh.triangle_count();
    for tri in 0..source_triangles {
        let (a, b, c) = if mesh.is_indexed() {
            (
                remap[mesh.indices[tri * 3] as usize],
                remap[mesh.indices[tri * 3 + 1] as usize],
                remap[mesh.indices[tri * 3 + 2] as usize],
            )
        } else {
            (remap[tri * 3], remap[tri * 3 + 1], remap[tri * 3 + 2])
        };
        if a == b || b == c || a == c {
            continue;
        }
        welded.add_triangle(a, b, c);
    }

    Ok(welded)
}
