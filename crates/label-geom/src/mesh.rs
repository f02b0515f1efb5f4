use serde::{Deserialize, Serialize};

use crate::geometry::{Point3d, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3d,
    pub max: Point3d,
}

impl Aabb {
    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// A triangle mesh with flat coordinate buffers.
///
/// Positions are `[x, y, z, x, y, z, ...]`. An empty `indices` buffer means
/// the mesh is non-indexed: positions are consecutive triangle corners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub positions: Vec<f64>,
    pub normals: Vec<f64>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len() / 3
        } else {
            self.vertex_count() / 3
        }
    }

    pub fn position(&self, vertex: usize) -> Point3d {
        Point3d::new(
            self.positions[vertex * 3],
            self.positions[vertex * 3 + 1],
            self.positions[vertex * 3 + 2],
        )
    }

    pub fn add_vertex(&mut self, p: Point3d) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.push(p.x);
        self.positions.push(p.y);
        self.positions.push(p.z);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Corner positions of one triangle, resolving indices when present.
    pub fn triangle(&self, tri: usize) -> [Point3d; 3] {
        let corner = |k: usize| -> Point3d {
            let vertex = if self.is_indexed() {
                self.indices[tri * 3 + k] as usize
            } else {
                tri * 3 + k
            };
            self.position(vertex)
        };
        [corner(0), corner(1), corner(2)]
    }

    /// Append another mesh, offsetting its indices past this mesh's vertices.
    ///
    /// Mixing an indexed and a non-indexed buffer falls back to a de-indexed
    /// result for both sides.
    pub fn merge(&mut self, other: &TriangleMesh) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        if self.is_indexed() != other.is_indexed() {
            let mut flat = self.to_non_indexed();
            let other_flat = other.to_non_indexed();
            flat.positions.extend_from_slice(&other_flat.positions);
            flat.normals.clear();
            *self = flat;
            return;
        }

        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        for &idx in &other.indices {
            self.indices.push(idx + offset);
        }
        if !self.normals.is_empty() && self.normals.len() + other.normals.len()
            == self.positions.len()
        {
            self.normals.extend_from_slice(&other.normals);
        } else {
            // Normal buffers disagree; callers recompute after merging.
            self.normals.clear();
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        for chunk in self.positions.chunks_exact_mut(3) {
            chunk[0] += dx;
            chunk[1] += dy;
            chunk[2] += dz;
        }
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        for chunk in self.positions.chunks_exact_mut(3) {
            chunk[0] *= sx;
            chunk[1] *= sy;
            chunk[2] *= sz;
        }
        // Non-uniform scaling invalidates normals.
        self.normals.clear();
    }

    /// Rotate positions and normals about the Y axis.
    pub fn rotate_y(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let rotate = |chunk: &mut [f64]| {
            let (x, z) = (chunk[0], chunk[2]);
            chunk[0] = x * cos + z * sin;
            chunk[2] = -x * sin + z * cos;
        };
        for chunk in self.positions.chunks_exact_mut(3) {
            rotate(chunk);
        }
        for chunk in self.normals.chunks_exact_mut(3) {
            rotate(chunk);
        }
    }

    /// Translate so the bounding-box center sits at the origin.
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounding_box() {
            let c = bounds.center();
            self.translate(-c.x, -c.y, -c.z);
        }
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        if self.is_empty() {
            return None;
        }
        let mut min = Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3d::new(
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for chunk in self.positions.chunks_exact(3) {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        }
        Some(Aabb { min, max })
    }

    /// Bounding sphere centered on the bounding-box center.
    pub fn bounding_sphere(&self) -> Option<(Point3d, f64)> {
        let center = self.bounding_box()?.center();
        let radius = self
            .positions
            .chunks_exact(3)
            .map(|c| center.distance_to(&Point3d::new(c[0], c[1], c[2])))
            .fold(0.0_f64, f64::max);
        Some((center, radius))
    }

    /// Recompute per-vertex normals by accumulating face normals.
    ///
    /// Degenerate faces contribute nothing; a vertex left without any valid
    /// contribution gets +Z.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertex_count()];
        for tri in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(tri);
            let face = (b - a).cross(&(c - a));
            for k in 0..3 {
                let vertex = if self.is_indexed() {
                    self.indices[tri * 3 + k] as usize
                } else {
                    tri * 3 + k
                };
                accum[vertex] = accum[vertex] + face;
            }
        }
        self.normals.clear();
        self.normals.reserve(self.positions.len());
        for n in accum {
            let unit = n.normalized().unwrap_or(Vec3::Z);
            self.normals.push(unit.x);
            self.normals.push(unit.y);
            self.normals.push(unit.z);
        }
    }

    /// Expanded copy with one vertex per triangle corner. The source mesh is
    /// left untouched; an already non-indexed mesh is cloned.
    pub fn to_non_indexed(&self) -> TriangleMesh {
        if !self.is_indexed() {
            return self.clone();
        }
        let mut out = TriangleMesh::new();
        out.positions.reserve(self.indices.len() * 3);
        let has_normals = self.normals.len() == self.positions.len();
        for &idx in &self.indices {
            let vi = idx as usize * 3;
            out.positions.extend_from_slice(&self.positions[vi..vi + 3]);
            if has_normals {
                out.normals.extend_from_slice(&self.normals[vi..vi + 3]);
            }
        }
        out
    }
}
