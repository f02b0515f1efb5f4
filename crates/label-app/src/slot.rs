use label_geom::TriangleMesh;

/// Owning slot for one built mesh. Rebuilds replace the content wholesale;
/// there is no partial mutation of a held mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshSlot {
    mesh: Option<TriangleMesh>,
}

impl MeshSlot {
    pub fn replace(&mut self, mesh: TriangleMesh) {
        self.mesh = Some(mesh);
    }

    pub fn clear(&mut self) {
        self.mesh = None;
    }

    pub fn take(&mut self) -> Option<TriangleMesh> {
        self.mesh.take()
    }

    pub fn get(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_geom::Point3d;

    fn triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3d::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3d::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3d::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn replace_and_clear() {
        let mut slot = MeshSlot::default();
        assert!(slot.is_empty());
        slot.replace(triangle());
        assert_eq!(slot.get().map(TriangleMesh::triangle_count), Some(1));
        slot.clear();
        assert!(slot.get().is_none());
    }

    #[test]
    fn take_leaves_slot_empty() {
        let mut slot = MeshSlot::default();
        slot.replace(triangle());
        let taken = slot.take();
        assert!(taken.is_some());
        assert!(slot.is_empty());
        assert!(slot.take().is_none());
    }
}
