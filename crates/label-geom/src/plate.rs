use serde::{Deserialize, Serialize};

use crate::extrude::extrude_polygon;
use crate::mesh::TriangleMesh;
use crate::profile::{Polygon, Profile};

/// Segments used to flatten each quarter-circle corner.
pub const CORNER_SEGMENTS: usize = 12;

/// Rounded-rectangle plate parameters, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateParams {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub thickness: f64,
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            width: 76.5,
            height: 22.0,
            radius: 1.0,
            thickness: 1.0,
        }
    }
}

/// Build the label plate: a rounded rectangle extruded to `thickness`.
///
/// Corners are quadratic curves with the control point at the sharp rectangle
/// corner. Inputs are clamped rather than rejected; the corner radius is kept
/// below half the shorter side so the boundary stays simple. The result is
/// indexed and centered on the XY origin with its base at z = 0.
pub fn build_plate(params: &PlateParams) -> TriangleMesh {
    let width = params.width.max(1.0);
    let height = params.height.max(1.0);
    let thickness = params.thickness.max(0.1);
    let radius = params
        .radius
        .clamp(0.0, (width.min(height) / 2.0 - 1e-3).max(0.0));

    let hw = width / 2.0;
    let hh = height / 2.0;

    let mut shape = Profile::new();
    shape.move_to(-hw + radius, -hh);
    shape.line_to(hw - radius, -hh);
    shape.quadratic_curve_to(hw, -hh, hw, -hh + radius, CORNER_SEGMENTS);
    shape.line_to(hw, hh - radius);
    shape.quadratic_curve_to(hw, hh, hw - radius, hh, CORNER_SEGMENTS);
    shape.line_to(-hw + radius, hh);
    shape.quadratic_curve_to(-hw, hh, -hw, hh - radius, CORNER_SEGMENTS);
    shape.line_to(-hw, -hh + radius);
    shape.quadratic_curve_to(-hw, -hh, -hw + radius, -hh, CORNER_SEGMENTS);

    let polygon = Polygon::from_exterior(shape.into_ring());
    let mut mesh = extrude_polygon(&polygon, thickness);
    mesh.compute_vertex_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_plate_bounds() {
        let mesh = build_plate(&PlateParams::default());
        let bounds = mesh.bounding_box().unwrap();
        assert_relative_eq!(bounds.size().x, 76.5, epsilon = 1e-9);
        assert_relative_eq!(bounds.size().y, 22.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bounds.max.z, 1.0, epsilon = 1e-12);
        // Centered on the XY origin.
        assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.center().y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn plate_is_indexed_with_normals() {
        let mesh = build_plate(&PlateParams::default());
        assert!(mesh.is_indexed());
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn corner_radius_is_clamped() {
        let mesh = build_plate(&PlateParams {
            width: 10.0,
            height: 4.0,
            radius: 100.0,
            thickness: 1.0,
        });
        let bounds = mesh.bounding_box().unwrap();
        assert_relative_eq!(bounds.size().x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.size().y, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_inputs_are_clamped_not_rejected() {
        let mesh = build_plate(&PlateParams {
            width: 0.0,
            height: -5.0,
            radius: 0.0,
            thickness: 0.0,
        });
        assert!(!mesh.is_empty());
        let bounds = mesh.bounding_box().unwrap();
        assert!(bounds.size().z >= 0.1 - 1e-12);
    }
}
