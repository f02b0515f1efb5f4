use label_types::WedgeParams;

use crate::extrude::extrude_polygon;
use crate::geometry::Point2d;
use crate::mesh::TriangleMesh;
use crate::profile::Polygon;
use crate::repair::{repair, WELD_TOLERANCE};

/// Segments used to flatten the optional tip fillet arc.
pub const FILLET_SEGMENTS: usize = 8;

/// Margin keeping the fillet strictly inside both adjacent edges.
const FILLET_MARGIN: f64 = 1e-3;

struct ClampedWedge {
    base: f64,
    tall: f64,
    depth: f64,
    tip: f64,
}

fn clamp_params(params: &WedgeParams) -> ClampedWedge {
    let base = params.base_length.max(1.0);
    let tall = params.height.max(0.5);
    let depth = params.extrusion_length.max(0.5);
    // A tip cut at full height would erase the profile; keep a sliver.
    let tip = params.tip_height.clamp(0.0, tall - FILLET_MARGIN).max(0.0);
    ClampedWedge {
        base,
        tall,
        depth,
        tip,
    }
}

/// Fillet radius actually applied after clamping against the hypotenuse
/// length and the wedge height.
pub fn effective_fillet_radius(params: &WedgeParams) -> f64 {
    let c = clamp_params(params);
    let hyp_len = (c.base * c.base + c.tall * c.tall).sqrt();
    let limit = (hyp_len.min(c.tall) - FILLET_MARGIN).max(0.0);
    let mut radius = params.fillet_radius.clamp(0.0, limit);
    if radius <= 0.0 {
        return 0.0;
    }

    // Tangent distance along each edge from the top corner; keep the tangent
    // points within both the hypotenuse segment and the back edge.
    let x_cut = c.base * (1.0 - c.tip / c.tall);
    let tip_point = Point2d::new(x_cut, c.tip);
    let corner = Point2d::new(0.0, c.tall);
    let hyp_seg = corner.distance_to(&tip_point);
    let uy = (tip_point.y - corner.y) / hyp_seg;
    let cos_theta = (-uy).clamp(-1.0, 1.0); // u · (0, -1)
    let half = cos_theta.acos() / 2.0;
    let tan_half = half.tan();
    if tan_half < 1e-9 {
        return 0.0;
    }
    let mut tangent = radius / tan_half;
    let tangent_limit = 0.9 * hyp_seg.min(c.tall);
    if tangent > tangent_limit {
        tangent = tangent_limit;
        radius = tangent * tan_half;
    }
    radius
}

/// The 2D cross-section of the wedge, counter-clockwise.
///
/// Flat base from the origin, vertical back at x = 0, hypotenuse to the top
/// of the back; the base tip optionally cut flat at `tip_height` and the top
/// corner optionally rounded by a tangent arc.
pub fn wedge_profile(params: &WedgeParams) -> Vec<Point2d> {
    let c = clamp_params(params);
    let x_cut = c.base * (1.0 - c.tip / c.tall);
    let corner = Point2d::new(0.0, c.tall);
    let tip_point = Point2d::new(x_cut, c.tip);

    let mut points = vec![Point2d::new(0.0, 0.0), Point2d::new(x_cut, 0.0)];
    if c.tip > 0.0 {
        points.push(tip_point);
    }

    let radius = effective_fillet_radius(params);
    if radius > 0.0 {
        let hyp_seg = corner.distance_to(&tip_point);
        let (ux, uy) = (
            (tip_point.x - corner.x) / hyp_seg,
            (tip_point.y - corner.y) / hyp_seg,
        );
        let cos_theta = (-uy).clamp(-1.0, 1.0);
        let half = cos_theta.acos() / 2.0;
        let tangent = radius / half.tan();

        let t1 = Point2d::new(corner.x + ux * tangent, corner.y + uy * tangent);
        let t2 = Point2d::new(0.0, c.tall - tangent);

        // Arc center lies along the corner bisector.
        let (bx, by) = (ux + 0.0, uy - 1.0);
        let b_len = (bx * bx + by * by).sqrt();
        let center = Point2d::new(
            corner.x + bx / b_len * (radius / half.sin()),
            corner.y + by / b_len * (radius / half.sin()),
        );

        let a1 = (t1.y - center.y).atan2(t1.x - center.x);
        let a2 = (t2.y - center.y).atan2(t2.x - center.x);
        let mut delta = a2 - a1;
        while delta > std::f64::consts::PI {
            delta -= 2.0 * std::f64::consts::PI;
        }
        while delta < -std::f64::consts::PI {
            delta += 2.0 * std::f64::consts::PI;
        }
        for i in 0..=FILLET_SEGMENTS {
            let angle = a1 + delta * (i as f64 / FILLET_SEGMENTS as f64);
            points.push(Point2d::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    } else {
        points.push(corner);
    }

    // Drop near-coincident consecutive points left by clamped parameters.
    let mut deduped: Vec<Point2d> = Vec::with_capacity(points.len());
    for p in points {
        if deduped
            .last()
            .map_or(true, |last| last.distance_to(&p) > 1e-9)
        {
            deduped.push(p);
        }
    }
    deduped
}

/// Build the wedge solid.
///
/// The profile is extruded, centered, reoriented so the extrusion runs along
/// +X, shifted so the minimum bound sits at the origin, and welded.
pub fn build_wedge(params: &WedgeParams) -> TriangleMesh {
    let c = clamp_params(params);
    let polygon = Polygon::from_exterior(wedge_profile(params));
    let mut mesh = extrude_polygon(&polygon, c.depth);
    mesh.center();
    mesh.rotate_y(std::f64::consts::FRAC_PI_2);
    if let Some(bounds) = mesh.bounding_box() {
        mesh.translate(-bounds.min.x, -bounds.min.y, -bounds.min.z);
    }
    repair(mesh, WELD_TOLERANCE).into_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn params(base: f64, height: f64, length: f64, tip: f64, fillet: f64) -> WedgeParams {
        WedgeParams {
            base_length: base,
            height,
            extrusion_length: length,
            tip_height: tip,
            fillet_radius: fillet,
        }
    }

    #[test]
    fn sharp_wedge_profile_is_a_triangle() {
        let profile = wedge_profile(&params(20.0, 3.5, 190.0, 0.0, 0.0));
        assert_eq!(profile.len(), 3);
        assert_relative_eq!(profile[1].x, 20.0, epsilon = 1e-12);
        assert_relative_eq!(profile[2].y, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn tip_cut_adds_vertical_facet() {
        let profile = wedge_profile(&params(20.0, 3.5, 190.0, 0.7, 0.0));
        assert_eq!(profile.len(), 4);
        let x_cut = 20.0 * (1.0 - 0.7 / 3.5);
        assert_relative_eq!(profile[1].x, x_cut, epsilon = 1e-9);
        assert_relative_eq!(profile[2].x, x_cut, epsilon = 1e-9);
        assert_relative_eq!(profile[2].y, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn oversized_fillet_is_clamped() {
        let p = params(20.0, 3.5, 190.0, 0.7, 100.0);
        let radius = effective_fillet_radius(&p);
        let hyp = (20.0_f64 * 20.0 + 3.5 * 3.5).sqrt();
        assert!(radius > 0.0);
        assert!(radius < hyp.min(3.5));
    }

    #[test]
    fn filleted_boundary_is_monotonic() {
        let profile = wedge_profile(&params(20.0, 3.5, 190.0, 0.7, 100.0));
        // From the base tip onward x never increases, so the upper chain
        // cannot cross itself.
        for pair in profile[1..].windows(2) {
            assert!(pair[1].x <= pair[0].x + 1e-9);
        }
        // The arc stays inside the wedge envelope and lands back on the
        // vertical back edge.
        for p in &profile {
            assert!(p.y >= -1e-9 && p.y <= 3.5 + 1e-9);
        }
        let last = profile[profile.len() - 1];
        assert_relative_eq!(last.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn wedge_extrusion_runs_along_x_from_origin() {
        let mesh = build_wedge(&params(20.0, 3.5, 190.0, 0.0, 0.0));
        let bounds = mesh.bounding_box().unwrap();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.size().x, 190.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.size().y, 3.5, epsilon = 1e-9);
        assert_relative_eq!(bounds.size().z, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_inputs_are_clamped() {
        let mesh = build_wedge(&params(0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(!mesh.is_empty());
        let bounds = mesh.bounding_box().unwrap();
        assert!(bounds.size().x >= 0.5 - 1e-9);
    }

    proptest! {
        #[test]
        fn fillet_always_within_bounds(
            base in 1.0..100.0f64,
            height in 0.5..20.0f64,
            fillet in 0.0..500.0f64,
            tip_frac in 0.0..0.9f64,
        ) {
            let p = params(base, height, 50.0, height * tip_frac, fillet);
            let radius = effective_fillet_radius(&p);
            let hyp = (base * base + height * height).sqrt();
            prop_assert!(radius >= 0.0);
            prop_assert!(radius < hyp.min(height));
        }

        #[test]
        fn profile_is_simple(
            base in 1.0..100.0f64,
            height in 0.5..20.0f64,
            fillet in 0.0..500.0f64,
            tip_frac in 0.0..0.9f64,
        ) {
            let p = params(base, height, 50.0, height * tip_frac, fillet);
            let profile = wedge_profile(&p);
            prop_assert!(profile.len() >= 3);
            // Strictly positive area means a valid counter-clockwise boundary.
            prop_assert!(crate::profile::signed_area(&profile) > 0.0);
        }
    }
}
