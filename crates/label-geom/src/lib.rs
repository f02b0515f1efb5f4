pub mod extrude;
pub mod geometry;
pub mod mesh;
pub mod plate;
pub mod profile;
pub mod repair;
pub mod wedge;

pub use extrude::extrude_polygon;
pub use geometry::{Point2d, Point3d, Vec3};
pub use mesh::{Aabb, TriangleMesh};
pub use plate::{build_plate, PlateParams};
pub use profile::{Polygon, Profile};
pub use repair::{repair, RepairOutcome, WELD_TOLERANCE};
pub use wedge::{build_wedge, wedge_profile};
