//! Grid-wide numeric constants.

use std::f64::consts;

// Mathematical constants
/// pi
pub const M_PI: f64 = consts::PI;
/// pi / 2.0
pub const M_PI_2: f64 = consts::FRAC_PI_2;
/// 2.0 * PI
pub const M_2PI: f64 = 2.0 * consts::PI;
/// pi / 180
pub const M_PI_180: f64 = consts::PI / 180.0;
/// 180 / pi
pub const M_180_PI: f64 = 180.0 / consts::PI;

/// sqrt(3) / 2.0, also known as sin(60 degrees)
pub const M_SQRT3_2: f64 = 0.866_025_403_784_438_6;
/// sqrt(3)
pub const M_SQRT3: f64 = 1.732_050_807_568_877_2;
/// Square root of 7.
pub const M_SQRT7: f64 = 2.645_751_311_064_590_6;

/// Epsilon for floating point comparisons in radians (~0.1mm on the earth).
pub const EPSILON_RAD: f64 = 0.000_000_001 * M_PI_180;

/// Default earth radius in kilometers (WGS84 authalic sphere).
pub const DEFAULT_RADIUS_KM: f64 = 6371.007_180_918_475;

/// Great circle arc between two adjacent icosahedron vertices, in radians.
pub const ICOSA_EDGE_RADS: f64 = 1.107_148_717_794_09;
/// Angular distance from an icosahedron face center to its vertices (g), radians.
pub const ISEA_G_RADS: f64 = 37.377_368_14 * M_PI_180;
/// Half of a face angle at an icosahedron vertex (G), radians.
pub const ISEA_CAP_G_RADS: f64 = 36.0 * M_PI_180;
/// Angle between a face center-vertex line and the center-edge line (theta), radians.
pub const ISEA_THETA_RADS: f64 = 30.0 * M_PI_180;
/// Ratio of the icosahedron radius to the sphere radius for equal area faces.
pub const ISEA_R_PRIME: f64 = 0.910_383_281_530_902_9;

/// Maximum supported grid resolution.
pub const MAX_DGG_RES: usize = 35;

/// Tolerance used when classifying a point into one of the six sub-triangles
/// around an icosahedron vertex.
pub const SUBTRI_TOLERANCE: f64 = 1e-15;

/// Offset applied to a quad-local coordinate that quantizes just outside its
/// valid band, before a single retry.
pub const QUANTIFY_NUDGE: f64 = 1e-7;

/// Offset used to pull shared quad corners apart when building clip boundaries.
pub const CLIP_NUDGE: f64 = 1e-7;

/// Largest scaled coordinate magnitude accepted by the polygon clipper.
pub const MAX_CLIP_COORD: f64 = 4.6e18;

/// Number of icosahedron vertices.
pub const NUM_ICOSA_VERTS: usize = 12;
/// Number of icosahedron faces.
pub const NUM_ICOSA_TRIS: usize = 20;

/// Default seed for the RANDOM placement mode.
pub const DEFAULT_ORIENT_SEED: u64 = 77316727;
/// Default longitude of icosahedron vertex 0, degrees.
pub const DEFAULT_VERT0_LON: f64 = 11.25;
/// Default latitude of icosahedron vertex 0, degrees.
pub const DEFAULT_VERT0_LAT: f64 = 58.282_525_59;
/// Default azimuth from vertex 0 to vertex 1, degrees.
pub const DEFAULT_VERT0_AZIMUTH: f64 = 0.0;

/// Gnomonic position, in meters, of icosahedron vertex 0 relative to a region center.
pub const REGION_CENTER_VERT0: (f64, f64) = (-7_289_214.618_283, 7_289_214.618_283);
/// Gnomonic position, in meters, of the point that fixes the vertex 0 azimuth.
pub const REGION_CENTER_AZIMUTH_POINT: (f64, f64) = (2_784_232.232_959, 2_784_232.232_959);
