//! Core grid data structures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Latitude/longitude coordinates in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
  /// Latitude in radians.
  pub lat: f64,
  /// Longitude in radians.
  pub lng: f64,
}

impl LatLng {
  /// Builds a coordinate from decimal degrees.
  #[inline]
  pub fn from_degrees(lat_deg: f64, lng_deg: f64) -> Self {
    Self {
      lat: lat_deg.to_radians(),
      lng: lng_deg.to_radians(),
    }
  }

  #[inline]
  pub fn lat_degrees(&self) -> f64 {
    self.lat.to_degrees()
  }

  #[inline]
  pub fn lng_degrees(&self) -> f64 {
    self.lng.to_degrees()
  }
}

/// 2D floating-point vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2d {
  /// X component.
  pub x: f64,
  /// Y component.
  pub y: f64,
}

impl Vec2d {
  #[inline]
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// 3D floating-point vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3d {
  /// X component.
  pub x: f64,
  /// Y component.
  pub y: f64,
  /// Z component.
  pub z: f64,
}

/// IJ hexagon coordinates. The axes are spaced 120 degrees apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordIJ {
  /// I component.
  pub i: i64,
  /// J component.
  pub j: i64,
}

impl CoordIJ {
  #[inline]
  pub const fn new(i: i64, j: i64) -> Self {
    Self { i, j }
  }
}

impl fmt::Display for CoordIJ {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.i, self.j)
  }
}

/// IJK hexagon coordinates. Each axis is spaced 120 degrees apart.
/// The representation is redundant; normalized coordinates have at least one
/// zero component and no negative components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordIJK {
  /// I component.
  pub i: i64,
  /// J component.
  pub j: i64,
  /// K component.
  pub k: i64,
}

impl CoordIJK {
  #[inline]
  pub const fn new(i: i64, j: i64, k: i64) -> Self {
    Self { i, j, k }
  }
}

/// Hexagon digit representing an IJK+ axes direction (0-6), or invalid (7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Default)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
pub enum Direction {
  /// Digit in center.
  #[default]
  Center = 0,
  /// Digit in k-axes direction.
  KAxes = 1,
  /// Digit in j-axes direction.
  JAxes = 2,
  /// Digit in j == k direction.
  JkAxes = 3,
  /// Digit in i-axes direction.
  IAxes = 4,
  /// Digit in i == k direction.
  IkAxes = 5,
  /// Digit in i == j direction.
  IjAxes = 6,
  /// Digit in the invalid direction; also the padding digit of packed indices.
  InvalidDigit = 7,
}

impl TryFrom<u8> for Direction {
  type Error = DgError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(Direction::Center),
      1 => Ok(Direction::KAxes),
      2 => Ok(Direction::JAxes),
      3 => Ok(Direction::JkAxes),
      4 => Ok(Direction::IAxes),
      5 => Ok(Direction::IkAxes),
      6 => Ok(Direction::IjAxes),
      7 => Ok(Direction::InvalidDigit),
      _ => Err(DgError::InvalidAddress(format!("digit {value} out of range"))),
    }
  }
}

/// Quad-local integer coordinate (the Q2DI frame).
///
/// Quads 0 and 11 are the polar pentagons and hold the single cell `(0, 0)`;
/// quads 1-10 are the equatorial diamonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Q2DICoord {
  /// Quad number (0-11).
  pub quad: u8,
  /// Coordinate within the quad.
  pub coord: CoordIJ,
}

impl Q2DICoord {
  #[inline]
  pub const fn new(quad: u8, i: i64, j: i64) -> Self {
    Self {
      quad,
      coord: CoordIJ { i, j },
    }
  }
}

impl fmt::Display for Q2DICoord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.quad, self.coord)
  }
}

/// Quad-local continuous coordinate (the Q2DD frame), in units of the
/// icosahedron edge with the quad's origin vertex at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Q2DDCoord {
  /// Quad number (0-11).
  pub quad: u8,
  /// Position within the quad frame.
  pub pos: Vec2d,
}

impl Q2DDCoord {
  #[inline]
  pub const fn new(quad: u8, x: f64, y: f64) -> Self {
    Self {
      quad,
      pos: Vec2d { x, y },
    }
  }
}

/// Coordinate on one of the 20 unit-edge projected icosahedron triangles.
///
/// Each triangle has corners A `(0, 0)`, B `(1, 0)` and C `(1/2, sqrt(3)/2)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjTriCoord {
  /// Triangle number (0-19).
  pub tri: u8,
  /// Position within the triangle frame.
  pub pos: Vec2d,
}

/// Coordinate relative to an icosahedron vertex.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexCoord {
  /// Vertex number (0-11).
  pub vert: u8,
  /// Triangle containing the point (0-19).
  pub tri: u8,
  /// False when the point lies in the wedge removed around the vertex.
  pub keep: bool,
  /// Position in the vertex frame.
  pub pos: Vec2d,
}

/// A single closed loop of geographic coordinates.
/// The last vertex is not implicitly connected to the first.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoLoop {
  /// Vertices forming the loop.
  pub verts: Vec<LatLng>,
}

impl GeoLoop {
  pub fn new(verts: Vec<LatLng>) -> Self {
    Self { verts }
  }

  /// Builds a loop from `(lng, lat)` pairs in degrees.
  pub fn from_degrees(points: &[(f64, f64)]) -> Self {
    Self {
      verts: points.iter().map(|&(lng, lat)| LatLng::from_degrees(lat, lng)).collect(),
    }
  }
}

/// A polygon with an outer loop and zero or more hole loops.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPolygon {
  /// The outer loop of the polygon.
  pub geoloop: GeoLoop,
  /// Hole loops.
  pub holes: Vec<GeoLoop>,
}

/// Number of children per cell going from one resolution to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
pub enum Aperture {
  /// Aperture 3.
  Three = 3,
  /// Aperture 4.
  #[default]
  Four = 4,
  /// Aperture 7.
  Seven = 7,
}

impl Aperture {
  /// Linear scale factor between a resolution and its parent.
  #[inline]
  pub fn scale_factor(self) -> f64 {
    match self {
      Aperture::Three => crate::constants::M_SQRT3,
      Aperture::Four => 2.0,
      Aperture::Seven => crate::constants::M_SQRT7,
    }
  }

  #[inline]
  pub fn value(self) -> u32 {
    self as u32
  }
}

impl TryFrom<u32> for Aperture {
  type Error = DgError;

  fn try_from(value: u32) -> Result<Self, Self::Error> {
    match value {
      3 => Ok(Aperture::Three),
      4 => Ok(Aperture::Four),
      7 => Ok(Aperture::Seven),
      _ => Err(DgError::InvalidAperture(value.to_string())),
    }
  }
}

impl TryFrom<char> for Aperture {
  type Error = DgError;

  fn try_from(value: char) -> Result<Self, Self::Error> {
    match value {
      '3' => Ok(Aperture::Three),
      '4' => Ok(Aperture::Four),
      '7' => Ok(Aperture::Seven),
      _ => Err(DgError::InvalidAperture(value.to_string())),
    }
  }
}

impl fmt::Display for Aperture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", *self as u8)
  }
}

/// Cell shape of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Topology {
  #[default]
  Hexagon,
  Triangle,
  Diamond,
}

/// Icosahedral projection used to flatten the faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProjectionType {
  /// Snyder icosahedral equal area.
  #[default]
  Isea,
  /// Fuller/Dymaxion.
  Fuller,
}

/// Hierarchical indexing system attached to a grid system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum HierNdxSystem {
  #[default]
  None,
  ZOrder,
  Z3,
  Z7,
}

/// Coordinate and address representations known to the conversion graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AddressType {
  #[default]
  Geo,
  #[cfg_attr(feature = "serde", serde(rename = "PROJTRI"))]
  ProjTri,
  Vertex2dd,
  Q2dd,
  Q2di,
  Plane,
  Seqnum,
  Zorder,
  ZorderString,
  Z3,
  Z3String,
  Z7,
  Z7String,
}

impl AddressType {
  /// Every address type, in frame-index order.
  pub const ALL: [AddressType; 13] = [
    AddressType::Geo,
    AddressType::ProjTri,
    AddressType::Vertex2dd,
    AddressType::Q2dd,
    AddressType::Q2di,
    AddressType::Plane,
    AddressType::Seqnum,
    AddressType::Zorder,
    AddressType::ZorderString,
    AddressType::Z3,
    AddressType::Z3String,
    AddressType::Z7,
    AddressType::Z7String,
  ];

  /// Dense index used by the conversion arena.
  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  /// True for the discrete (cell-addressing) representations.
  pub fn is_discrete(self) -> bool {
    !matches!(
      self,
      AddressType::Geo | AddressType::ProjTri | AddressType::Vertex2dd | AddressType::Q2dd | AddressType::Plane
    )
  }
}

/// Errors raised anywhere in grid construction, conversion or generation.
///
/// Every error is fatal for a generation run; callers propagate it to the
/// top-level driver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DgError {
  /// Invalid or inconsistent configuration values.
  #[error("configuration error: {0}")]
  Config(String),
  /// Aperture value other than 3, 4 or 7.
  #[error("invalid aperture {0}; must be one of 3, 4 or 7")]
  InvalidAperture(String),
  /// Resolution beyond what the grid system can represent.
  #[error("resolution {res} exceeds the maximum resolution {max}")]
  Resolution { res: usize, max: usize },
  /// Hierarchical index system not usable with this grid.
  #[error("hierarchical index error: {0}")]
  HierNdx(String),
  /// A clip polygon vertex lies beyond the gnomonic horizon of its quad.
  #[error("clip polygon vertex lies more than 90 degrees from the center of quad {quad}; break-up polygon or reorient grid")]
  Projection { quad: u8 },
  /// An intersection result landed in more than one quad.
  #[error("intersection result for quad {quad} falls in multiple quads; adjust nudge")]
  NudgeFailure { quad: u8 },
  /// A coordinate remained out of range after nudging and remapping.
  #[error("{context}: coordinate {coord} out of range")]
  CoordinateRange { context: &'static str, coord: String },
  /// More than one axis overflowed in a way no edge rule covers.
  #[error("multiple overages for coordinate {0}")]
  MultipleOverage(String),
  /// A scaled clip coordinate exceeded the clipper's safe range.
  #[error("clip coordinate {0} out of range; reduce clipper_scale_factor and/or break-up large polygons")]
  ClipRange(String),
  /// Malformed address value.
  #[error("invalid address: {0}")]
  InvalidAddress(String),
  /// Malformed input record.
  #[error("{source_name}: invalid input: {content}")]
  Data { source_name: String, content: String },
  /// Invalid state reached during super fund traversal.
  #[error("super fund traversal: {0}")]
  Superfund(String),
  /// Underlying I/O failure.
  #[error("i/o error: {0}")]
  Io(String),
}

impl From<std::io::Error> for DgError {
  fn from(err: std::io::Error) -> Self {
    DgError::Io(err.to_string())
  }
}

/// Result alias used throughout the crate.
pub type DgResult<T> = Result<T, DgError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_aperture_from_char() {
    assert_eq!(Aperture::try_from('3'), Ok(Aperture::Three));
    assert_eq!(Aperture::try_from('7'), Ok(Aperture::Seven));
    assert!(matches!(Aperture::try_from('5'), Err(DgError::InvalidAperture(_))));
  }

  #[test]
  fn test_direction_try_from() {
    assert_eq!(Direction::try_from(5u8), Ok(Direction::IkAxes));
    assert!(Direction::try_from(8u8).is_err());
  }

  #[test]
  fn test_error_messages_carry_advice() {
    let e = DgError::Projection { quad: 3 };
    assert!(e.to_string().contains("break-up polygon or reorient grid"));
    let e = DgError::NudgeFailure { quad: 3 };
    assert!(e.to_string().contains("adjust nudge"));
  }
}
