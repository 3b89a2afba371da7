// src/grid/lattice.rs
//! Hexagon lattices on the quad substrate.
//!
//! Quad-local integer coordinates `(i, j)` are Eisenstein integers
//! `i + j·ω`, `ω` being the unit vector at 120 degrees. Every resolution
//! addresses its cells on a Class I substrate of `N'` points per quad edge;
//! Class II and Class III resolutions use only the multiples of a fixed
//! basis `β`, which rotates their lattice against the substrate.

use crate::constants::M_SQRT3_2;
use crate::math::extensions::_checked_ipow;
use crate::types::{CoordIJ, CoordIJK, DgError, DgResult, Vec2d};

/// Unit Eisenstein integers, counter-clockwise from the `i` axis.
pub(crate) static UNIT_NEIGHBORS: [CoordIJ; 6] = [
  CoordIJ { i: 1, j: 0 },
  CoordIJ { i: 1, j: 1 },
  CoordIJ { i: 0, j: 1 },
  CoordIJ { i: -1, j: 0 },
  CoordIJ { i: -1, j: -1 },
  CoordIJ { i: 0, j: -1 },
];

const CLASS_II_BASIS: CoordIJ = CoordIJ { i: 2, j: 1 };
const CLASS_III_BASIS: CoordIJ = CoordIJ { i: 3, j: 1 };

#[inline]
pub(crate) fn eis_mul(a: &CoordIJ, b: &CoordIJ) -> CoordIJ {
  CoordIJ::new(a.i * b.i - a.j * b.j, a.i * b.j + a.j * b.i - a.j * b.j)
}

#[inline]
pub(crate) fn eis_add(a: &CoordIJ, b: &CoordIJ) -> CoordIJ {
  CoordIJ::new(a.i + b.i, a.j + b.j)
}

#[inline]
pub(crate) fn eis_norm(a: &CoordIJ) -> i64 {
  a.i * a.i - a.i * a.j + a.j * a.j
}

/// Plane position of a (possibly fractional) Eisenstein coordinate.
#[inline]
pub(crate) fn eis_to_plane(i: f64, j: f64) -> Vec2d {
  Vec2d::new(i - 0.5 * j, j * M_SQRT3_2)
}

/// Fractional Eisenstein coordinates of a plane position.
#[inline]
pub(crate) fn plane_to_eis(v: &Vec2d) -> (f64, f64) {
  let j = v.y / M_SQRT3_2;
  (v.x + 0.5 * j, j)
}

/// The cell lattice of one resolution on its quad substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sublattice {
  size: i64,
  class_ii: bool,
  class_iii: bool,
  basis: CoordIJ,
  norm: i64,
}

impl Sublattice {
  /// Lattice reached after `n3`, `n4` and `n7` steps of aperture 3, 4 and 7.
  pub fn new(n3: usize, n4: usize, n7: usize) -> DgResult<Self> {
    let p2 = _checked_ipow(2, n4 as u32)?;
    let p3 = _checked_ipow(3, n3.div_ceil(2) as u32)?;
    let p7 = _checked_ipow(7, n7.div_ceil(2) as u32)?;
    let size = p2
      .checked_mul(p3)
      .and_then(|s| s.checked_mul(p7))
      .ok_or_else(|| DgError::Config(format!("grid with {n3}/{n4}/{n7} aperture 3/4/7 steps is too fine")))?;

    let class_ii = n3 % 2 == 1;
    let class_iii = n7 % 2 == 1;
    let mut basis = CoordIJ::new(1, 0);
    if class_ii {
      basis = eis_mul(&basis, &CLASS_II_BASIS);
    }
    if class_iii {
      basis = eis_mul(&basis, &CLASS_III_BASIS);
    }
    Ok(Sublattice {
      size,
      class_ii,
      class_iii,
      basis,
      norm: eis_norm(&basis),
    })
  }

  /// Substrate points per quad edge, `N'`.
  #[inline]
  pub fn size(&self) -> i64 {
    self.size
  }

  #[inline]
  pub fn max_i(&self) -> i64 {
    self.size - 1
  }

  #[inline]
  pub fn max_j(&self) -> i64 {
    self.size - 1
  }

  #[inline]
  pub fn is_class_i(&self) -> bool {
    !self.class_ii && !self.class_iii
  }

  #[inline]
  pub fn is_class_ii(&self) -> bool {
    self.class_ii
  }

  #[inline]
  pub fn is_class_iii(&self) -> bool {
    self.class_iii
  }

  #[inline]
  pub fn basis(&self) -> CoordIJ {
    self.basis
  }

  /// Substrate points per cell; also the period of valid `j` along a row.
  #[inline]
  pub fn norm(&self) -> i64 {
    self.norm
  }

  /// Cells owned by one equatorial quad.
  #[inline]
  pub fn cells_per_quad(&self) -> i64 {
    self.size * self.size / self.norm
  }

  #[inline]
  pub fn cells_per_row(&self) -> i64 {
    self.size / self.norm
  }

  /// True if `c` is a lattice point of this resolution.
  #[inline]
  pub fn is_lattice_point(&self, c: &CoordIJ) -> bool {
    (!self.class_ii || (c.i + c.j).rem_euclid(3) == 0) && (!self.class_iii || (2 * c.i + c.j).rem_euclid(7) == 0)
  }

  /// First valid `j` of row `i`.
  pub(crate) fn row_offset(&self, i: i64) -> i64 {
    (0..self.norm)
      .find(|&j| self.is_lattice_point(&CoordIJ::new(i, j)))
      .unwrap_or(0)
  }

  /// Nearest lattice point to fractional substrate coordinates.
  pub fn quantize(&self, i: f64, j: f64) -> CoordIJ {
    // divide by the basis: z * conj(b) / |b|^2
    let b = &self.basis;
    let n = self.norm as f64;
    let (bi, bj) = (b.i as f64, b.j as f64);
    let (ci, cj) = (bi - bj, -bj);
    let qi = (i * ci - j * cj) / n;
    let qj = (i * cj + j * ci - j * cj) / n;

    let w = CoordIJK::containing_hex(&eis_to_plane(qi, qj)).to_ij();
    eis_mul(&w, b)
  }

  /// Substrate offset to the neighbor in direction `k` (counter-clockwise
  /// from the basis direction).
  #[inline]
  pub fn neighbor_offset(&self, k: usize) -> CoordIJ {
    eis_mul(&UNIT_NEIGHBORS[k % 6], &self.basis)
  }

  /// Substrate offset, possibly fractional, of cell vertex `k`.
  #[inline]
  pub fn vertex_offset(&self, k: usize) -> (f64, f64) {
    let a = self.neighbor_offset(k);
    let b = self.neighbor_offset(k + 1);
    ((a.i + b.i) as f64 / 3.0, (a.j + b.j) as f64 / 3.0)
  }
}
