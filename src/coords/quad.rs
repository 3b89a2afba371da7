// src/coords/quad.rs

use crate::types::{CoordIJ, DgError, DgResult, Q2DICoord};

/// Adjacency of one equatorial quad.
///
/// Type 0 quads (1-5) touch the north pole vertex at their `e_j` corner;
/// type 1 quads (6-10) touch the south pole vertex at their `e_i` corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadEdgeCells {
  pub type0: bool,
  /// Polar quad sharing the lone corner vertex.
  pub lone_vert: u8,
  pub up: u8,
  pub down: u8,
  pub right: u8,
  pub left: u8,
}

const fn edges(type0: bool, lone_vert: u8, up: u8, down: u8, right: u8, left: u8) -> QuadEdgeCells {
  QuadEdgeCells {
    type0,
    lone_vert,
    up,
    down,
    right,
    left,
  }
}

#[rustfmt::skip]
pub static QUAD_EDGE_TABLE: [QuadEdgeCells; 12] = [
    edges(true,  0,  0,  0,  0,  0), // polar quad 0, unused
    edges(true,  0,  2, 10,  6,  5),
    edges(true,  0,  3,  6,  7,  1),
    edges(true,  0,  4,  7,  8,  2),
    edges(true,  0,  5,  8,  9,  3),
    edges(true,  0,  1,  9, 10,  4),
    edges(false, 11, 2, 10,  7,  1),
    edges(false, 11, 3,  6,  8,  2),
    edges(false, 11, 4,  7,  9,  3),
    edges(false, 11, 5,  8, 10,  4),
    edges(false, 11, 1,  9,  6,  5),
    edges(false, 11, 0,  0,  0,  0), // polar quad 11, unused
];

/// Returns true if `coord` lies in the native extent of an equatorial quad.
#[inline]
pub(crate) fn in_quad_range(coord: &CoordIJ, max_i: i64, max_j: i64) -> bool {
  coord.i >= 0 && coord.j >= 0 && coord.i <= max_i && coord.j <= max_j
}

/// Remaps a coordinate that lies past the edge or corner of its equatorial
/// quad onto the neighboring quad that owns it.
///
/// In-range coordinates are returned unchanged. Coordinates past two edges at
/// once are only accepted at the far corner, which belongs to a neighbor's
/// pentagon cell.
pub fn remap_overage(addr: &Q2DICoord, max_i: i64, max_j: i64) -> DgResult<Q2DICoord> {
  let (i, j) = (addr.coord.i, addr.coord.j);
  if !(1..=10).contains(&addr.quad) {
    return if i == 0 && j == 0 {
      Ok(*addr)
    } else {
      Err(DgError::CoordinateRange {
        context: "remap_overage",
        coord: addr.to_string(),
      })
    };
  }

  let over_i = i > max_i;
  let over_j = j > max_j;
  let under_i = i < 0;
  let under_j = j < 0;
  if !(over_i || over_j || under_i || under_j) {
    return Ok(*addr);
  }

  let te = max_i + 1;
  let ec = &QUAD_EDGE_TABLE[addr.quad as usize];
  let out_count = [over_i, over_j, under_i, under_j].iter().filter(|&&b| b).count();

  let remapped = if over_i && over_j {
    if i != te || j != te {
      return Err(DgError::MultipleOverage(addr.to_string()));
    }
    let quad = if ec.type0 { ec.up } else { ec.right };
    Q2DICoord::new(quad, 0, 0)
  } else if out_count > 1 {
    return Err(DgError::MultipleOverage(addr.to_string()));
  } else if under_i {
    if ec.type0 {
      Q2DICoord::new(ec.left, te - j + i, te + i)
    } else {
      Q2DICoord::new(ec.left, i + te, j)
    }
  } else if under_j {
    if ec.type0 {
      Q2DICoord::new(ec.down, i, te + j)
    } else {
      Q2DICoord::new(ec.down, te + j, te - i + j)
    }
  } else if over_i {
    if ec.type0 {
      Q2DICoord::new(ec.right, i - te, j)
    } else if j == 0 {
      Q2DICoord::new(ec.lone_vert, 0, 0)
    } else {
      let io = i - te;
      Q2DICoord::new(ec.right, te - j + io, io)
    }
  } else if ec.type0 {
    // over_j
    if i == 0 {
      Q2DICoord::new(ec.lone_vert, 0, 0)
    } else {
      let jo = j - te;
      Q2DICoord::new(ec.up, jo, te - i + jo)
    }
  } else {
    Q2DICoord::new(ec.up, i, j - te)
  };

  let ok = match remapped.quad {
    0 | 11 => remapped.coord.i == 0 && remapped.coord.j == 0,
    _ => in_quad_range(&remapped.coord, max_i, max_j),
  };
  if !ok {
    return Err(DgError::CoordinateRange {
      context: "remap_overage",
      coord: format!("{addr} -> {remapped}"),
    });
  }
  Ok(remapped)
}

#[cfg(test)]
mod tests {
  use super::*;

  const MAX: i64 = 8;

  #[test]
  fn test_in_range_is_identity() {
    let a = Q2DICoord::new(4, 3, 5);
    assert_eq!(remap_overage(&a, MAX, MAX).unwrap(), a);
  }

  #[test]
  fn test_right_edge_round_trip() {
    for q in 1..=5u8 {
      let right = QUAD_EDGE_TABLE[q as usize].right;
      for j in 0..=MAX {
        let across = remap_overage(&Q2DICoord::new(q, MAX + 1, j), MAX, MAX).unwrap();
        assert_eq!(across, Q2DICoord::new(right, 0, j));
        let back = remap_overage(&Q2DICoord::new(right, -1, j), MAX, MAX).unwrap();
        assert_eq!(back, Q2DICoord::new(q, MAX, j));
      }
    }
  }

  #[test]
  fn test_pole_corners() {
    assert_eq!(
      remap_overage(&Q2DICoord::new(3, 0, MAX + 1), MAX, MAX).unwrap(),
      Q2DICoord::new(0, 0, 0)
    );
    assert_eq!(
      remap_overage(&Q2DICoord::new(8, MAX + 1, 0), MAX, MAX).unwrap(),
      Q2DICoord::new(11, 0, 0)
    );
  }

  #[test]
  fn test_far_corner_is_neighbor_pentagon() {
    assert_eq!(
      remap_overage(&Q2DICoord::new(5, MAX + 1, MAX + 1), MAX, MAX).unwrap(),
      Q2DICoord::new(1, 0, 0)
    );
    assert_eq!(
      remap_overage(&Q2DICoord::new(10, MAX + 1, MAX + 1), MAX, MAX).unwrap(),
      Q2DICoord::new(6, 0, 0)
    );
  }

  #[test]
  fn test_multiple_overage_is_error() {
    let err = remap_overage(&Q2DICoord::new(2, -1, -1), MAX, MAX).unwrap_err();
    assert!(matches!(err, DgError::MultipleOverage(_)));
  }

  #[test]
  fn test_far_out_of_range_is_error() {
    let err = remap_overage(&Q2DICoord::new(2, 3 * MAX, 1), MAX, MAX).unwrap_err();
    assert!(matches!(err, DgError::CoordinateRange { .. }));
  }
}
