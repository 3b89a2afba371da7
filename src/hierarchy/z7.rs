// src/hierarchy/z7.rs
//! Z7 indices for pure aperture 7 grids.
//!
//! A Z7 index is a base cell (one of the twelve resolution 0 pentagons)
//! followed by one lattice digit per resolution, found by walking the cell
//! up through the alternating counter-clockwise and clockwise aperture 7
//! lattices. Cells around the two polar base cells are indexed in the frame
//! of quad 1 (north) or quad 10 (south).

use super::radix::{join_index, split_index, PackedLayout};
use super::{check_index_cell, check_pure};
use crate::coords::quad::{in_quad_range, remap_overage, QUAD_EDGE_TABLE};
use crate::grid::Idgg;
use crate::types::{Aperture, CoordIJ, CoordIJK, DgError, DgResult, Direction, Q2DICoord};

/// Packed Z7 layout: 3 bits per digit through resolution 20.
pub(crate) const Z7_LAYOUT: PackedLayout = PackedLayout {
  digit_bits: 3,
  max_res: 20,
};

fn check_z7(idgg: &Idgg) -> DgResult<()> {
  if idgg.res() == 0 || (idgg.aperture() == Aperture::Seven && check_pure(idgg, Aperture::Seven).is_ok()) {
    Ok(())
  } else {
    Err(DgError::HierNdx(format!(
      "Z7 indexing requires a pure aperture 7 grid, got aperture {} at resolution {}",
      idgg.aperture(),
      idgg.res()
    )))
  }
}

fn rotate_cw(c: &CoordIJ, sixths: u8) -> CoordIJ {
  (0..sixths)
    .fold(CoordIJK::from_ij(*c), |ijk, _| ijk.rotate60_cw())
    .to_ij()
}

/// Base cell and per-resolution digits of a cell.
pub fn q2di_to_z7_digits(idgg: &Idgg, addr: &Q2DICoord) -> DgResult<(u8, Vec<Direction>)> {
  check_z7(idgg)?;
  check_index_cell(idgg, addr)?;
  let res = idgg.res();
  let mut digits = vec![Direction::Center; res];
  if addr.quad == 0 || addr.quad == 11 || res == 0 {
    return Ok((addr.quad, digits));
  }

  let mut ijk = CoordIJK::from_ij(addr.coord);
  if res % 2 == 1 {
    // Class III cells are multiples of the basis on their substrate
    ijk = ijk.up_ap7r();
  }
  for r in (1..=res).rev() {
    let last = ijk;
    let center = if r % 2 == 1 {
      ijk = ijk.up_ap7();
      ijk.down_ap7()
    } else {
      ijk = ijk.up_ap7r();
      ijk.down_ap7r()
    };
    let digit = (last - center).unit_digit();
    if digit == Direction::InvalidDigit {
      return Err(DgError::CoordinateRange {
        context: "q2di_to_z7_digits",
        coord: addr.to_string(),
      });
    }
    digits[r - 1] = digit;
  }

  let corner = ijk.to_ij();
  let base = match (corner.i, corner.j) {
    (0, 0) => addr.quad,
    (0 | 1, 0 | 1) => {
      remap_overage(
        &Q2DICoord {
          quad: addr.quad,
          coord: corner,
        },
        0,
        0,
      )?
      .quad
    }
    _ => {
      return Err(DgError::CoordinateRange {
        context: "q2di_to_z7_digits",
        coord: format!("{addr} -> base {corner}"),
      })
    }
  };

  let rotations = match base {
    0 => addr.quad - 1,
    11 => 10 - addr.quad,
    _ => 0,
  };
  for _ in 0..rotations {
    for d in &mut digits {
      *d = d.rotate60_ccw();
    }
  }
  Ok((base, digits))
}

/// Cell addressed by a base cell and its digits.
pub fn z7_digits_to_q2di(idgg: &Idgg, base: u8, digits: &[Direction]) -> DgResult<Q2DICoord> {
  check_z7(idgg)?;
  if digits.len() != idgg.res() || base > 11 {
    return Err(DgError::InvalidAddress(format!(
      "Z7 base cell {base} with {} digits at resolution {}",
      digits.len(),
      idgg.res()
    )));
  }
  if digits.iter().all(|&d| d == Direction::Center) {
    return Ok(Q2DICoord::new(base, 0, 0));
  }

  let mut ijk = CoordIJK::default();
  for (n, &d) in digits.iter().enumerate() {
    if d == Direction::InvalidDigit {
      return Err(DgError::InvalidAddress(format!("Z7 digit 7 at resolution {}", n + 1)));
    }
    let center = if n % 2 == 0 { ijk.down_ap7() } else { ijk.down_ap7r() };
    ijk = center.neighbor(d);
  }
  if digits.len() % 2 == 1 {
    ijk = ijk.down_ap7r();
  }
  let s = ijk.to_ij();

  let n = idgg.lattice().size();
  let (max_i, max_j) = (idgg.max_i(), idgg.max_j());
  // the sixth rotation folds the missing wedge onto the first quad of the ring
  let addr = match base {
    0 => (0..6u8).find_map(|k| {
      let o = rotate_cw(&s, k);
      let c = CoordIJ::new(o.i, o.j + n);
      in_quad_range(&c, max_i, max_j).then_some(Q2DICoord { quad: 1 + k % 5, coord: c })
    }),
    11 => (0..6u8).find_map(|k| {
      let o = rotate_cw(&s, k);
      let c = CoordIJ::new(o.i + n, o.j);
      in_quad_range(&c, max_i, max_j).then_some(Q2DICoord { quad: 10 - k % 5, coord: c })
    }),
    _ => {
      let ec = &QUAD_EDGE_TABLE[base as usize];
      let (mut c, mut quad) = (s, base);
      if ec.type0 {
        if c.j < 0 {
          c.j += n;
          if c.i < 0 {
            c.i += n;
            quad = ec.left;
          } else {
            quad = ec.down;
          }
        }
      } else if c.i < 0 {
        c.i += n;
        if c.j < 0 {
          c.j += n;
          quad = ec.down;
        } else {
          quad = ec.left;
        }
      }
      if in_quad_range(&c, max_i, max_j) {
        Some(Q2DICoord { quad, coord: c })
      } else {
        remap_overage(&Q2DICoord { quad: base, coord: s }, max_i, max_j).ok()
      }
    }
  };

  let addr = addr.ok_or_else(|| {
    DgError::InvalidAddress(format!("Z7 base cell {base} digits do not address a cell at resolution {}", idgg.res()))
  })?;
  check_index_cell(idgg, &addr)?;
  Ok(addr)
}

fn parse_digits(s: &str) -> DgResult<(u8, Vec<Direction>)> {
  let (base, raw) = split_index(s)?;
  let digits = raw
    .into_iter()
    .map(|d| match Direction::try_from(d) {
      Ok(Direction::InvalidDigit) | Err(_) => Err(DgError::InvalidAddress(format!("Z7 index \"{s}\" has digit {d}"))),
      Ok(dir) => Ok(dir),
    })
    .collect::<DgResult<Vec<_>>>()?;
  Ok((base, digits))
}

/// Z7 string of a cell.
pub fn q2di_to_z7_string(idgg: &Idgg, addr: &Q2DICoord) -> DgResult<String> {
  let (base, digits) = q2di_to_z7_digits(idgg, addr)?;
  let raw: Vec<u8> = digits.iter().map(|&d| d as u8).collect();
  Ok(join_index(base, &raw))
}

/// Cell addressed by a Z7 string.
pub fn z7_string_to_q2di(idgg: &Idgg, s: &str) -> DgResult<Q2DICoord> {
  let (base, digits) = parse_digits(s)?;
  z7_digits_to_q2di(idgg, base, &digits)
}

/// Packs a Z7 string; unused digits are 7.
pub fn z7_string_to_int(s: &str) -> DgResult<u64> {
  let (base, digits) = parse_digits(s)?;
  let raw: Vec<u8> = digits.iter().map(|&d| d as u8).collect();
  Z7_LAYOUT.pack(base, &raw, Direction::InvalidDigit as u8)
}

/// Z7 string of the first `res` digits of a packed index.
pub fn z7_int_to_string(z: u64, res: usize) -> DgResult<String> {
  let (base, digits) = Z7_LAYOUT.unpack(z, res)?;
  if base > 11 || digits.iter().any(|&d| d > 6) {
    return Err(DgError::InvalidAddress(format!("invalid Z7 index {z:016x} at resolution {res}")));
  }
  Ok(join_index(base, &digits))
}

/// Z7 string of the parent one resolution coarser.
pub fn z7_parent(s: &str) -> DgResult<String> {
  super::drop_last_digit(s)
}

/// Z7 strings of the children in the next finer grid `child`. The child of a
/// pentagon that falls in the missing wedge is omitted.
pub fn z7_children(child: &Idgg, s: &str) -> DgResult<Vec<String>> {
  check_z7(child)?;
  super::append_valid_digits(s, 6, |c| z7_string_to_q2di(child, c).and_then(|a| q2di_to_z7_string(child, &a)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hierarchy::tests::pure_grid;

  #[test]
  fn test_base_cells() {
    let g = pure_grid(Aperture::Seven, 0);
    for q in 0..12u8 {
      assert_eq!(q2di_to_z7_string(&g, &Q2DICoord::new(q, 0, 0)).unwrap(), format!("{q:02}"));
    }
  }

  #[test]
  fn test_every_cell_round_trips() {
    for res in 1..=3 {
      let g = pure_grid(Aperture::Seven, res);
      let mut seen = std::collections::HashSet::new();
      for cell in g.cells() {
        let s = q2di_to_z7_string(&g, &cell).unwrap();
        assert_eq!(s.len(), 2 + res);
        assert_eq!(z7_string_to_q2di(&g, &s).unwrap(), cell, "{s}");
        assert_eq!(z7_int_to_string(z7_string_to_int(&s).unwrap(), res).unwrap(), s);
        assert!(seen.insert(s));
      }
    }
  }

  #[test]
  fn test_pentagons_have_six_children() {
    let child = pure_grid(Aperture::Seven, 1);
    let mut total = 0;
    for q in 0..12u8 {
      let kids = z7_children(&child, &format!("{q:02}")).unwrap();
      assert_eq!(kids.len(), 6, "base cell {q}");
      assert!(kids.contains(&format!("{q:02}0")));
      total += kids.len() as u64;
    }
    assert_eq!(total, child.n_cells());
  }

  #[test]
  fn test_parent_is_prefix_of_children() {
    let parent = pure_grid(Aperture::Seven, 1);
    let child = pure_grid(Aperture::Seven, 2);
    for cell in parent.cells().filter(|c| c.quad == 4) {
      let s = q2di_to_z7_string(&parent, &cell).unwrap();
      let kids = z7_children(&child, &s).unwrap();
      assert!(!kids.is_empty() && kids.len() <= 7, "{s}");
      for k in kids {
        assert_eq!(z7_parent(&k).unwrap(), s);
      }
    }
  }

  #[test]
  fn test_packed_padding() {
    let z = z7_string_to_int("0316").unwrap();
    assert_eq!(z >> 60, 3);
    assert_eq!(z & 0x7, 0x7);
    assert!(z7_string_to_int("0317").is_err());
    assert!(z7_int_to_string(z, 3).is_err());
  }
}
