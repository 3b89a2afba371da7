// src/generator/superfund.rs
//! Depth first traversal of the Superfund mixed aperture 4/3 hierarchy.
//!
//! Every node carries a child set type (one letter) that decides which of
//! its neighbours at the next finer resolution it owns. The first
//! `num_ap4` steps are aperture 4, the rest alternate between aperture 3
//! Class II and Class I (the "3r" steps). Each leaf is labelled with its
//! Superfund index: a two digit resolution 1 tile number followed by one
//! digit per aperture 4 step and one per pair of aperture 3 steps.

use crate::types::{CoordIJ, CoordIJK, DgError, DgResult, Direction, Q2DICoord};

/// Child set tables. Position 0 is the type of the center child; an
/// alphabetic entry at position `d` puts a child of that type in direction
/// `d` from the center.
const CS_4: &[u8; 8] = b"A1A3B5B7";
const CS_3A: &[u8; 8] = b"A123F5D7";
const CS_3B: &[u8; 8] = b"E123C5B7";
const CS_3R: [&[u8; 8]; 6] = [
  b"A123B5B7", // A
  b"A123BA67", // B
  b"BA234B67", // C
  b"BA2A4567", // D
  b"B1BA4567", // E
  b"A1A345B7", // F
];

/// Type of the resolution 0 base tiles.
pub const BASE_TILE_TYPE: u8 = b'P';

/// Aperture 4 steps of the Superfund grid.
pub const SUPERFUND_NUM_AP4: usize = 2;

/// Superfund resolutions 1 and 2 are the two aperture 4 steps; every later
/// Superfund resolution spans an aperture 3 Class II/Class I pair.
pub fn sf_res_to_actual_res(sf_res: usize) -> usize {
  if sf_res <= 2 {
    sf_res
  } else {
    2 * sf_res - 2
  }
}

/// Collapses a pair of aperture 3 digits into the single digit that
/// names the pair.
fn collapse_pair(first: u8, second: u8) -> Option<u8> {
  match (first, second) {
    (b'1'..=b'3', b'1'..=b'3') => Some(b'1' + (first - b'1') * 3 + (second - b'1')),
    _ => None,
  }
}

/// One node of the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfCell {
  pub quad: u8,
  pub res: usize,
  /// Position in the lattice of this node's own class.
  pub ijk: CoordIJK,
  pub class_i: bool,
  /// Child set type, `'A'..='F'` or [`BASE_TILE_TYPE`].
  pub kind: u8,
  /// Direction digits taken from the base tile down to this node.
  pub ci_ndx: String,
  /// Superfund digits below the resolution 1 tile digit.
  pub sf_ndx: String,
}

/// Receives the leaves of a traversal.
pub trait SfVisitor {
  /// Whether to descend into a resolution 1 tile.
  fn use_tile(&mut self, _tile: &SfCell) -> DgResult<bool> {
    Ok(true)
  }

  /// Tests and emits one leaf, returning whether it was accepted.
  fn visit(&mut self, leaf: &SfCell) -> DgResult<bool>;
}

impl SfCell {
  /// The resolution 0 tile of `quad`.
  pub fn base(quad: u8) -> Self {
    SfCell {
      quad,
      res: 0,
      ijk: CoordIJK::new(0, 0, 0),
      class_i: true,
      kind: BASE_TILE_TYPE,
      ci_ndx: String::new(),
      sf_ndx: String::new(),
    }
  }

  /// The grid cell of this node. Class II nodes live on the substrate of
  /// the next finer Class I lattice.
  pub fn coord(&self) -> CoordIJ {
    if self.class_i {
      self.ijk.to_ij()
    } else {
      self.ijk.down_ap3r().to_ij()
    }
  }

  pub fn q2di(&self) -> Q2DICoord {
    Q2DICoord {
      quad: self.quad,
      coord: self.coord(),
    }
  }

  /// The Superfund label: the resolution 1 tile, 10 through 51, then the
  /// remaining digits.
  pub fn superfund_index(&self) -> String {
    let mut digits = self.sf_ndx.bytes();
    let tile = match (self.quad, digits.next()) {
      (0, _) => 10,
      (q, Some(d)) => 11 + (u32::from(q) - 1) * 4 + u32::from(d.saturating_sub(b'1')),
      (q, None) => 11 + (u32::from(q) - 1) * 4,
    };
    format!("{tile:02}{}", digits.map(char::from).collect::<String>())
  }

  /// Adds one aperture 3 digit. A digit reaching a Class I node is folded
  /// into the Class II digit before it.
  pub(crate) fn add_sf3_digit(&mut self, digit: u8) -> DgResult<()> {
    let Some(last) = self.sf_ndx.bytes().last().filter(|_| self.class_i) else {
      self.sf_ndx.push(char::from(digit));
      return Ok(());
    };
    let folded = collapse_pair(last, digit).ok_or_else(|| {
      DgError::Superfund(format!(
        "no digit for the aperture 3 pair {}{} under {}",
        char::from(last),
        char::from(digit),
        self.ci_ndx
      ))
    })?;
    self.sf_ndx.pop();
    self.sf_ndx.push(char::from(folded));
    Ok(())
  }

  /// Visits every leaf below this node at `target_res`, returning the
  /// number of leaves accepted.
  pub fn depth_first<V: SfVisitor>(&self, target_res: usize, num_ap4: usize, visitor: &mut V) -> DgResult<u64> {
    if self.res == target_res {
      return Ok(u64::from(visitor.visit(self)?));
    }

    let child_res = self.res + 1;
    let num_ap3 = child_res.saturating_sub(num_ap4);
    let child_class_i = num_ap3 % 2 == 0;
    let plain_sf = num_ap3 <= 1;

    // polar quads hold a single cell at every resolution
    if self.quad == 0 || self.quad == 11 {
      let mut child = SfCell {
        res: child_res,
        class_i: child_class_i,
        ijk: CoordIJK::new(0, 0, 0),
        ..self.clone()
      };
      child.ci_ndx.push('1');
      if plain_sf {
        child.sf_ndx.push('1');
      } else {
        child.add_sf3_digit(b'1')?;
      }
      return child.depth_first(target_res, num_ap4, visitor);
    }

    if self.res == 1 && !visitor.use_tile(self)? {
      return Ok(0);
    }

    let (center, table) = if child_res <= num_ap4 {
      (self.ijk.scaled(2), CS_4)
    } else if !child_class_i {
      let table = if self.kind == b'A' { CS_3A } else { CS_3B };
      (self.ijk.down_ap3(), table)
    } else {
      let table = match self.kind {
        b'A'..=b'F' => CS_3R[usize::from(self.kind - b'A')],
        other => {
          return Err(DgError::Superfund(format!(
            "child set type '{}' has no aperture 3 Class I table",
            char::from(other)
          )))
        }
      };
      (self.ijk.down_ap3r(), table)
    };

    let mut accepted = 0;
    let mut sf_digit = b'1';
    for (d, &kind) in table.iter().enumerate() {
      if d > 0 && !kind.is_ascii_alphabetic() {
        continue;
      }
      let digit = d as u8;
      let ijk = center.neighbor(Direction::try_from(digit)?);
      let mut child = SfCell {
        quad: self.quad,
        res: child_res,
        ijk,
        class_i: child_class_i,
        kind,
        ci_ndx: self.ci_ndx.clone(),
        sf_ndx: self.sf_ndx.clone(),
      };
      child.ci_ndx.push(char::from(b'0' + digit.max(1)));
      if plain_sf {
        child.sf_ndx.push(char::from(sf_digit));
      } else {
        child.add_sf3_digit(sf_digit)?;
      }
      sf_digit += 1;
      accepted += child.depth_first(target_res, num_ap4, visitor)?;
    }
    Ok(accepted)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;
  use crate::config::{DggsType, GenConfig};
  use crate::grid::Idggs;

  #[derive(Default)]
  struct Collect {
    cells: Vec<(Q2DICoord, String)>,
  }

  impl SfVisitor for Collect {
    fn visit(&mut self, leaf: &SfCell) -> DgResult<bool> {
      self.cells.push((leaf.q2di(), leaf.superfund_index()));
      Ok(true)
    }
  }

  fn traverse(res: usize) -> Collect {
    let mut c = Collect::default();
    for q in 0..12 {
      SfCell::base(q).depth_first(res, SUPERFUND_NUM_AP4, &mut c).unwrap();
    }
    c
  }

  fn superfund_grids(sf_res: usize) -> Idggs {
    let mut cfg = GenConfig::preset(DggsType::Superfund);
    cfg.dggs_res_spec = sf_res;
    cfg.build_idggs().unwrap()
  }

  #[test]
  fn test_res_mapping() {
    assert_eq!(sf_res_to_actual_res(0), 0);
    assert_eq!(sf_res_to_actual_res(2), 2);
    assert_eq!(sf_res_to_actual_res(3), 4);
    assert_eq!(sf_res_to_actual_res(9), 16);
  }

  #[test]
  fn test_leaves_cover_grid() {
    let grids = superfund_grids(4);
    for res in 0..=6 {
      let idgg = grids.idgg(res).unwrap();
      let c = traverse(res);
      assert_eq!(c.cells.len() as u64, idgg.n_cells(), "res {res}");
      let unique: BTreeSet<_> = c.cells.iter().map(|(a, _)| *a).collect();
      assert_eq!(unique.len(), c.cells.len(), "res {res}");
      assert!(unique.iter().all(|a| idgg.is_valid(a)), "res {res}");
    }
  }

  #[test]
  fn test_labels() {
    let c = traverse(1);
    let labels: Vec<&str> = c.cells.iter().map(|(_, l)| l.as_str()).collect();
    assert_eq!(labels[0], "10");
    assert_eq!(&labels[1..5], &["11", "12", "13", "14"]);
    assert_eq!(*labels.last().unwrap(), "51");

    // the pair collapse keeps one digit per Superfund resolution
    let c = traverse(sf_res_to_actual_res(3));
    assert!(c.cells.iter().all(|(_, l)| l.len() == 4));
    let unique: BTreeSet<_> = c.cells.iter().map(|(_, l)| l.clone()).collect();
    assert_eq!(unique.len(), c.cells.len());
  }

  #[test]
  fn test_sf3_digit_collapse() {
    let mut cell = SfCell::base(3);
    cell.sf_ndx = "123".into();
    cell.class_i = true;
    cell.add_sf3_digit(b'2').unwrap();
    assert_eq!(cell.sf_ndx, "128");
    cell.class_i = false;
    cell.add_sf3_digit(b'1').unwrap();
    assert_eq!(cell.sf_ndx, "1281");
    cell.class_i = true;
    assert!(matches!(cell.add_sf3_digit(b'4'), Err(DgError::Superfund(_))));
  }

  #[test]
  fn test_polar_chain() {
    let mut c = Collect::default();
    let n = SfCell::base(11).depth_first(4, SUPERFUND_NUM_AP4, &mut c).unwrap();
    assert_eq!(n, 1);
    assert_eq!(c.cells[0].0, Q2DICoord::new(11, 0, 0));
    assert_eq!(c.cells[0].1, "5111");
  }
}
