// src/grid/stats.rs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{ICOSA_EDGE_RADS, M_PI};
use crate::latlng::sphere_area_km2;
use crate::types::{DgError, DgResult};

/// Size figures for one resolution of a grid system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridStats {
  pub res: usize,
  pub n_cells: u64,
  /// Average cell area; the twelve pentagons count as five sixths of a hexagon.
  pub cell_area_km2: f64,
  /// Approximate distance between neighboring cell centers.
  pub cell_dist_km: f64,
  /// Diameter of the spherical cap with the average cell area.
  pub cls_km: f64,
}

impl GridStats {
  /// `scale` is the product of the linear scale factors of every step into `res`.
  pub fn new(res: usize, n_cells: u64, scale: f64, radius_km: f64) -> Self {
    let cell_area_km2 = sphere_area_km2(radius_km) / (n_cells - 2) as f64;
    let cls_km = 2.0 * 2.0 * radius_km * ((cell_area_km2 / M_PI).sqrt() / (2.0 * radius_km)).asin();
    GridStats {
      res,
      n_cells,
      cell_area_km2,
      cell_dist_km: ICOSA_EDGE_RADS * radius_km / scale,
      cls_km,
    }
  }
}

/// Cell size figure used to pick a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResMetric {
  CellArea,
  IntercellDistance,
}

/// Finest resolution in `stats` whose metric brackets `target`.
///
/// `stats` is ordered by resolution. The scan starts at resolution 1 with a
/// zero lower bracket, so resolution 1 is only chosen on an exact match and a
/// target coarser than resolution 1 is out of range like one finer than the
/// last resolution. When `target` falls strictly between two resolutions,
/// `round_down` picks the finer one and otherwise the coarser one.
pub fn determine_res(stats: &[GridStats], target: f64, metric: ResMetric, round_down: bool) -> DgResult<usize> {
  let value = |s: &GridStats| match metric {
    ResMetric::CellArea => s.cell_area_km2,
    ResMetric::IntercellDistance => s.cell_dist_km,
  };
  let max = stats.last().map_or(0, |s| s.res);

  let mut last = 0.0;
  for s in stats.iter().filter(|s| s.res >= 1) {
    let next = value(s);
    if target == next {
      return Ok(s.res);
    }
    if target < last && target > next {
      return Ok(if round_down { s.res } else { s.res - 1 });
    }
    last = next;
  }
  Err(DgError::Resolution { res: max + 1, max })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::DEFAULT_RADIUS_KM;
  use approx::assert_relative_eq;

  fn ap4_stats(max: usize) -> Vec<GridStats> {
    let mut n = 12u64;
    (0..=max)
      .map(|r| {
        if r > 0 {
          n = (n - 2) * 4 + 2;
        }
        GridStats::new(r, n, 2f64.powi(r as i32), DEFAULT_RADIUS_KM)
      })
      .collect()
  }

  #[test]
  fn test_res0_area() {
    let s = GridStats::new(0, 12, 1.0, DEFAULT_RADIUS_KM);
    assert_relative_eq!(s.cell_area_km2 * 10.0, sphere_area_km2(DEFAULT_RADIUS_KM), max_relative = 1e-12);
    assert_relative_eq!(s.cell_dist_km, 7053.652_431_4, max_relative = 1e-9);
  }

  #[test]
  fn test_determine_res_rounding() {
    let stats = ap4_stats(10);
    let target = (stats[5].cell_area_km2 + stats[6].cell_area_km2) / 2.0;
    assert_eq!(determine_res(&stats, target, ResMetric::CellArea, true).unwrap(), 6);
    assert_eq!(determine_res(&stats, target, ResMetric::CellArea, false).unwrap(), 5);
    let exact = stats[3].cell_dist_km;
    assert_eq!(determine_res(&stats, exact, ResMetric::IntercellDistance, false).unwrap(), 3);
  }

  #[test]
  fn test_determine_res_too_fine() {
    let stats = ap4_stats(4);
    let err = determine_res(&stats, 1e-3, ResMetric::CellArea, true).unwrap_err();
    assert!(matches!(err, DgError::Resolution { res: 5, max: 4 }));
  }

  #[test]
  fn test_determine_res_coarser_than_res1() {
    let stats = ap4_stats(4);
    let between = (stats[0].cell_area_km2 + stats[1].cell_area_km2) / 2.0;
    for target in [between, stats[0].cell_area_km2, 2.0 * stats[0].cell_area_km2] {
      let err = determine_res(&stats, target, ResMetric::CellArea, true).unwrap_err();
      assert!(matches!(err, DgError::Resolution { res: 5, max: 4 }));
    }
    assert_eq!(determine_res(&stats, stats[1].cell_area_km2, ResMetric::CellArea, false).unwrap(), 1);
    let target = (stats[1].cell_area_km2 + stats[2].cell_area_km2) / 2.0;
    assert_eq!(determine_res(&stats, target, ResMetric::CellArea, false).unwrap(), 1);
  }
}
