// tests/aperture_tests.rs

use xs_dggs::*;

fn grids(dggs_type: DggsType, res: usize) -> Idggs {
  let mut cfg = GenConfig::preset(dggs_type);
  cfg.dggs_res_spec = res;
  match cfg.build_idggs() {
    Ok(g) => g,
    Err(e) => panic!("build_idggs({dggs_type:?}, {res}) failed: {e:?}"),
  }
}

fn expected_cells(seq: &[u64]) -> u64 {
  10 * seq.iter().product::<u64>() + 2
}

#[test]
fn test_pure_cell_counts() {
  for (t, ap) in [(DggsType::Isea3h, 3), (DggsType::Isea4h, 4), (DggsType::Isea7h, 7)] {
    let g = grids(t, 5);
    for res in 0..=5 {
      let n = g.idgg(res).unwrap().n_cells();
      assert_eq!(n, expected_cells(&vec![ap; res]), "{t:?} res {res}");
    }
  }
}

#[test]
fn test_mixed43_cell_counts() {
  let mut cfg = GenConfig::preset(DggsType::Isea43h);
  cfg.dggs_num_aperture_4_res = 2;
  cfg.dggs_res_spec = 5;
  let g = cfg.build_idggs().unwrap();
  assert_eq!(g.aperture_sequence().to_string(), "44333");
  assert_eq!(g.idgg(1).unwrap().n_cells(), 42);
  assert_eq!(g.idgg(2).unwrap().n_cells(), 162);
  assert_eq!(g.idgg(3).unwrap().n_cells(), 482);
  assert_eq!(g.idgg(5).unwrap().n_cells(), expected_cells(&[4, 4, 3, 3, 3]));
}

#[test]
fn test_planetrisk_sequence() {
  let g = grids(DggsType::Planetrisk, 11);
  assert_eq!(g.max_res(), 11);
  assert_eq!(g.idgg(5).unwrap().n_cells(), expected_cells(&[4, 3, 3, 3, 4]));
  assert_eq!(g.idgg(6).unwrap().aperture(), Aperture::Seven);
  assert_eq!(g.idgg(6).unwrap().n_cells(), expected_cells(&[4, 3, 3, 3, 4, 7]));
}

#[test]
fn test_sequence_parsing() {
  let seq: ApertureSequence = "437".parse().unwrap();
  assert_eq!(seq.last_res(), 3);
  assert_eq!(seq.get_aperture(1), Ok(Aperture::Four));
  assert_eq!(seq.get_aperture(3), Ok(Aperture::Seven));
  assert!(matches!(seq.get_aperture(0), Err(DgError::Resolution { .. })));
  assert!(matches!(seq.get_aperture(4), Err(DgError::Resolution { res: 4, max: 3 })));
  assert_eq!(seq.counts_through(3), (1, 1, 1));
  assert_eq!(seq.pure_aperture(), None);

  assert!(matches!("435".parse::<ApertureSequence>(), Err(DgError::InvalidAperture(_))));
}

#[test]
fn test_sequence_too_short_for_resolution() {
  let mut cfg = GenConfig::default();
  cfg.dggs_aperture_type = ApertureType::Sequence;
  cfg.dggs_aperture_sequence = "4334".parse().unwrap();
  cfg.dggs_res_spec = 6;
  assert!(cfg.build_idggs().is_err());

  cfg.dggs_res_spec = 4;
  let g = cfg.build_idggs().unwrap();
  assert_eq!(g.idgg(4).unwrap().n_cells(), expected_cells(&[4, 3, 3, 4]));
}

#[test]
fn test_stats_shrink_with_resolution() {
  let g = grids(DggsType::Isea3h, 6);
  let stats = g.all_stats();
  assert_eq!(stats.len(), 7);
  for pair in stats.windows(2) {
    assert!(pair[1].cell_area_km2 < pair[0].cell_area_km2);
    assert!(pair[1].cell_dist_km < pair[0].cell_dist_km);
  }
  // every step of aperture 3 divides the area by three
  let ratio = stats[4].cell_area_km2 / stats[5].cell_area_km2;
  approx::assert_relative_eq!(ratio, 3.0, max_relative = 1e-3);
}

#[test]
fn test_resolution_from_area() {
  let g = grids(DggsType::Isea4h, 8);
  let stats = g.all_stats();
  let target = (stats[4].cell_area_km2 + stats[5].cell_area_km2) / 2.0;
  assert_eq!(determine_res(stats, target, ResMetric::CellArea, true), Ok(5));
  assert_eq!(determine_res(stats, target, ResMetric::CellArea, false), Ok(4));
  assert_eq!(determine_res(stats, stats[3].cell_area_km2, ResMetric::CellArea, true), Ok(3));
}
