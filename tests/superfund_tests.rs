// tests/superfund_tests.rs

use std::collections::BTreeSet;

use xs_dggs::*;

fn superfund(sf_res: usize) -> GenConfig {
  let mut cfg = GenConfig::preset(DggsType::Superfund);
  cfg.dggs_res_spec = sf_res;
  cfg
}

/// The plain mixed 4/3 grid the Superfund grid is built on.
fn mixed43(res: usize) -> GenConfig {
  let mut cfg = GenConfig::preset(DggsType::Isea43h);
  cfg.dggs_num_aperture_4_res = 2;
  cfg.dggs_res_spec = res;
  cfg
}

fn run(cfg: GenConfig) -> (GenSummary, Vec<GeneratedCell>) {
  let mut sink = CollectSink::default();
  match generate(cfg, &mut sink) {
    Ok(summary) => (summary, sink.cells),
    Err(e) => panic!("generation failed: {e:?}"),
  }
}

#[test]
fn test_resolution_mapping() {
  assert_eq!(sf_res_to_actual_res(1), 1);
  assert_eq!(sf_res_to_actual_res(2), 2);
  assert_eq!(sf_res_to_actual_res(4), 6);
  assert_eq!(superfund(4).target_res().unwrap(), 6);
}

#[test]
fn test_whole_earth_covers_every_cell() {
  for sf_res in [2, 3] {
    let (summary, cells) = run(superfund(sf_res));
    let res = sf_res_to_actual_res(sf_res);
    let idggs = superfund(sf_res).build_idggs().unwrap();
    let idgg = idggs.idgg(res).unwrap();
    assert_eq!(summary.res, res);
    assert_eq!(summary.accepted, idgg.n_cells());
    assert_eq!(cells.len() as u64, idgg.n_cells());

    let addrs: BTreeSet<Q2DICoord> = cells.iter().map(|c| c.addr).collect();
    assert_eq!(addrs.len(), cells.len());
    let labels: BTreeSet<&str> = cells.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels.len(), cells.len());
    // two digit tile followed by one digit per Superfund resolution past the first
    assert!(cells.iter().all(|c| c.label.len() == sf_res + 1));
    assert!(cells.iter().all(|c| c.label.chars().all(|ch| ch.is_ascii_digit())));
  }
}

#[test]
fn test_labels_follow_tiles() {
  let (_, cells) = run(superfund(1));
  let labels: Vec<&str> = cells.iter().map(|c| c.label.as_str()).collect();
  assert_eq!(labels.len(), 42);
  assert_eq!(labels[0], "10");
  assert_eq!(*labels.last().unwrap(), "51");
  // each equatorial quad contributes tiles 11-14, 15-18, ...
  assert_eq!(&labels[1..5], &["11", "12", "13", "14"]);
  assert_eq!(&labels[37..41], &["47", "48", "49", "50"]);
}

#[test]
fn test_consecutive_labels_share_parent_tiles() {
  let (_, coarse) = run(superfund(2));
  let (_, fine) = run(superfund(3));
  let parents: BTreeSet<String> = coarse.iter().map(|c| c.label.clone()).collect();
  for c in &fine {
    let prefix = &c.label[..c.label.len() - 1];
    assert!(parents.contains(prefix), "{} has no parent", c.label);
  }
}

#[test]
fn test_clipped_points_match_plain_grid() {
  let points = vec![
    PointSpec {
      lon: 12.0,
      lat: -33.0,
      attributes: Attributes::new(),
    },
    PointSpec {
      lon: -100.0,
      lat: 45.0,
      attributes: Attributes::new(),
    },
    PointSpec {
      lon: 150.0,
      lat: 5.0,
      attributes: Attributes::new(),
    },
  ];
  let mut sf = superfund(3);
  sf.clip_subset_type = ClipSubsetType::Points;
  sf.clip_points = points.clone();
  let mut plain = mixed43(4);
  plain.clip_subset_type = ClipSubsetType::Points;
  plain.clip_points = points;

  let (_, sf_cells) = run(sf);
  let (_, plain_cells) = run(plain);
  let a: BTreeSet<Q2DICoord> = sf_cells.iter().map(|c| c.addr).collect();
  let b: BTreeSet<Q2DICoord> = plain_cells.iter().map(|c| c.addr).collect();
  assert_eq!(a.len(), 3);
  assert_eq!(a, b);
  assert!(sf_cells.iter().all(|c| c.label.len() == 4));
}

#[test]
fn test_clipped_polygon_is_plain_subset() {
  let region = PolygonSpec {
    ring: vec![[-10.0, 40.0], [5.0, 40.0], [5.0, 52.0], [-10.0, 52.0]],
    holes: Vec::new(),
    attributes: Attributes::new(),
  };
  let mut sf = superfund(3);
  sf.clip_subset_type = ClipSubsetType::Polygons;
  sf.clip_regions = vec![region.clone()];
  let mut plain = mixed43(4);
  plain.clip_subset_type = ClipSubsetType::Polygons;
  plain.clip_regions = vec![region];

  let (summary, sf_cells) = run(sf);
  let (_, plain_cells) = run(plain);
  assert!(!sf_cells.is_empty());
  assert!(summary.tested >= summary.accepted);
  let plain: BTreeSet<Q2DICoord> = plain_cells.iter().map(|c| c.addr).collect();
  for c in &sf_cells {
    assert!(plain.contains(&c.addr), "{} ({}) not in the plain clip", c.label, c.addr);
  }
  assert_eq!(sf_cells.len(), plain_cells.len());
}

#[test]
fn test_rejects_other_apertures() {
  let mut cfg = superfund(3);
  cfg.dggs_aperture_type = ApertureType::Pure;
  assert!(matches!(Generator::new(cfg), Err(DgError::Config(_))));
}
