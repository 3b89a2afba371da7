// tests/conversion_tests.rs

use approx::assert_abs_diff_eq;
use xs_dggs::*;

fn grid(dggs_type: DggsType, res: usize) -> Idgg {
  let mut cfg = GenConfig::preset(dggs_type);
  cfg.dggs_res_spec = res;
  let idggs = cfg.build_idggs().expect("grid system");
  idggs.idgg(res).expect("grid").clone()
}

fn graph(dggs_type: DggsType, res: usize) -> ConversionGraph {
  ConversionGraph::new(grid(dggs_type, res), 3).expect("conversion graph")
}

#[test]
fn test_seqnums_are_dense() {
  let g = grid(DggsType::Isea4h, 3);
  assert_eq!(g.n_cells(), 642);
  let mut n = 0;
  for (k, cell) in g.cells().enumerate() {
    assert_eq!(g.seqnum(&cell).unwrap(), k as u64 + 1);
    assert_eq!(g.from_seqnum(k as u64 + 1).unwrap(), cell);
    n += 1;
  }
  assert_eq!(n, 642);
  assert!(g.from_seqnum(0).is_err());
  assert!(g.from_seqnum(643).is_err());
}

#[test]
fn test_geo_to_seqnum_and_back() {
  let graph = graph(DggsType::Isea4h, 6);
  let to_seq = graph.converter(AddressType::Geo, AddressType::Seqnum).unwrap();
  let to_geo = graph.converter(AddressType::Seqnum, AddressType::Geo).unwrap();
  for &(lat, lng) in &[(0.0, 0.0), (40.0, -105.0), (-33.9, 18.4), (89.5, 10.0), (-60.0, 170.0)] {
    let p = Address::Geo(LatLng::from_degrees(lat, lng));
    let seq = to_seq.apply(&p).unwrap().expect("every point has a cell");
    let center = to_geo.apply(&seq).unwrap().expect("every cell has a center");
    // the center of the cell is its own cell
    assert_eq!(to_seq.apply(&center).unwrap(), Some(seq.clone()));

    let (Address::Geo(a), Address::Geo(b)) = (&p, &center) else {
      panic!("expected geodetic addresses");
    };
    // res 6 centers are about 0.017 radians apart
    assert!(great_circle_distance_rads(a, b) < 0.02, "{lat} {lng}");
  }
}

#[test]
fn test_cell_center_round_trip() {
  let g = grid(DggsType::Isea3h, 4);
  for cell in g.cells() {
    let c = g.cell_center(&cell).unwrap();
    assert_eq!(g.geo_to_q2di(&c).unwrap(), cell);
  }
}

#[test]
fn test_q2di_labels() {
  let graph = graph(DggsType::Isea4h, 2);
  let conv = graph.converter(AddressType::Seqnum, AddressType::Q2di).unwrap();
  assert_eq!(
    conv.apply(&Address::Seqnum(1)).unwrap().unwrap().to_string(),
    "0 0 0"
  );
  assert_eq!(
    conv.apply(&Address::Seqnum(162)).unwrap().unwrap().to_string(),
    "11 0 0"
  );
}

#[test]
fn test_hierarchical_frames_follow_aperture() {
  assert!(graph(DggsType::Isea3h, 3).has_frame(AddressType::Z3String));
  assert!(graph(DggsType::Isea4h, 3).has_frame(AddressType::ZorderString));
  assert!(graph(DggsType::Igeo7, 3).has_frame(AddressType::Z7String));
  assert!(!graph(DggsType::Isea4h, 3).has_frame(AddressType::Z7));

  let mixed = graph(DggsType::Planetrisk, 6);
  assert!(!mixed.has_frame(AddressType::Z3));
  assert!(!mixed.has_frame(AddressType::ZorderString));
  assert!(matches!(
    mixed.converter(AddressType::Seqnum, AddressType::Z7),
    Err(DgError::Config(_))
  ));
}

#[test]
fn test_z7_round_trip_through_geo() {
  let graph = graph(DggsType::Igeo7, 3);
  let to_z7 = graph.converter(AddressType::Geo, AddressType::Z7).unwrap();
  let to_geo = graph.converter(AddressType::Z7, AddressType::Geo).unwrap();
  let to_q2di = graph.converter(AddressType::Z7, AddressType::Q2di).unwrap();
  for cell in graph.idgg().cells() {
    let center = Address::Geo(graph.idgg().cell_center(&cell).unwrap());
    let z = to_z7.apply(&center).unwrap().unwrap();
    assert_eq!(to_q2di.apply(&z).unwrap(), Some(Address::Q2di(cell)));
    let Some(Address::Geo(back)) = to_geo.apply(&z).unwrap() else {
      panic!("Z7 index {z} has no center");
    };
    let Address::Geo(orig) = center else { unreachable!() };
    assert_abs_diff_eq!(back.lat, orig.lat, epsilon = 1e-9);
    assert_abs_diff_eq!(back.lng, orig.lng, epsilon = 1e-9);
  }
}

#[test]
fn test_labels_parse_back() {
  let graph = graph(DggsType::Isea3h, 3);
  let conv = graph.converter(AddressType::Seqnum, AddressType::Z3String).unwrap();
  let back = graph.converter(AddressType::Z3String, AddressType::Seqnum).unwrap();
  for n in [1_u64, 2, 50, 271, 272] {
    let label = conv.apply(&Address::Seqnum(n)).unwrap().unwrap().to_string();
    let parsed = Address::parse(AddressType::Z3String, &label).unwrap();
    assert_eq!(back.apply(&parsed).unwrap(), Some(Address::Seqnum(n)));
  }
}

#[test]
fn test_boundary_densification() {
  let g = grid(DggsType::Isea4h, 4);
  let cell = g.from_seqnum(1000).unwrap();
  assert_eq!(g.cell_boundary(&cell, 0).unwrap().verts.len(), 6);
  assert_eq!(g.cell_boundary(&cell, 3).unwrap().verts.len(), 24);

  // pentagons have five vertices
  let pole = g.from_seqnum(1).unwrap();
  assert!(g.is_pentagon(&pole));
  assert_eq!(g.cell_boundary(&pole, 0).unwrap().verts.len(), 5);
}

#[test]
fn test_quad_edge_points_through_vertex_frame() {
  let graph = graph(DggsType::Isea4h, 3);
  let to_vertex = graph.converter(AddressType::Q2dd, AddressType::Vertex2dd).unwrap();
  let to_tri = graph.converter(AddressType::Vertex2dd, AddressType::ProjTri).unwrap();
  let to_quad = graph.converter(AddressType::ProjTri, AddressType::Q2dd).unwrap();
  let s = 3f64.sqrt() / 2.0;
  for quad in 5..=10u8 {
    for t in [0.0, 0.125, 0.5, 0.875, 1.0] {
      for (x, y) in [(-0.5 * t, s * t), (t, 0.0)] {
        let q = Address::Q2dd(Q2DDCoord::new(quad, x, y));
        let Some(Address::Vertex2dd(v)) = to_vertex.apply(&q).unwrap() else {
          panic!("quad {quad} ({x}, {y}) has no vertex frame point");
        };
        assert!(v.keep, "quad {quad} ({x}, {y})");
        let tri = to_tri.apply(&Address::Vertex2dd(v)).unwrap().expect("kept points project");
        let Some(Address::Q2dd(back)) = to_quad.apply(&tri).unwrap() else {
          panic!("quad {quad} ({x}, {y}) lost its quad");
        };
        assert_eq!(back.quad, quad);
        assert_abs_diff_eq!(back.pos.x, x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.pos.y, y, epsilon = 1e-12);
      }
    }
  }
}
