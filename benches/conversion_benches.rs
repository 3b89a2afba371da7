use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xs_dggs::hierarchy::{q2di_to_z3_string, q2di_to_z7_string, z3_string_to_q2di, z7_string_to_q2di};
use xs_dggs::*;

// --- Fixtures for Conversion Benchmarks ---

fn grid(dggs_type: DggsType, res: usize) -> Idgg {
  let mut cfg = GenConfig::preset(dggs_type);
  cfg.dggs_res_spec = res;
  match cfg.build_idggs().and_then(|g| g.idgg(res).cloned()) {
    Ok(idgg) => idgg,
    Err(e) => panic!("failed to build {dggs_type:?} res {res}: {e}"),
  }
}

// Points spread over the sphere, away from the poles
fn sample_points(n: usize) -> Vec<LatLng> {
  (0..n)
    .map(|k| {
      let t = k as f64 / n as f64;
      LatLng::from_degrees(-70.0 + 140.0 * t, -180.0 + 360.0 * ((t * 37.0) % 1.0))
    })
    .collect()
}

// --- Benchmark Functions ---

fn bench_geo_to_cell(c: &mut Criterion) {
  let points = sample_points(1000);
  let mut group = c.benchmark_group("geo_to_q2di");
  for res in [5usize, 10, 15] {
    let idgg = grid(DggsType::Isea4h, res);
    group.bench_function(format!("isea4h_res_{res}"), |b| {
      b.iter(|| {
        for p in &points {
          black_box(idgg.geo_to_q2di(black_box(p)).ok());
        }
      });
    });
  }
  group.finish();
}

fn bench_cell_geometry(c: &mut Criterion) {
  let idgg = grid(DggsType::Isea3h, 9);
  let cells: Vec<Q2DICoord> = idgg.cells().step_by(977).collect();
  let mut group = c.benchmark_group("cell_geometry");
  group.bench_function("center_isea3h_res9", |b| {
    b.iter(|| {
      for cell in &cells {
        black_box(idgg.cell_center(black_box(cell)).ok());
      }
    });
  });
  group.bench_function("boundary_densify_4", |b| {
    b.iter(|| {
      for cell in &cells {
        black_box(idgg.cell_boundary(black_box(cell), 4).ok());
      }
    });
  });
  group.finish();
}

fn bench_hierarchical_indices(c: &mut Criterion) {
  let mut group = c.benchmark_group("hierarchical_indices");

  let z3 = grid(DggsType::Isea3h, 10);
  let z3_cells: Vec<Q2DICoord> = z3.cells().step_by(10_007).collect();
  group.bench_function("z3_round_trip_res10", |b| {
    b.iter(|| {
      for cell in &z3_cells {
        if let Ok(s) = q2di_to_z3_string(&z3, black_box(cell)) {
          black_box(z3_string_to_q2di(&z3, &s).ok());
        }
      }
    });
  });

  let z7 = grid(DggsType::Igeo7, 8);
  let z7_cells: Vec<Q2DICoord> = z7.cells().step_by(10_007).collect();
  group.bench_function("z7_round_trip_res8", |b| {
    b.iter(|| {
      for cell in &z7_cells {
        if let Ok(s) = q2di_to_z7_string(&z7, black_box(cell)) {
          black_box(z7_string_to_q2di(&z7, &s).ok());
        }
      }
    });
  });
  group.finish();
}

fn bench_conversion_graph(c: &mut Criterion) {
  let graph = match ConversionGraph::new(grid(DggsType::Isea4h, 10), 3) {
    Ok(g) => g,
    Err(e) => panic!("conversion graph: {e}"),
  };
  let Ok(conv) = graph.converter(AddressType::Geo, AddressType::ZorderString) else {
    panic!("no GEO to ZORDER_STRING path");
  };
  let addrs: Vec<Address> = sample_points(500).into_iter().map(Address::Geo).collect();
  c.bench_function("graph_geo_to_zorder_res10", |b| {
    b.iter(|| {
      for a in &addrs {
        black_box(conv.apply(black_box(a)).ok());
      }
    });
  });
}

criterion_group!(
  benches,
  bench_geo_to_cell,
  bench_cell_geometry,
  bench_hierarchical_indices,
  bench_conversion_graph
);
criterion_main!(benches);
