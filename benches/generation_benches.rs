use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use xs_dggs::*;

// --- Fixtures for Generation Benchmarks ---

fn whole_earth(dggs_type: DggsType, res: usize) -> GenConfig {
  let mut cfg = GenConfig::preset(dggs_type);
  cfg.dggs_res_spec = res;
  cfg
}

// A lon/lat box, roughly `size_deg` on a side
fn square(center_lon: f64, center_lat: f64, size_deg: f64) -> PolygonSpec {
  let h = size_deg / 2.0;
  PolygonSpec {
    ring: vec![
      [center_lon - h, center_lat - h],
      [center_lon + h, center_lat - h],
      [center_lon + h, center_lat + h],
      [center_lon - h, center_lat + h],
    ],
    holes: Vec::new(),
    attributes: Attributes::new(),
  }
}

fn clipped(dggs_type: DggsType, res: usize, region: PolygonSpec) -> GenConfig {
  let mut cfg = whole_earth(dggs_type, res);
  cfg.clip_subset_type = ClipSubsetType::Polygons;
  cfg.clip_regions = vec![region];
  cfg
}

// --- Benchmark Functions ---

fn bench_whole_earth(c: &mut Criterion) {
  let mut group = c.benchmark_group("whole_earth");
  for (name, t, res) in [
    ("isea4h_res4", DggsType::Isea4h, 4),
    ("isea3h_res6", DggsType::Isea3h, 6),
    ("isea7h_res3", DggsType::Isea7h, 3),
  ] {
    let cfg = whole_earth(t, res);
    group.bench_function(name, |b| {
      b.iter_batched(
        || cfg.clone(),
        |cfg| {
          let mut sink = CountSink::default();
          generate(black_box(cfg), &mut sink).ok();
          sink.count
        },
        BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

fn bench_superfund(c: &mut Criterion) {
  let mut group = c.benchmark_group("superfund");
  let cfg = whole_earth(DggsType::Superfund, 4);
  group.bench_function("whole_earth_sf4", |b| {
    b.iter_batched(
      || cfg.clone(),
      |cfg| {
        let mut sink = CountSink::default();
        generate(black_box(cfg), &mut sink).ok();
        sink.count
      },
      BatchSize::SmallInput,
    );
  });
  group.finish();
}

fn bench_clipping(c: &mut Criterion) {
  let mut group = c.benchmark_group("clip_polygons");
  group.sample_size(20);

  // one quad, then a region spread over several quads
  let small = clipped(DggsType::Isea4h, 8, square(-122.41, 37.77, 2.0));
  let band = clipped(DggsType::Isea4h, 6, square(0.0, 0.0, 40.0));
  for (name, cfg) in [("small_square_res8", small), ("wide_square_res6", band)] {
    group.bench_function(name, |b| {
      b.iter_batched(
        || cfg.clone(),
        |cfg| {
          let mut sink = CountSink::default();
          generate(black_box(cfg), &mut sink).ok();
          sink.count
        },
        BatchSize::SmallInput,
      );
    });
  }

  let mut points = whole_earth(DggsType::Isea3h, 9);
  points.clip_subset_type = ClipSubsetType::Points;
  points.clip_points = (0..100)
    .map(|k| PointSpec {
      lon: -180.0 + 3.6 * f64::from(k),
      lat: -60.0 + 1.2 * f64::from(k),
      attributes: Attributes::new(),
    })
    .collect();
  group.bench_function("points_100_res9", |b| {
    b.iter_batched(
      || points.clone(),
      |cfg| {
        let mut sink = CountSink::default();
        generate(black_box(cfg), &mut sink).ok();
        sink.count
      },
      BatchSize::SmallInput,
    );
  });
  group.finish();
}

criterion_group!(benches, bench_whole_earth, bench_superfund, bench_clipping);
criterion_main!(benches);
