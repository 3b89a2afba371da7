// src/regions/eval.rs
//! Per-cell clip tests.

use geo::{Area, BooleanOps, Intersects, LineString, Polygon, Rect};

use super::clip::{ClipRegions, ClipSettings, QuadClip};
use super::source::{merge_attributes, Attributes};
use crate::grid::Idgg;
use crate::types::{CoordIJ, DgResult};

impl QuadClip {
  /// Tests the cell at `coord` of this quad's frame against the quad's
  /// points and polygon pieces. `coord` may lie past the quad edge.
  ///
  /// Matching point cells are consumed. Attributes of every feature met are
  /// merged into `attrs` when `build_attributes` is set, otherwise testing
  /// stops at the first match.
  pub(crate) fn test_cell(
    &mut self,
    idgg: &Idgg,
    coord: &CoordIJ,
    settings: &ClipSettings,
    attrs: &mut Attributes,
  ) -> DgResult<bool> {
    let mut accepted = false;
    if let Some(point_attrs) = self.points.remove(coord) {
      merge_attributes(attrs, &point_attrs);
      if !settings.build_attributes {
        return Ok(true);
      }
      accepted = true;
    }
    if self.polygons.is_empty() || self.quad() == 0 || self.quad() == 11 {
      return Ok(accepted);
    }

    let verts = idgg.hex_vertices(self.quad(), coord);
    let ring: Vec<(f64, f64)> = verts
      .iter()
      .map(|v| (v.x * settings.scale, v.y * settings.scale))
      .collect();

    // reject cells clear of the extent of every piece
    let (min, max) = (self.min, self.max);
    if !(ring.iter().any(|p| p.0 > min.x)
      && ring.iter().any(|p| p.0 < max.x)
      && ring.iter().any(|p| p.1 > min.y)
      && ring.iter().any(|p| p.1 < max.y))
    {
      return Ok(accepted);
    }

    let cell = Polygon::new(LineString::from(ring), Vec::new());
    let Some(cell_bounds) = geo::BoundingRect::bounding_rect(&cell) else {
      return Ok(accepted);
    };
    for piece in &self.polygons {
      if !overlaps(&cell_bounds, &piece.bounds) {
        continue;
      }
      if cell.intersection(&piece.shape).unsigned_area() > 0.0 {
        accepted = true;
        merge_attributes(attrs, &piece.attributes);
        if !settings.build_attributes {
          break;
        }
      }
    }
    Ok(accepted)
  }
}

fn overlaps(a: &Rect<f64>, b: &Rect<f64>) -> bool {
  a.intersects(b)
}

impl ClipRegions {
  /// Decides whether the cell `coord` of `quad` is generated, returning its
  /// attributes when it is.
  ///
  /// A cell pushed across an edge by a neighbouring quad is accepted and
  /// consumed first. Anything else must fall in the quad's candidate box
  /// and meet one of its features.
  pub fn evaluate(&mut self, quad: u8, coord: &CoordIJ) -> DgResult<Option<Attributes>> {
    let q = usize::from(quad);
    if let Some(mut attrs) = self.overage[q].remove(coord) {
      if self.settings.build_attributes {
        self.quads[q].test_cell(&self.idgg, coord, &self.settings, &mut attrs)?;
      }
      return Ok(Some(attrs));
    }
    if !self.quads[q].in_box(coord) {
      return Ok(None);
    }
    let mut attrs = Attributes::new();
    let hit = self.quads[q].test_cell(&self.idgg, coord, &self.settings, &mut attrs)?;
    Ok(hit.then_some(attrs))
  }

  /// First overage cell still pending in `quad`.
  pub fn next_overage(&self, quad: u8) -> Option<CoordIJ> {
    self.overage[usize::from(quad)].keys().next().copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hierarchy::tests::pure_grid;
  use crate::types::{Aperture, GeoLoop, GeoPolygon, LatLng, Q2DDCoord};

  fn settings(build_attributes: bool) -> ClipSettings {
    ClipSettings {
      scale: 1e6,
      geodetic_densify: 0.0,
      use_holes: false,
      build_attributes,
    }
  }

  fn attrs(k: &str, v: &str) -> Attributes {
    Attributes::from([(k.to_string(), v.to_string())])
  }

  #[test]
  fn test_point_cell_is_consumed() {
    let idgg = pure_grid(Aperture::Four, 4);
    let mut regions = ClipRegions::new(&idgg, settings(false)).unwrap();
    let p = LatLng::from_degrees(5.0, 5.0);
    regions.add_point(&p, &attrs("id", "p")).unwrap();
    regions.finish().unwrap();
    let addr = idgg.geo_to_q2di(&p).unwrap();
    let got = regions.evaluate(addr.quad, &addr.coord).unwrap();
    assert_eq!(got, Some(attrs("id", "p")));
    assert_eq!(regions.evaluate(addr.quad, &addr.coord).unwrap(), None);
  }

  #[test]
  fn test_polygon_cells() {
    let idgg = pure_grid(Aperture::Four, 6);
    let mut regions = ClipRegions::new(&idgg, settings(true)).unwrap();
    let c = idgg.q2dd_to_geo(&Q2DDCoord::new(5, 0.3, 0.3)).unwrap().unwrap();
    let (lon, lat) = (c.lng_degrees(), c.lat_degrees());
    let poly = GeoPolygon {
      geoloop: GeoLoop::from_degrees(&[
        (lon - 1.0, lat - 1.0),
        (lon + 1.0, lat - 1.0),
        (lon + 1.0, lat + 1.0),
        (lon - 1.0, lat + 1.0),
      ]),
      holes: Vec::new(),
    };
    regions.add_polygon(&poly, &attrs("name", "square")).unwrap();
    regions.finish().unwrap();

    let inside = idgg.geo_to_q2di(&c).unwrap();
    assert_eq!(
      regions.evaluate(inside.quad, &inside.coord).unwrap(),
      Some(attrs("name", "square"))
    );
    let far = idgg
      .geo_to_q2di(&idgg.q2dd_to_geo(&Q2DDCoord::new(5, 0.9, 0.05)).unwrap().unwrap())
      .unwrap();
    assert_eq!(regions.evaluate(far.quad, &far.coord).unwrap(), None);
  }
}
