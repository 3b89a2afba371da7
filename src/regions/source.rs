// src/regions/source.rs
//! Clip region inputs.

use std::collections::BTreeMap;

use crate::types::{DgResult, GeoPolygon, LatLng};

/// Named string attributes carried from a clip feature to the cells it
/// selects.
pub type Attributes = BTreeMap<String, String>;

/// Adds the keys of `from` missing from `into`. Existing values win.
pub fn merge_attributes(into: &mut Attributes, from: &Attributes) {
  for (k, v) in from {
    into.entry(k.clone()).or_insert_with(|| v.clone());
  }
}

/// One clip feature.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionFeature {
  Polygon { polygon: GeoPolygon, attributes: Attributes },
  Point { point: LatLng, attributes: Attributes },
}

impl RegionFeature {
  pub fn attributes(&self) -> &Attributes {
    match self {
      RegionFeature::Polygon { attributes, .. } | RegionFeature::Point { attributes, .. } => attributes,
    }
  }
}

/// A stream of clip features. File readers for the feature formats live
/// outside this crate and plug in here.
pub trait RegionSource {
  /// Name used in error reports.
  fn name(&self) -> &str;

  /// The next feature, or `None` once the source is exhausted.
  fn next_feature(&mut self) -> DgResult<Option<RegionFeature>>;
}

/// Features held in memory.
#[derive(Debug, Clone, Default)]
pub struct VecRegionSource {
  name: String,
  features: std::vec::IntoIter<RegionFeature>,
}

impl VecRegionSource {
  pub fn new(name: impl Into<String>, features: Vec<RegionFeature>) -> Self {
    VecRegionSource {
      name: name.into(),
      features: features.into_iter(),
    }
  }
}

impl RegionSource for VecRegionSource {
  fn name(&self) -> &str {
    &self.name
  }

  fn next_feature(&mut self) -> DgResult<Option<RegionFeature>> {
    Ok(self.features.next())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_merge_keeps_existing() {
    let mut a = Attributes::from([("name".to_string(), "first".to_string())]);
    let b = Attributes::from([
      ("name".to_string(), "second".to_string()),
      ("id".to_string(), "7".to_string()),
    ]);
    merge_attributes(&mut a, &b);
    assert_eq!(a["name"], "first");
    assert_eq!(a["id"], "7");
  }

  #[test]
  fn test_vec_source_drains() {
    let mut src = VecRegionSource::new(
      "inline",
      vec![RegionFeature::Point {
        point: LatLng::from_degrees(1.0, 2.0),
        attributes: Attributes::new(),
      }],
    );
    assert_eq!(src.name(), "inline");
    assert!(src.next_feature().unwrap().is_some());
    assert!(src.next_feature().unwrap().is_none());
  }
}
