// tests/serde_tests.rs

// Only compile and run these tests if the "serde" feature is enabled.
#![cfg(feature = "serde")]

use xs_dggs::*;

#[test]
fn test_enum_names() {
  assert_eq!(serde_json::to_string(&DggsType::Isea4h).unwrap(), r#""ISEA4H""#);
  assert_eq!(serde_json::to_string(&DggsType::Igeo7).unwrap(), r#""IGEO7""#);
  assert_eq!(serde_json::to_string(&ApertureType::Mixed43).unwrap(), r#""MIXED43""#);
  assert_eq!(serde_json::to_string(&ClipSubsetType::CoarseCells).unwrap(), r#""COARSE_CELLS""#);
  assert_eq!(serde_json::to_string(&AddressType::Z3String).unwrap(), r#""Z3_STRING""#);
  assert_eq!(serde_json::to_string(&AddressType::ProjTri).unwrap(), r#""PROJTRI""#);
  assert_eq!(serde_json::to_string(&Topology::Hexagon).unwrap(), r#""HEXAGON""#);

  let t: AddressType = serde_json::from_str(r#""Q2DI""#).unwrap();
  assert_eq!(t, AddressType::Q2di);
  let d: Datum = serde_json::from_str(r#""WGS84_AUTHALIC_SPHERE""#).unwrap();
  assert_eq!(d, Datum::Wgs84AuthalicSphere);
  assert!(serde_json::from_str::<DggsType>(r#""ISEA5H""#).is_err());
}

#[test]
fn test_aperture_serde() {
  // Aperture is repr(u8), so serde_repr writes the number
  assert_eq!(serde_json::to_string(&Aperture::Seven).unwrap(), "7");
  let ap: Aperture = serde_json::from_str("3").unwrap();
  assert_eq!(ap, Aperture::Three);
  assert!(serde_json::from_str::<Aperture>("5").is_err());

  let seq: ApertureSequence = serde_json::from_str(r#""4337""#).unwrap();
  assert_eq!(seq.get_aperture(4), Ok(Aperture::Seven));
  assert_eq!(serde_json::to_string(&seq).unwrap(), r#""4337""#);
  assert!(serde_json::from_str::<ApertureSequence>(r#""4x""#).is_err());
}

#[test]
fn test_latlng_serde() {
  let ll = LatLng { lat: 0.5, lng: -1.2 };
  let serialized = serde_json::to_string(&ll).unwrap();
  assert_eq!(serialized, r#"{"lat":0.5,"lng":-1.2}"#);
  let deserialized: LatLng = serde_json::from_str(&serialized).unwrap();
  assert_eq!(ll, deserialized);
}

#[test]
fn test_q2di_serde() {
  let addr = Q2DICoord::new(4, 12, 7);
  let serialized = serde_json::to_string(&addr).unwrap();
  assert_eq!(serialized, r#"{"quad":4,"coord":{"i":12,"j":7}}"#);
  let deserialized: Q2DICoord = serde_json::from_str(&serialized).unwrap();
  assert_eq!(addr, deserialized);
}

#[test]
fn test_config_round_trip() {
  let mut cfg = GenConfig::preset(DggsType::Planetrisk);
  cfg.clip_subset_type = ClipSubsetType::Points;
  cfg.clip_points = vec![PointSpec {
    lon: 10.0,
    lat: -5.0,
    attributes: Attributes::from([("id".to_string(), "7".to_string())]),
  }];
  let json = serde_json::to_string(&cfg).unwrap();
  assert!(json.contains(r#""dggs_aperture_sequence":"43334777777777777777777""#));
  let back: GenConfig = serde_json::from_str(&json).unwrap();
  assert_eq!(back.dggs_type, DggsType::Planetrisk);
  assert_eq!(back.dggs_aperture_sequence, cfg.dggs_aperture_sequence);
  assert_eq!(back.dggs_res_spec, 11);
  assert_eq!(back.clip_points[0].attributes["id"], "7");
  assert_eq!(back.output_last_seqnum, u64::MAX);
  approx::assert_relative_eq!(back.dggs_vert0_lat, cfg.dggs_vert0_lat, max_relative = 1e-12);
}

#[test]
fn test_config_missing_fields_take_defaults() {
  let cfg: GenConfig = serde_json::from_str(r#"{"dggs_res_spec": 4, "dggs_aperture": 3}"#).unwrap();
  assert_eq!(cfg.dggs_res_spec, 4);
  assert_eq!(cfg.dggs_aperture, Aperture::Three);
  assert_eq!(cfg.dggs_type, DggsType::Custom);
  assert_eq!(cfg.clip_subset_type, ClipSubsetType::WholeEarth);
  assert_eq!(cfg.output_address_type, AddressType::Seqnum);
}

#[test]
fn test_grid_stats_serde() {
  let cfg = GenConfig::preset(DggsType::Isea4h);
  let idggs = cfg.build_idggs().unwrap();
  let stats = idggs.stats(2).unwrap();
  let value = serde_json::to_value(stats).unwrap();
  assert_eq!(value["res"], 2);
  assert_eq!(value["n_cells"], 162);
  let back: GridStats = serde_json::from_value(value).unwrap();
  approx::assert_relative_eq!(back.cell_area_km2, stats.cell_area_km2, max_relative = 1e-12);
}

#[cfg(feature = "cli")]
mod json_config {
  use xs_dggs::*;

  #[test]
  fn test_presets_then_user_fields() {
    let cfg = GenConfig::from_json_str(r#"{"dggs_type": "SUPERFUND", "dggs_res_spec": 3}"#).unwrap();
    assert_eq!(cfg.dggs_aperture_type, ApertureType::Mixed43);
    assert_eq!(cfg.dggs_num_aperture_4_res, 2);
    assert_eq!(cfg.dggs_res_spec, 3);

    let cfg = GenConfig::from_json_str(r#"{"dggs_type": "IGEO7"}"#).unwrap();
    assert_eq!(cfg.dggs_aperture, Aperture::Seven);
    assert_eq!(cfg.output_address_type, AddressType::Z7);
    assert_eq!(cfg.dggs_res_spec, 9);
  }

  #[test]
  fn test_rejects_bad_documents() {
    assert!(matches!(GenConfig::from_json_str("[1, 2]"), Err(DgError::Config(_))));
    assert!(matches!(GenConfig::from_json_str("{"), Err(DgError::Config(_))));
    assert!(matches!(
      GenConfig::from_json_str(r#"{"dggs_type": "HEXAGONS"}"#),
      Err(DgError::Config(_))
    ));
    assert!(matches!(
      GenConfig::from_json_path("/nonexistent/xs-dggs.json"),
      Err(DgError::Io(_))
    ));
  }
}
