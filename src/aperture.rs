// src/aperture.rs

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Aperture, DgError, DgResult};

/// Per-resolution subdivision apertures. Entry `r - 1` governs the step from
/// resolution `r - 1` into resolution `r`; resolution 0 is always the 12
/// base cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ApertureSequence {
  seq: Vec<Aperture>,
}

impl ApertureSequence {
  pub fn new(seq: Vec<Aperture>) -> Self {
    ApertureSequence { seq }
  }

  /// The same aperture at every resolution up to `max_res`.
  pub fn pure(ap: Aperture, max_res: usize) -> Self {
    ApertureSequence { seq: vec![ap; max_res] }
  }

  /// `num_ap4` aperture 4 steps followed by aperture 3 steps up to `max_res`.
  pub fn mixed43(num_ap4: usize, max_res: usize) -> Self {
    let seq = (1..=max_res)
      .map(|r| if r <= num_ap4 { Aperture::Four } else { Aperture::Three })
      .collect();
    ApertureSequence { seq }
  }

  /// Aperture of the step into `res`, for `1 <= res <= last_res()`.
  pub fn get_aperture(&self, res: usize) -> DgResult<Aperture> {
    if res == 0 || res > self.seq.len() {
      return Err(DgError::Resolution {
        res,
        max: self.seq.len(),
      });
    }
    Ok(self.seq[res - 1])
  }

  /// Finest resolution the sequence reaches.
  #[inline]
  pub fn last_res(&self) -> usize {
    self.seq.len()
  }

  #[inline]
  pub fn n_res(&self) -> usize {
    self.seq.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.seq.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = Aperture> + '_ {
    self.seq.iter().copied()
  }

  /// Number of aperture 3, 4 and 7 steps taken to reach `res`.
  pub fn counts_through(&self, res: usize) -> (usize, usize, usize) {
    let end = res.min(self.seq.len());
    self.seq[..end].iter().fold((0, 0, 0), |(n3, n4, n7), ap| match ap {
      Aperture::Three => (n3 + 1, n4, n7),
      Aperture::Four => (n3, n4 + 1, n7),
      Aperture::Seven => (n3, n4, n7 + 1),
    })
  }

  /// The single aperture used at every step, if the sequence is pure.
  pub fn pure_aperture(&self) -> Option<Aperture> {
    let first = *self.seq.first()?;
    self.seq.iter().all(|&a| a == first).then_some(first)
  }
}

/// How the apertures of a grid system are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApertureSpec {
  /// The same aperture at every step.
  Pure(Aperture),
  /// `num_ap4` aperture 4 steps, then aperture 3.
  Mixed43 { num_ap4: usize },
  /// An explicit aperture per step.
  Sequence(ApertureSequence),
}

impl ApertureSpec {
  /// The sequence of apertures through `max_res`.
  pub fn to_sequence(&self, max_res: usize) -> DgResult<ApertureSequence> {
    match self {
      ApertureSpec::Pure(ap) => Ok(ApertureSequence::pure(*ap, max_res)),
      ApertureSpec::Mixed43 { num_ap4 } => Ok(ApertureSequence::mixed43(*num_ap4, max_res)),
      ApertureSpec::Sequence(seq) if max_res <= seq.last_res() => Ok(seq.clone()),
      ApertureSpec::Sequence(seq) => Err(DgError::Resolution {
        res: max_res,
        max: seq.last_res(),
      }),
    }
  }
}

impl FromStr for ApertureSequence {
  type Err = DgError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let seq = s.chars().map(Aperture::try_from).collect::<DgResult<Vec<_>>>()?;
    Ok(ApertureSequence { seq })
  }
}

impl TryFrom<String> for ApertureSequence {
  type Error = DgError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<ApertureSequence> for String {
  fn from(seq: ApertureSequence) -> Self {
    seq.to_string()
  }
}

impl fmt::Display for ApertureSequence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ap in &self.seq {
      write!(f, "{ap}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_aperture_is_one_based() {
    let seq: ApertureSequence = "437".parse().unwrap();
    assert_eq!(seq.get_aperture(1).unwrap(), Aperture::Four);
    assert_eq!(seq.get_aperture(3).unwrap(), Aperture::Seven);
    assert!(seq.get_aperture(0).is_err());
    assert!(seq.get_aperture(4).is_err());
    assert_eq!(seq.last_res(), 3);
  }

  #[test]
  fn test_counts_through() {
    let seq = ApertureSequence::mixed43(2, 6);
    assert_eq!(seq.to_string(), "443333");
    assert_eq!(seq.counts_through(1), (0, 1, 0));
    assert_eq!(seq.counts_through(5), (3, 2, 0));
    assert_eq!(seq.counts_through(99), (4, 2, 0));
  }

  #[test]
  fn test_pure_aperture() {
    assert_eq!(ApertureSequence::pure(Aperture::Seven, 4).pure_aperture(), Some(Aperture::Seven));
    assert_eq!(ApertureSequence::mixed43(1, 3).pure_aperture(), None);
    assert_eq!(ApertureSequence::default().pure_aperture(), None);
  }

  #[test]
  fn test_spec_to_sequence() {
    let seq: ApertureSequence = "4337".parse().unwrap();
    let spec = ApertureSpec::Sequence(seq.clone());
    assert_eq!(spec.to_sequence(3).unwrap(), seq);
    assert!(matches!(spec.to_sequence(5), Err(DgError::Resolution { res: 5, max: 4 })));
    assert_eq!(ApertureSpec::Mixed43 { num_ap4: 2 }.to_sequence(4).unwrap().to_string(), "4433");
  }
}
