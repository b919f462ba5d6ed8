//! Incomplete-work markers.
//!
//! One table feeds both the informational warning emitted by the simulated run
//! and the gate that forbids a successful grade. A marker only counts as a
//! standalone token: `sorry` fires, `sorryCount` does not.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug)]
pub struct Marker {
  pub keyword: &'static str,
  /// Failed-requirement line shown when the gate fires.
  pub removal: &'static str,
}

impl Marker {
  pub fn warning(&self) -> String {
    format!("Warning: '{}' found - this proof is incomplete.", self.keyword)
  }
}

pub static INCOMPLETE_MARKERS: [Marker; 2] = [
  Marker { keyword: "sorry", removal: "Remove \"sorry\" - complete the implementation" },
  Marker { keyword: "admit", removal: "Remove \"admit\" - complete the proof" },
];

static MARKER_PATTERNS: LazyLock<Vec<(&'static Marker, Regex)>> = LazyLock::new(|| {
  INCOMPLETE_MARKERS
    .iter()
    .map(|m| {
      let re = Regex::new(&format!(r"\b{}\b", regex::escape(m.keyword))).expect("marker keywords are plain words");
      (m, re)
    })
    .collect()
});

/// Markers present at least once, in table order.
pub fn markers_in(text: &str) -> Vec<&'static Marker> {
  MARKER_PATTERNS
    .iter()
    .filter(|(_, re)| re.is_match(text))
    .map(|(m, _)| *m)
    .collect()
}
