//! Small utility helpers used across modules.

/// Learner id used when a request does not name one.
pub const DEFAULT_LEARNER: &str = "local";

/// Blank or missing learner ids fall back to `fallback`.
pub fn learner_or<'a>(learner: Option<&'a str>, fallback: &'a str) -> &'a str {
  match learner.map(str::trim) {
    Some(id) if !id.is_empty() => id,
    _ => fallback,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn learner_falls_back_when_blank() {
    assert_eq!(learner_or(None, DEFAULT_LEARNER), "local");
    assert_eq!(learner_or(Some("  "), DEFAULT_LEARNER), "local");
    assert_eq!(learner_or(Some("amy"), DEFAULT_LEARNER), "amy");
  }
}
