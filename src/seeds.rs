//! Built-in lesson content, embedded at compile time.
//!
//! One TOML file per lesson under `content/lessons/`, same schema as the
//! `[[lessons]]` entries accepted in the trainer config.

use crate::config::LessonCfg;
use crate::domain::ContentError;

const BUILTIN_LESSON_FILES: [(&str, &str); 10] = [
  ("01-lean-basics.toml", include_str!("../content/lessons/01-lean-basics.toml")),
  ("02-logic-proofs.toml", include_str!("../content/lessons/02-logic-proofs.toml")),
  ("03-natural-numbers.toml", include_str!("../content/lessons/03-natural-numbers.toml")),
  ("04-polynomials.toml", include_str!("../content/lessons/04-polynomials.toml")),
  ("05-elliptic-curves.toml", include_str!("../content/lessons/05-elliptic-curves.toml")),
  ("06-diffie-hellman.toml", include_str!("../content/lessons/06-diffie-hellman.toml")),
  ("07-lagrange.toml", include_str!("../content/lessons/07-lagrange.toml")),
  ("08-lattice.toml", include_str!("../content/lessons/08-lattice.toml")),
  ("09-rlwe.toml", include_str!("../content/lessons/09-rlwe.toml")),
  ("10-sumcheck.toml", include_str!("../content/lessons/10-sumcheck.toml")),
];

/// Parse every embedded lesson file.
pub fn builtin_lessons() -> Result<Vec<LessonCfg>, ContentError> {
  BUILTIN_LESSON_FILES
    .iter()
    .map(|(file, src)| {
      toml::from_str::<LessonCfg>(src).map_err(|source| ContentError::Parse { file: file.to_string(), source })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SectionCfg;

  #[test]
  fn every_builtin_file_parses() {
    let lessons = builtin_lessons().expect("built-in content parses");
    assert_eq!(lessons.len(), 10);
    let orders: Vec<u32> = lessons.iter().map(|l| l.order).collect();
    assert_eq!(orders, (1..=10).collect::<Vec<_>>());
  }

  #[test]
  fn builtin_exercises_have_hints_and_checks() {
    let mut count = 0;
    for lesson in builtin_lessons().unwrap() {
      for section in lesson.sections {
        if let SectionCfg::Exercise { exercise, .. } = section {
          count += 1;
          assert!(!exercise.id.is_empty());
          assert!(!exercise.solution.is_empty(), "{} has no solution", exercise.id);
          assert!(!exercise.hints.is_empty(), "{} has no hints", exercise.id);
          assert!(!exercise.checks.is_empty(), "{} has no checks", exercise.id);
        }
      }
    }
    assert_eq!(count, 43);
  }
}
