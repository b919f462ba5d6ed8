//! Lesson catalog: compiled lessons in display order plus a global exercise
//! index. Built once at startup, read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::config::LessonCfg;
use crate::domain::{Exercise, Lesson, Section};

/// An exercise together with the lesson it belongs to.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
  pub lesson_id: String,
  pub exercise: Arc<Exercise>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
  lessons: Vec<Arc<Lesson>>,
  exercises: HashMap<String, CatalogEntry>,
}

impl Catalog {
  /// Index compiled lessons. Lessons are ordered by `order`; a repeated lesson
  /// id or exercise id is logged and skipped (first one wins).
  pub fn build(mut lessons: Vec<Lesson>) -> Self {
    lessons.sort_by_key(|l| l.order);

    let mut seen_lessons = HashSet::new();
    let mut exercises = HashMap::new();
    let mut kept = Vec::with_capacity(lessons.len());

    for mut lesson in lessons {
      if !seen_lessons.insert(lesson.id.clone()) {
        error!(target: "lean_trainer", lesson = %lesson.id, "Duplicate lesson id; skipping");
        continue;
      }
      lesson.sections.retain(|section| {
        let Section::Exercise { exercise, .. } = section else { return true };
        if exercises.contains_key(&exercise.id) {
          error!(target: "lean_trainer", lesson = %lesson.id, exercise = %exercise.id, "Duplicate exercise id; skipping");
          return false;
        }
        exercises.insert(
          exercise.id.clone(),
          CatalogEntry { lesson_id: lesson.id.clone(), exercise: exercise.clone() },
        );
        true
      });
      kept.push(Arc::new(lesson));
    }

    Self { lessons: kept, exercises }
  }

  /// Compile built-in lessons plus extra lessons from config. An extra lesson
  /// replaces a built-in one with the same id; a lesson that fails to compile
  /// is skipped.
  #[instrument(level = "info", skip_all, fields(builtin = builtin.len(), extra = extra.len()))]
  pub fn from_configs(builtin: Vec<LessonCfg>, extra: Vec<LessonCfg>) -> Self {
    let overridden: HashSet<String> = extra.iter().map(|l| l.id.clone()).collect();
    let mut compiled = Vec::new();

    let kept_builtin = builtin.into_iter().filter(|l| {
      let replaced = overridden.contains(&l.id);
      if replaced {
        warn!(target: "lean_trainer", lesson = %l.id, "Built-in lesson replaced by config");
      }
      !replaced
    });
    for cfg in kept_builtin.chain(extra) {
      let id = cfg.id.clone();
      match Lesson::try_from(cfg) {
        Ok(lesson) => compiled.push(lesson),
        Err(e) => error!(target: "lean_trainer", lesson = %id, error = %e, "Skipping lesson with invalid content"),
      }
    }

    let catalog = Self::build(compiled);
    info!(target: "lean_trainer", lessons = catalog.lessons.len(), exercises = catalog.exercise_count(), "Catalog ready");
    catalog
  }

  pub fn lessons(&self) -> &[Arc<Lesson>] {
    &self.lessons
  }

  pub fn lesson(&self, id: &str) -> Option<&Arc<Lesson>> {
    self.lessons.iter().find(|l| l.id == id)
  }

  pub fn exercise(&self, id: &str) -> Option<&CatalogEntry> {
    self.exercises.get(id)
  }

  pub fn exercise_count(&self) -> usize {
    self.exercises.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{CheckCfg, ExerciseCfg, GradingSettings, SectionCfg};
  use crate::domain::Category;
  use crate::grader::grade;
  use crate::seeds::builtin_lessons;

  fn builtin() -> Catalog {
    Catalog::from_configs(builtin_lessons().expect("built-in content parses"), vec![])
  }

  fn all_exercises(catalog: &Catalog) -> Vec<Arc<Exercise>> {
    catalog.lessons().iter().flat_map(|l| l.exercises().cloned().collect::<Vec<_>>()).collect()
  }

  fn lesson_cfg(id: &str, order: u32, exercise_ids: &[&str]) -> LessonCfg {
    LessonCfg {
      id: id.into(),
      title: format!("Lesson {id}"),
      description: String::new(),
      category: Category::Advanced,
      order,
      sections: exercise_ids
        .iter()
        .map(|ex| SectionCfg::Exercise {
          title: format!("Exercise {ex}"),
          exercise: ExerciseCfg {
            id: ex.to_string(),
            title: ex.to_string(),
            description: String::new(),
            starter: String::new(),
            solution: "def x := 1".into(),
            explanation: String::new(),
            hints: vec!["h".into()],
            checks: vec![CheckCfg {
              description: "def x".into(),
              all: vec![r"def\s+x".into()],
              any: vec![],
              none: vec![],
            }],
          },
        })
        .collect(),
    }
  }

  #[test]
  fn builtin_catalog_is_complete_and_ordered() {
    let catalog = builtin();
    assert_eq!(catalog.lessons().len(), 10);
    assert_eq!(catalog.exercise_count(), 43);
    assert_eq!(catalog.lessons()[0].id, "01-lean-basics");
    assert_eq!(catalog.lessons()[9].id, "10-sumcheck");
    let orders: Vec<u32> = catalog.lessons().iter().map(|l| l.order).collect();
    assert!(orders.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn exercises_resolve_to_their_lesson() {
    let catalog = builtin();
    let entry = catalog.exercise("ex-01-basic-values").unwrap();
    assert_eq!(entry.lesson_id, "01-lean-basics");
    assert_eq!(entry.exercise.checks.len(), 2);
    assert_eq!(catalog.exercise("ex-sum-04").unwrap().lesson_id, "10-sumcheck");
    assert!(catalog.exercise("ex-missing").is_none());
    assert!(catalog.lesson("01-lean-basics").is_some());
    assert!(catalog.lesson("nope").is_none());
  }

  #[test]
  fn every_reference_solution_passes() {
    let catalog = builtin();
    let settings = GradingSettings::default();
    for ex in all_exercises(&catalog) {
      let report = grade(&ex.solution, &ex, &settings);
      assert!(report.success, "solution of {} failed: {:?}", ex.id, report);
      assert_eq!(report.passed.len(), ex.checks.len(), "{}", ex.id);
    }
  }

  #[test]
  fn every_starter_fails() {
    let catalog = builtin();
    let settings = GradingSettings::default();
    for ex in all_exercises(&catalog) {
      let report = grade(&ex.starter, &ex, &settings);
      assert!(!report.success, "starter of {} passed", ex.id);
    }
  }

  #[test]
  fn appended_placeholder_fails_every_solution() {
    let catalog = builtin();
    let settings = GradingSettings::default();
    for ex in all_exercises(&catalog) {
      let code = format!("{}\nsorry", ex.solution);
      let report = grade(&code, &ex, &settings);
      assert!(!report.success, "{} accepted a placeholder", ex.id);
      assert!(report.failed.iter().any(|f| f.contains("\"sorry\"")), "{}", ex.id);
    }
  }

  #[test]
  fn grading_builtins_is_idempotent() {
    let catalog = builtin();
    let settings = GradingSettings::default();
    for ex in all_exercises(&catalog) {
      assert_eq!(grade(&ex.starter, &ex, &settings), grade(&ex.starter, &ex, &settings), "{}", ex.id);
    }
  }

  #[test]
  fn basic_values_exercise_grades_partial_work() {
    let catalog = builtin();
    let ex = &catalog.exercise("ex-01-basic-values").unwrap().exercise;
    let report = grade("def myNumber : Nat := 42", ex, &GradingSettings::default());
    assert!(!report.success);
    assert_eq!(report.passed, vec!["def myNumber"]);
    assert_eq!(report.failed, vec!["def myName"]);
  }

  #[test]
  fn duplicate_exercise_ids_keep_the_first() {
    let catalog = Catalog::from_configs(
      vec![lesson_cfg("a", 1, &["ex-1", "ex-2"]), lesson_cfg("b", 2, &["ex-2", "ex-3"])],
      vec![],
    );
    assert_eq!(catalog.exercise("ex-2").unwrap().lesson_id, "a");
    let b_ids: Vec<_> = catalog.lesson("b").unwrap().exercises().map(|e| e.id.clone()).collect();
    assert_eq!(b_ids, vec!["ex-3"]);
  }

  #[test]
  fn config_lessons_replace_builtins_and_bad_lessons_are_skipped() {
    let mut bad = lesson_cfg("bad", 3, &["ex-bad"]);
    if let SectionCfg::Exercise { exercise, .. } = &mut bad.sections[0] {
      exercise.checks[0].all = vec!["(unclosed".into()];
    }
    let catalog = Catalog::from_configs(
      vec![lesson_cfg("a", 2, &["ex-old"]), lesson_cfg("b", 1, &["ex-b"])],
      vec![lesson_cfg("a", 5, &["ex-new"]), bad],
    );
    let ids: Vec<_> = catalog.lessons().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert!(catalog.exercise("ex-old").is_none());
    assert!(catalog.exercise("ex-new").is_some());
    assert!(catalog.exercise("ex-bad").is_none());
  }
}
