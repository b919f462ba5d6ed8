//! Application state: lesson catalog, grading/scoring settings, and the
//! in-memory progress store.
//!
//! The catalog is read-only after startup and shared without locking; only
//! the progress store mutates.

use std::collections::HashMap;

use tracing::{error, info, instrument};

use crate::catalog::Catalog;
use crate::config::{load_trainer_config_from_env, GradingSettings, ScoringSettings, TrainerConfig};
use crate::domain::Category;
use crate::progress::ProgressStore;
use crate::seeds::builtin_lessons;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Catalog,
  pub grading: GradingSettings,
  pub scoring: ScoringSettings,
  pub progress: ProgressStore,
}

impl AppState {
  /// Build state from env: load config (if any), compile the catalog.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg = load_trainer_config_from_env().unwrap_or_default();
    Self::with_config(cfg)
  }

  pub fn with_config(cfg: TrainerConfig) -> Self {
    let builtin = builtin_lessons().unwrap_or_else(|e| {
      error!(target: "lean_trainer", error = %e, "Built-in lessons failed to load; serving config lessons only");
      Vec::new()
    });
    let catalog = Catalog::from_configs(builtin, cfg.lessons);

    // Inventory summary by category.
    let mut by_category: HashMap<Category, (usize, usize)> = HashMap::new();
    for lesson in catalog.lessons() {
      let entry = by_category.entry(lesson.category).or_insert((0, 0));
      entry.0 += 1;
      entry.1 += lesson.exercises().count();
    }
    for (category, (lessons, exercises)) in by_category {
      info!(target: "lean_trainer", ?category, lessons, exercises, "Startup lesson inventory");
    }
    info!(target: "lean_trainer", mismatch_policy = ?cfg.grading.mismatch_policy, exercise_points = cfg.scoring.exercise_points, lesson_points = cfg.scoring.lesson_points, "Grading settings");

    Self {
      catalog,
      grading: cfg.grading,
      scoring: cfg.scoring,
      progress: ProgressStore::new(cfg.scoring),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntax::MismatchPolicy;

  #[test]
  fn default_config_serves_builtin_catalog() {
    let state = AppState::with_config(TrainerConfig::default());
    assert_eq!(state.catalog.lessons().len(), 10);
    assert_eq!(state.grading.mismatch_policy, MismatchPolicy::Continue);
    assert_eq!(state.scoring.exercise_points, 25);
  }

  #[tokio::test]
  async fn scoring_settings_reach_the_progress_store() {
    let cfg = TrainerConfig {
      scoring: ScoringSettings { exercise_points: 7, lesson_points: 70 },
      ..Default::default()
    };
    let state = AppState::with_config(cfg);
    assert_eq!(state.progress.mark_complete("amy", "l", "e", "").await, 7);
  }
}
