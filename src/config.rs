//! Loading trainer configuration (grading/scoring settings + optional extra
//! lessons) from TOML.
//!
//! The same lesson schema is used by the built-in content files under
//! `content/lessons/` and by `[[lessons]]` entries in the config file.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Category;
use crate::syntax::MismatchPolicy;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TrainerConfig {
  #[serde(default)]
  pub grading: GradingSettings,
  #[serde(default)]
  pub scoring: ScoringSettings,
  #[serde(default)]
  pub lessons: Vec<LessonCfg>,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct GradingSettings {
  #[serde(default)]
  pub mismatch_policy: MismatchPolicy,
}

/// Points awarded by the progress store. Each award is given at most once.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringSettings {
  pub exercise_points: u32,
  pub lesson_points: u32,
}

impl Default for ScoringSettings {
  fn default() -> Self {
    Self { exercise_points: 25, lesson_points: 100 }
  }
}

/// Lesson entry as authored in TOML.
#[derive(Clone, Debug, Deserialize)]
pub struct LessonCfg {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  pub category: Category,
  pub order: u32,
  #[serde(default)] pub sections: Vec<SectionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionCfg {
  Content {
    title: String,
    #[serde(default)]
    body: String,
  },
  Exercise {
    title: String,
    exercise: ExerciseCfg,
  },
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseCfg {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub starter: String,
  pub solution: String,
  #[serde(default)] pub explanation: String,
  #[serde(default)] pub hints: Vec<String>,
  #[serde(default)] pub checks: Vec<CheckCfg>,
}

/// A requirement check: every `all` pattern, at least one `any` pattern (if
/// given), and no `none` pattern must match the submission.
#[derive(Clone, Debug, Deserialize)]
pub struct CheckCfg {
  pub description: String,
  #[serde(default)] pub all: Vec<String>,
  #[serde(default)] pub any: Vec<String>,
  #[serde(default)] pub none: Vec<String>,
}

pub fn parse_trainer_config(s: &str) -> Result<TrainerConfig, toml::de::Error> {
  toml::from_str::<TrainerConfig>(s)
}

/// Attempt to load `TrainerConfig` from TRAINER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_trainer_config_from_env() -> Option<TrainerConfig> {
  let path = std::env::var("TRAINER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_trainer_config(&s) {
      Ok(cfg) => {
        info!(target: "lean_trainer", %path, extra_lessons = cfg.lessons.len(), "Loaded trainer config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lean_trainer", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lean_trainer", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
