//! Domain models: lessons, their sections, and graded exercises.
//!
//! These are built once from content configuration (`config::LessonCfg`) and
//! never mutated afterwards. Patterns are compiled here so that a bad pattern
//! is a load-time error, not a grading-time one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{CheckCfg, ExerciseCfg, LessonCfg, SectionCfg};
use crate::rules::{PatternRule, RequirementCheck};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Basics,
  Cryptography,
  Advanced,
}

#[derive(Debug, Error)]
pub enum ContentError {
  #[error("failed to parse content file {file}: {source}")]
  Parse {
    file: String,
    #[source]
    source: toml::de::Error,
  },
  #[error("exercise {exercise}, check '{check}': invalid pattern: {source}")]
  InvalidPattern {
    exercise: String,
    check: String,
    #[source]
    source: regex::Error,
  },
  #[error("exercise {exercise}, check '{check}': no patterns given")]
  EmptyRule { exercise: String, check: String },
  #[error("exercise {0} has no requirement checks")]
  EmptyChecks(String),
}

/// One graded task. The solution is only revealed on request.
#[derive(Clone, Debug)]
pub struct Exercise {
  pub id: String,
  pub title: String,
  pub description: String,
  pub starter: String,
  pub solution: String,
  pub explanation: String,
  pub hints: Vec<String>,
  pub checks: Vec<RequirementCheck>,
}

#[derive(Clone, Debug)]
pub enum Section {
  Content { title: String, body: String },
  Exercise { title: String, exercise: Arc<Exercise> },
}

#[derive(Clone, Debug)]
pub struct Lesson {
  pub id: String,
  pub title: String,
  pub description: String,
  pub category: Category,
  pub order: u32,
  pub sections: Vec<Section>,
}

impl Lesson {
  pub fn exercises(&self) -> impl Iterator<Item = &Arc<Exercise>> {
    self.sections.iter().filter_map(|s| match s {
      Section::Exercise { exercise, .. } => Some(exercise),
      Section::Content { .. } => None,
    })
  }
}

fn compile_check(exercise: &str, cfg: CheckCfg) -> Result<RequirementCheck, ContentError> {
  let rule = PatternRule::compile(&cfg.all, &cfg.any, &cfg.none).map_err(|source| {
    ContentError::InvalidPattern { exercise: exercise.to_string(), check: cfg.description.clone(), source }
  })?;
  if rule.is_vacuous() {
    return Err(ContentError::EmptyRule { exercise: exercise.to_string(), check: cfg.description });
  }
  Ok(RequirementCheck::new(cfg.description, rule))
}

impl TryFrom<ExerciseCfg> for Exercise {
  type Error = ContentError;

  fn try_from(cfg: ExerciseCfg) -> Result<Self, Self::Error> {
    if cfg.checks.is_empty() {
      return Err(ContentError::EmptyChecks(cfg.id));
    }
    let checks = cfg
      .checks
      .into_iter()
      .map(|c| compile_check(&cfg.id, c))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Exercise {
      id: cfg.id,
      title: cfg.title,
      description: cfg.description,
      starter: cfg.starter,
      solution: cfg.solution,
      explanation: cfg.explanation,
      hints: cfg.hints,
      checks,
    })
  }
}

impl TryFrom<LessonCfg> for Lesson {
  type Error = ContentError;

  fn try_from(cfg: LessonCfg) -> Result<Self, Self::Error> {
    let sections = cfg
      .sections
      .into_iter()
      .map(|s| match s {
        SectionCfg::Content { title, body } => Ok(Section::Content { title, body }),
        SectionCfg::Exercise { title, exercise } => {
          Ok(Section::Exercise { title, exercise: Arc::new(Exercise::try_from(exercise)?) })
        }
      })
      .collect::<Result<Vec<_>, ContentError>>()?;
    Ok(Lesson {
      id: cfg.id,
      title: cfg.title,
      description: cfg.description,
      category: cfg.category,
      order: cfg.order,
      sections,
    })
  }
}
