//! In-memory learner progress: completed exercises and lessons plus points.
//!
//! Grading never touches this store. The application layer sends exactly one
//! notification per graded submission (`mark_complete` on success,
//! `record_attempt` otherwise) and then asks whether the lesson is done.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::ScoringSettings;

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
  pub lesson_id: String,
  pub exercise_id: String,
  pub completed: bool,
  pub user_code: String,
  pub attempts: u32,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProgress {
  pub completed_lessons: BTreeSet<String>,
  /// Keyed by exercise id.
  pub exercises: HashMap<String, ExerciseProgress>,
  pub total_points: u32,
}

impl LearnerProgress {
  fn entry(&mut self, lesson_id: &str, exercise_id: &str) -> &mut ExerciseProgress {
    self.exercises.entry(exercise_id.to_string()).or_insert_with(|| ExerciseProgress {
      lesson_id: lesson_id.to_string(),
      exercise_id: exercise_id.to_string(),
      ..Default::default()
    })
  }

  pub fn is_exercise_complete(&self, exercise_id: &str) -> bool {
    self.exercises.get(exercise_id).is_some_and(|e| e.completed)
  }
}

#[derive(Clone, Default)]
pub struct ProgressStore {
  learners: Arc<RwLock<HashMap<String, LearnerProgress>>>,
  scoring: ScoringSettings,
}

impl ProgressStore {
  pub fn new(scoring: ScoringSettings) -> Self {
    Self { learners: Arc::default(), scoring }
  }

  /// Passing submission. Points are awarded on the first completion only.
  #[instrument(level = "debug", skip(self, code), fields(%learner, %lesson_id, %exercise_id))]
  pub async fn mark_complete(&self, learner: &str, lesson_id: &str, exercise_id: &str, code: &str) -> u32 {
    let mut learners = self.learners.write().await;
    let progress = learners.entry(learner.to_string()).or_default();
    let entry = progress.entry(lesson_id, exercise_id);
    let first = !entry.completed;
    entry.completed = true;
    entry.user_code = code.to_string();
    entry.attempts += 1;
    if first {
      progress.total_points += self.scoring.exercise_points;
      info!(target: "progress", %learner, %exercise_id, total_points = progress.total_points, "Exercise completed");
    } else {
      debug!(target: "progress", %learner, %exercise_id, "Exercise already completed; no points awarded");
    }
    progress.total_points
  }

  /// Failing submission. An earlier completion is kept.
  #[instrument(level = "debug", skip(self, code), fields(%learner, %lesson_id, %exercise_id))]
  pub async fn record_attempt(&self, learner: &str, lesson_id: &str, exercise_id: &str, code: &str) -> u32 {
    let mut learners = self.learners.write().await;
    let progress = learners.entry(learner.to_string()).or_default();
    let entry = progress.entry(lesson_id, exercise_id);
    entry.user_code = code.to_string();
    entry.attempts += 1;
    debug!(target: "progress", %learner, %exercise_id, attempts = entry.attempts, "Attempt recorded");
    progress.total_points
  }

  /// Returns true only the first time the lesson is completed.
  #[instrument(level = "debug", skip(self), fields(%learner, %lesson_id))]
  pub async fn complete_lesson(&self, learner: &str, lesson_id: &str) -> bool {
    let mut learners = self.learners.write().await;
    let progress = learners.entry(learner.to_string()).or_default();
    if !progress.completed_lessons.insert(lesson_id.to_string()) {
      return false;
    }
    progress.total_points += self.scoring.lesson_points;
    info!(target: "progress", %learner, %lesson_id, total_points = progress.total_points, "Lesson completed");
    true
  }

  pub async fn snapshot(&self, learner: &str) -> LearnerProgress {
    self.learners.read().await.get(learner).cloned().unwrap_or_default()
  }

  pub async fn exercise(&self, learner: &str, exercise_id: &str) -> Option<ExerciseProgress> {
    self.learners.read().await.get(learner).and_then(|p| p.exercises.get(exercise_id).cloned())
  }

  pub async fn is_lesson_complete(&self, learner: &str, lesson_id: &str) -> bool {
    self
      .learners
      .read()
      .await
      .get(learner)
      .is_some_and(|p| p.completed_lessons.contains(lesson_id))
  }

  #[instrument(level = "info", skip(self), fields(%learner))]
  pub async fn reset(&self, learner: &str) {
    if self.learners.write().await.remove(learner).is_some() {
      info!(target: "progress", %learner, "Progress reset");
    }
  }
}
