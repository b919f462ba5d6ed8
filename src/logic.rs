//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Grading a submission and sending the single progress notification
//!   - Incremental hints and the opt-in reference solution
//!   - Free-form runs (syntax check + simulated evaluation only)
//!   - Catalog and progress views

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::grader::{self, GradingReport};
use crate::protocol::{
  exercise_out, lesson_out, lesson_summary, ExerciseOut, HintOut, LessonOut, LessonSummaryOut, ProgressOut,
  SolutionOut, SubmissionOutcome,
};
use crate::progress::ExerciseProgress;
use crate::state::AppState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
  #[error("Unknown exerciseId: {0}")]
  UnknownExercise(String),
  #[error("Unknown lessonId: {0}")]
  UnknownLesson(String),
}

const NO_HINTS: &str = "No hints available for this exercise.";

/// Grade, notify progress exactly once, then complete the lesson if every
/// exercise in it is now complete.
#[instrument(level = "info", skip(state, code), fields(%learner, %exercise_id, code_len = code.len()))]
pub async fn submit_exercise(
  state: &AppState,
  learner: &str,
  exercise_id: &str,
  code: &str,
) -> Result<SubmissionOutcome, LookupError> {
  let entry = state
    .catalog
    .exercise(exercise_id)
    .ok_or_else(|| LookupError::UnknownExercise(exercise_id.to_string()))?;
  let report = grader::grade(code, &entry.exercise, &state.grading);

  let mut total_points = if report.success {
    state.progress.mark_complete(learner, &entry.lesson_id, exercise_id, code).await
  } else {
    state.progress.record_attempt(learner, &entry.lesson_id, exercise_id, code).await
  };

  if report.success && !state.progress.is_lesson_complete(learner, &entry.lesson_id).await {
    let snapshot = state.progress.snapshot(learner).await;
    let all_done = state
      .catalog
      .lesson(&entry.lesson_id)
      .is_some_and(|l| l.exercises().all(|e| snapshot.is_exercise_complete(&e.id)));
    if all_done && state.progress.complete_lesson(learner, &entry.lesson_id).await {
      total_points = state.progress.snapshot(learner).await.total_points;
    }
  }
  let lesson_completed = state.progress.is_lesson_complete(learner, &entry.lesson_id).await;

  info!(target: "progress", %learner, %exercise_id, success = report.success, lesson_completed, total_points, "Submission processed");
  Ok(SubmissionOutcome {
    exercise_id: exercise_id.to_string(),
    report,
    lesson_completed,
    total_points,
  })
}

/// Free-form run with no exercise attached; never touches progress.
#[instrument(level = "info", skip(state, code), fields(code_len = code.len()))]
pub fn run_code(state: &AppState, code: &str) -> GradingReport {
  grader::run(code, &state.grading)
}

/// Hints are revealed one at a time; an index past the end yields the last hint.
#[instrument(level = "info", skip(state), fields(%exercise_id))]
pub fn hint(state: &AppState, exercise_id: &str, index: Option<usize>) -> Result<HintOut, LookupError> {
  let entry = state
    .catalog
    .exercise(exercise_id)
    .ok_or_else(|| LookupError::UnknownExercise(exercise_id.to_string()))?;
  let hints = &entry.exercise.hints;
  let Some(last) = hints.len().checked_sub(1) else {
    return Ok(HintOut { index: 0, total: 0, text: NO_HINTS.into() });
  };
  let index = index.unwrap_or(0).min(last);
  debug!(target: "lean_trainer", %exercise_id, index, total = hints.len(), "Hint served");
  Ok(HintOut { index, total: hints.len(), text: hints[index].clone() })
}

#[instrument(level = "info", skip(state), fields(%exercise_id))]
pub fn reveal_solution(state: &AppState, exercise_id: &str) -> Result<SolutionOut, LookupError> {
  let entry = state
    .catalog
    .exercise(exercise_id)
    .ok_or_else(|| LookupError::UnknownExercise(exercise_id.to_string()))?;
  info!(target: "lean_trainer", %exercise_id, "Reference solution revealed");
  Ok(SolutionOut {
    exercise_id: entry.exercise.id.clone(),
    solution: entry.exercise.solution.clone(),
    explanation: entry.exercise.explanation.clone(),
  })
}

pub fn list_lessons(state: &AppState) -> Vec<LessonSummaryOut> {
  state.catalog.lessons().iter().map(|l| lesson_summary(l)).collect()
}

pub fn get_lesson(state: &AppState, lesson_id: &str) -> Result<LessonOut, LookupError> {
  state
    .catalog
    .lesson(lesson_id)
    .map(|l| lesson_out(l))
    .ok_or_else(|| LookupError::UnknownLesson(lesson_id.to_string()))
}

pub fn get_exercise(state: &AppState, exercise_id: &str) -> Result<ExerciseOut, LookupError> {
  state
    .catalog
    .exercise(exercise_id)
    .map(|e| exercise_out(&e.lesson_id, &e.exercise))
    .ok_or_else(|| LookupError::UnknownExercise(exercise_id.to_string()))
}

pub async fn progress_for(state: &AppState, learner: &str) -> ProgressOut {
  ProgressOut { learner_id: learner.to_string(), progress: state.progress.snapshot(learner).await }
}

/// Progress on one exercise; an untouched exercise reads as zero attempts.
pub async fn exercise_progress(
  state: &AppState,
  learner: &str,
  exercise_id: &str,
) -> Result<ExerciseProgress, LookupError> {
  let entry = state
    .catalog
    .exercise(exercise_id)
    .ok_or_else(|| LookupError::UnknownExercise(exercise_id.to_string()))?;
  Ok(state.progress.exercise(learner, exercise_id).await.unwrap_or_else(|| ExerciseProgress {
    lesson_id: entry.lesson_id.clone(),
    exercise_id: exercise_id.to_string(),
    ..Default::default()
  }))
}

pub async fn reset_progress(state: &AppState, learner: &str) -> ProgressOut {
  state.progress.reset(learner).await;
  progress_for(state, learner).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::TrainerConfig;

  fn state() -> AppState {
    AppState::with_config(TrainerConfig::default())
  }

  async fn solve(state: &AppState, learner: &str, exercise_id: &str) -> SubmissionOutcome {
    let code = state.catalog.exercise(exercise_id).unwrap().exercise.solution.clone();
    submit_exercise(state, learner, exercise_id, &code).await.unwrap()
  }

  #[tokio::test]
  async fn passing_submission_awards_points_once() {
    let st = state();
    let first = solve(&st, "amy", "ex-01-basic-values").await;
    assert!(first.report.success);
    assert_eq!(first.total_points, 25);
    assert!(!first.lesson_completed);
    let again = solve(&st, "amy", "ex-01-basic-values").await;
    assert_eq!(again.total_points, 25);
    assert_eq!(st.progress.exercise("amy", "ex-01-basic-values").await.unwrap().attempts, 2);
  }

  #[tokio::test]
  async fn failing_submission_only_records_attempt() {
    let st = state();
    let out = submit_exercise(&st, "amy", "ex-01-basic-values", "def myNumber : Nat := 42").await.unwrap();
    assert!(!out.report.success);
    assert_eq!(out.total_points, 0);
    let ex = exercise_progress(&st, "amy", "ex-01-basic-values").await.unwrap();
    assert!(!ex.completed);
    assert_eq!(ex.attempts, 1);
    assert_eq!(ex.user_code, "def myNumber : Nat := 42");

    let untouched = exercise_progress(&st, "amy", "ex-02-functions").await.unwrap();
    assert_eq!(untouched.attempts, 0);
    assert_eq!(untouched.lesson_id, "01-lean-basics");
  }

  #[tokio::test]
  async fn finishing_every_exercise_completes_the_lesson() {
    let st = state();
    let ids: Vec<String> =
      st.catalog.lesson("02-logic-proofs").unwrap().exercises().map(|e| e.id.clone()).collect();
    let mut last = None;
    for id in &ids {
      last = Some(solve(&st, "amy", id).await);
    }
    let last = last.unwrap();
    assert!(last.lesson_completed);
    assert_eq!(last.total_points, 25 * ids.len() as u32 + 100);

    // Re-solving does not award the lesson bonus again.
    let again = solve(&st, "amy", &ids[0]).await;
    assert_eq!(again.total_points, last.total_points);
  }

  #[tokio::test]
  async fn unknown_exercise_is_a_lookup_error() {
    let st = state();
    assert_eq!(
      submit_exercise(&st, "amy", "ex-nope", "def x := 1").await.unwrap_err(),
      LookupError::UnknownExercise("ex-nope".into())
    );
    assert!(hint(&st, "ex-nope", None).is_err());
    assert!(reveal_solution(&st, "ex-nope").is_err());
    assert!(get_lesson(&st, "nope").is_err());
  }

  #[test]
  fn hint_index_clamps_to_last() {
    let st = state();
    let total = st.catalog.exercise("ex-01-basic-values").unwrap().exercise.hints.len();
    let first = hint(&st, "ex-01-basic-values", None).unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.total, total);
    let clamped = hint(&st, "ex-01-basic-values", Some(99)).unwrap();
    assert_eq!(clamped.index, total - 1);
    assert_eq!(clamped.text, "Nat is the type for natural numbers, String for text");
  }

  #[test]
  fn lesson_views_hide_solutions() {
    let st = state();
    let lesson = get_lesson(&st, "01-lean-basics").unwrap();
    let json = serde_json::to_string(&lesson).unwrap();
    assert!(!json.contains("\"solution\""));
    assert_eq!(list_lessons(&st).len(), 10);
    let ex = get_exercise(&st, "ex-01-basic-values").unwrap();
    assert_eq!(ex.lesson_id, "01-lean-basics");
    assert_eq!(ex.requirements, vec!["def myNumber", "def myName"]);
    let sol = reveal_solution(&st, "ex-01-basic-values").unwrap();
    assert!(sol.solution.contains("def myNumber : Nat := 42"));
  }

  #[tokio::test]
  async fn run_and_reset_leave_no_trace() {
    let st = state();
    let report = run_code(&st, "def x := 1\n#eval x");
    assert!(report.success);
    assert!(report.output.contains("#eval x: [evaluated]"));
    solve(&st, "amy", "ex-01-basic-values").await;
    let after = reset_progress(&st, "amy").await;
    assert_eq!(after.progress.total_points, 0);
    assert!(after.progress.exercises.is_empty());
  }
}
