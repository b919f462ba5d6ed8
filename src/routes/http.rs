//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::logic::{self, LookupError};
use crate::progress::ExerciseProgress;
use crate::protocol::*;
use crate::state::AppState;
use crate::util::{learner_or, DEFAULT_LEARNER};

impl IntoResponse for LookupError {
  fn into_response(self) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_lessons(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(logic::list_lessons(&state))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<LessonOut>, LookupError> {
  logic::get_lesson(&state, &id).map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_exercise(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<ExerciseOut>, LookupError> {
  logic::get_exercise(&state, &id).map(Json)
}

#[instrument(level = "info", skip(state), fields(index = ?q.index))]
pub async fn http_get_hint(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Query(q): Query<HintQuery>,
) -> Result<Json<HintOut>, LookupError> {
  let hint = logic::hint(&state, &id, q.index)?;
  info!(target: "lean_trainer", exercise = %id, index = hint.index, "HTTP hint served");
  Ok(Json(hint))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_solution(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SolutionOut>, LookupError> {
  logic::reveal_solution(&state, &id).map(Json)
}

#[instrument(level = "info", skip(state, body), fields(code_len = body.code.len()))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmissionOutcome>, LookupError> {
  let learner = learner_or(body.learner_id.as_deref(), DEFAULT_LEARNER);
  let outcome = logic::submit_exercise(&state, learner, &id, &body.code).await?;
  info!(target: "grader", exercise = %id, %learner, success = outcome.report.success, "HTTP submit evaluated");
  Ok(Json(outcome))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_exercise_progress(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Query(q): Query<LearnerQuery>,
) -> Result<Json<ExerciseProgress>, LookupError> {
  let learner = learner_or(q.learner_id.as_deref(), DEFAULT_LEARNER);
  logic::exercise_progress(&state, learner, &id).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(code_len = body.code.len()))]
pub async fn http_post_run(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RunIn>,
) -> impl IntoResponse {
  Json(logic::run_code(&state, &body.code))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LearnerQuery>,
) -> impl IntoResponse {
  let learner = learner_or(q.learner_id.as_deref(), DEFAULT_LEARNER);
  Json(logic::progress_for(&state, learner).await)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_progress_reset(
  State(state): State<Arc<AppState>>,
  body: Option<Json<ResetIn>>,
) -> impl IntoResponse {
  let body = body.map(|Json(b)| b).unwrap_or_default();
  let learner = learner_or(body.learner_id.as_deref(), DEFAULT_LEARNER);
  Json(logic::reset_progress(&state, learner).await)
}
