//! Grading orchestrator: the single entry point that turns a submission and an
//! exercise into a `GradingReport`.
//!
//! Stages, in order:
//!   1. syntax sanity check (short-circuits; no transcript, no requirements)
//!   2. simulated run (transcript + informational marker warnings)
//!   3. requirement checks, all of them, in declared order
//!   4. incomplete-work gate (can turn a pass into a fail)
//!
//! Grading is pure: no I/O, no shared state. Progress notifications are the
//! caller's job (see `logic::submit_exercise`).

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::GradingSettings;
use crate::domain::Exercise;
use crate::evaluator::{evaluate, Evaluation, FailureReason};
use crate::placeholder::markers_in;
use crate::rules::RequirementCheck;
use crate::syntax;
use crate::transcript::{self, SimulatedRun};

pub const INTERNAL_FAILURE: &str = "An error occurred while grading the submission.";
const FAILURE_HINT: &str =
  "Hint: Check the exercise requirements and make sure your code matches the expected pattern.";

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct GradingReport {
  pub success: bool,
  pub passed: Vec<String>,
  pub failed: Vec<String>,
  pub warnings: Vec<String>,
  pub errors: Vec<String>,
  pub output: String,
}

impl GradingReport {
  fn fatal(errors: Vec<String>) -> Self {
    Self { success: false, errors, ..Default::default() }
  }
}

/// Grade one submission against one exercise.
#[instrument(level = "debug", target = "grader", skip_all, fields(exercise = %exercise.id, code_len = submission.len()))]
pub fn grade(submission: &str, exercise: &Exercise, settings: &GradingSettings) -> GradingReport {
  grade_with(submission, exercise, settings, evaluate)
}

fn grade_with<F>(submission: &str, exercise: &Exercise, settings: &GradingSettings, eval_fn: F) -> GradingReport
where
  F: FnOnce(&str, &[RequirementCheck]) -> Evaluation,
{
  let syntax = syntax::check(submission, settings.mismatch_policy);
  if !syntax.valid {
    info!(target: "grader", exercise = %exercise.id, errors = syntax.errors.len(), "Rejected by syntax check");
    return GradingReport::fatal(syntax.errors);
  }

  let run = transcript::report(submission);
  debug!(target: "grader", messages = run.compiler_messages.len(), directives = run.eval_lines.len(), warnings = run.warnings.len(), "Simulated run finished");

  let Some(eval) = evaluate_guarded(|| eval_fn(submission, &exercise.checks)) else {
    error!(target: "grader", exercise = %exercise.id, "Requirement evaluation panicked; failing closed");
    return GradingReport::fatal(vec![INTERNAL_FAILURE.to_string()]);
  };

  let markers = markers_in(submission);
  let success = eval.all_passed() && markers.is_empty();
  if eval.all_passed() && !markers.is_empty() {
    debug!(target: "grader", exercise = %exercise.id, "All checks passed but incomplete-work markers are present");
  }

  let mut failed: Vec<String> = eval.failed.iter().map(|f| f.description.clone()).collect();
  failed.extend(markers.iter().map(|m| m.removal.to_string()));

  let output = render_output(&run, &eval, &failed, success);
  info!(target: "grader", exercise = %exercise.id, %success, passed = eval.passed.len(), total = eval.total(), "Graded submission");

  GradingReport {
    success,
    passed: eval.passed,
    failed,
    warnings: run.warnings,
    errors: Vec::new(),
    output,
  }
}

/// Syntax check and simulated run only, for free-form "run" requests with no
/// exercise attached. Success means the code passed the syntax check.
#[instrument(level = "debug", target = "grader", skip_all, fields(code_len = submission.len()))]
pub fn run(submission: &str, settings: &GradingSettings) -> GradingReport {
  let syntax = syntax::check(submission, settings.mismatch_policy);
  if !syntax.valid {
    return GradingReport::fatal(syntax.errors);
  }
  let run = transcript::report(submission);
  GradingReport {
    success: true,
    output: run.output_lines().collect::<Vec<_>>().join("\n"),
    warnings: run.warnings,
    ..Default::default()
  }
}

fn evaluate_guarded<F: FnOnce() -> Evaluation>(f: F) -> Option<Evaluation> {
  panic::catch_unwind(AssertUnwindSafe(f)).ok()
}

fn render_output(run: &SimulatedRun, eval: &Evaluation, failed: &[String], success: bool) -> String {
  let mut lines: Vec<String> = run.output_lines().map(str::to_string).collect();
  if !lines.is_empty() {
    lines.push(String::new());
  }

  let total = eval.total();
  if success {
    lines.push(format!("All tests passed! ({}/{})", eval.passed.len(), total));
    lines.push(String::new());
    lines.push("Passed:".into());
    lines.extend(eval.passed.iter().map(|p| format!("  ✓ {}", p)));
    return lines.join("\n");
  }

  lines.push(format!("Tests: {}/{} passed", eval.passed.len(), total));
  if !eval.passed.is_empty() {
    lines.push(String::new());
    lines.push("Passed:".into());
    lines.extend(eval.passed.iter().map(|p| format!("  ✓ {}", p)));
  }
  lines.push(String::new());
  lines.push("Failed:".into());
  for (i, desc) in failed.iter().enumerate() {
    let forbidden = eval
      .failed
      .get(i)
      .is_some_and(|f| f.reason == FailureReason::ForbiddenConstruct);
    if forbidden {
      lines.push(format!("  ✗ {} (forbidden construct present)", desc));
    } else {
      lines.push(format!("  ✗ {}", desc));
    }
  }
  lines.push(String::new());
  lines.push(FAILURE_HINT.into());
  lines.join("\n")
}
