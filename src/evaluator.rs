//! Requirement set evaluation: run every check in declared order and partition.

use crate::rules::{RequirementCheck, RuleOutcome};

/// Why a requirement did not pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
  MissingConstruct,
  ForbiddenConstruct,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedRequirement {
  pub description: String,
  pub reason: FailureReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
  pub passed: Vec<String>,
  pub failed: Vec<FailedRequirement>,
}

impl Evaluation {
  pub fn total(&self) -> usize {
    self.passed.len() + self.failed.len()
  }

  pub fn all_passed(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Every check runs, even after a failure, so one bad check cannot hide the
/// diagnostics of the others.
pub fn evaluate(text: &str, checks: &[RequirementCheck]) -> Evaluation {
  let mut eval = Evaluation::default();
  for check in checks {
    let reason = match check.check(text) {
      RuleOutcome::Satisfied => {
        eval.passed.push(check.description.clone());
        continue;
      }
      RuleOutcome::Missing => FailureReason::MissingConstruct,
      RuleOutcome::Forbidden => FailureReason::ForbiddenConstruct,
    };
    eval.failed.push(FailedRequirement { description: check.description.clone(), reason });
  }
  eval
}
