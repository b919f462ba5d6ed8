//! Pattern rules: one named, testable predicate over the full submission text.

use regex::Regex;

/// Result of testing one rule against a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
  Satisfied,
  /// A required construct was not found.
  Missing,
  /// A construct the rule rejects is present.
  Forbidden,
}

/// Compiled predicate: every `all` pattern matches, at least one `any` pattern
/// matches (when any are given), and no `none` pattern matches.
#[derive(Clone, Debug, Default)]
pub struct PatternRule {
  all: Vec<Regex>,
  any: Vec<Regex>,
  none: Vec<Regex>,
}

fn compile_each<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, regex::Error> {
  patterns.iter().map(|p| Regex::new(p.as_ref())).collect()
}

impl PatternRule {
  pub fn compile<S: AsRef<str>>(all: &[S], any: &[S], none: &[S]) -> Result<Self, regex::Error> {
    Ok(Self {
      all: compile_each(all)?,
      any: compile_each(any)?,
      none: compile_each(none)?,
    })
  }

  /// A rule with no patterns accepts everything; content loading rejects it.
  pub fn is_vacuous(&self) -> bool {
    self.all.is_empty() && self.any.is_empty() && self.none.is_empty()
  }

  pub fn outcome(&self, text: &str) -> RuleOutcome {
    if self.none.iter().any(|re| re.is_match(text)) {
      return RuleOutcome::Forbidden;
    }
    let required = self.all.iter().all(|re| re.is_match(text));
    let alternative = self.any.is_empty() || self.any.iter().any(|re| re.is_match(text));
    if required && alternative {
      RuleOutcome::Satisfied
    } else {
      RuleOutcome::Missing
    }
  }
}

/// A requirement as shown to the learner: description plus predicate.
#[derive(Clone, Debug)]
pub struct RequirementCheck {
  pub description: String,
  pub rule: PatternRule,
}

impl RequirementCheck {
  pub fn new(description: impl Into<String>, rule: PatternRule) -> Self {
    Self { description: description.into(), rule }
  }

  pub fn check(&self, text: &str) -> RuleOutcome {
    self.rule.outcome(text)
  }
}
