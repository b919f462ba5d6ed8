//! Lightweight structural validation of submitted source text.
//!
//! This is not a parser. It only checks that the three paired delimiter kinds
//! balance and that every `def` line is eventually followed by something that
//! completes it. No awareness of strings or comments.

use serde::Deserialize;

/// What the bracket scanner does once it has seen a mismatched closer.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
  /// Keep popping and comparing after a mismatch. Already-unbalanced input can
  /// produce a cascade of mismatch errors; this matches the historic diagnostics.
  #[default]
  Continue,
  /// Stop scanning at the first mismatch and skip the unclosed listing.
  FailFast,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxCheck {
  pub valid: bool,
  pub errors: Vec<String>,
}

const ASSIGNMENT_MARKER: &str = ":=";
const BLOCK_MARKER: &str = "where";
const MATCH_ARM: char = '|';

fn closer_for(ch: char) -> Option<char> {
  match ch {
    '(' => Some(')'),
    '[' => Some(']'),
    '{' => Some('}'),
    _ => None,
  }
}

fn is_closer(ch: char) -> bool {
  matches!(ch, ')' | ']' | '}')
}

/// Run both structural checks. Never panics; valid iff no errors were found.
pub fn check(text: &str, policy: MismatchPolicy) -> SyntaxCheck {
  let mut errors = check_brackets(text, policy);
  errors.extend(check_definitions(text));
  SyntaxCheck { valid: errors.is_empty(), errors }
}

fn check_brackets(text: &str, policy: MismatchPolicy) -> Vec<String> {
  let mut errors = Vec::new();
  let mut expected: Vec<char> = Vec::new();

  for ch in text.chars() {
    if let Some(closer) = closer_for(ch) {
      expected.push(closer);
    } else if is_closer(ch) && expected.pop() != Some(ch) {
      errors.push(format!("Mismatched bracket: {}", ch));
      if policy == MismatchPolicy::FailFast {
        return errors;
      }
    }
  }

  if !expected.is_empty() {
    let listing: Vec<String> = expected.iter().map(|c| c.to_string()).collect();
    errors.push(format!("Unclosed bracket(s): {}", listing.join(", ")));
  }
  errors
}

fn introduces_definition(line: &str) -> bool {
  line
    .trim()
    .strip_prefix("def")
    .and_then(|rest| rest.chars().next())
    .is_some_and(char::is_whitespace)
}

fn completes_on_line(line: &str) -> bool {
  line.contains(ASSIGNMENT_MARKER) || line.contains(BLOCK_MARKER)
}

// A later line may complete a definition with `:=`/`where` anywhere, or by
// opening an equation-style match arm.
fn completes_later(line: &str) -> bool {
  completes_on_line(line) || line.trim_start().starts_with(MATCH_ARM)
}

fn check_definitions(text: &str) -> Vec<String> {
  let lines: Vec<&str> = text.split('\n').collect();
  lines
    .iter()
    .enumerate()
    .filter(|(_, line)| introduces_definition(line) && !completes_on_line(line))
    .filter(|(i, _)| !lines[i + 1..].iter().any(|l| completes_later(l)))
    .map(|(i, _)| format!("Line {}: Definition appears incomplete. Use ':=' or 'where'.", i + 1))
    .collect()
}
