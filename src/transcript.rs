//! Simulated evaluation: a plausible-looking output transcript, no execution.
//!
//! - One acceptance message per top-level construct kind present, in a fixed kind order.
//! - One echo line per `#eval` directive, then one per `#check` directive, each in source order.
//! - One warning per incomplete-work marker present.
//!
//! Nothing is evaluated: `#eval 1 + 2` echoes `1 + 2`, never `3`.

use std::sync::LazyLock;

use regex::Regex;

use crate::placeholder::markers_in;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructKind {
  Definition,
  Theorem,
  Structure,
  Inductive,
}

impl ConstructKind {
  /// Reporting order.
  pub const ALL: [ConstructKind; 4] = [
    ConstructKind::Definition,
    ConstructKind::Theorem,
    ConstructKind::Structure,
    ConstructKind::Inductive,
  ];

  fn keyword(self) -> &'static str {
    match self {
      ConstructKind::Definition => "def",
      ConstructKind::Theorem => "theorem",
      ConstructKind::Structure => "structure",
      ConstructKind::Inductive => "inductive",
    }
  }

  pub fn acceptance_message(self) -> &'static str {
    match self {
      ConstructKind::Definition => "Definition compiled successfully.",
      ConstructKind::Theorem => "Theorem compiled successfully.",
      ConstructKind::Structure => "Structure compiled successfully.",
      ConstructKind::Inductive => "Inductive type compiled successfully.",
    }
  }
}

/// Directive tokens and the marker appended to their echo.
const EVAL_DIRECTIVE: (&str, &str) = ("#eval", "[evaluated]");
const CHECK_DIRECTIVE: (&str, &str) = ("#check", "[type checked]");

struct Patterns {
  kinds: Vec<(ConstructKind, Regex)>,
  eval: Regex,
  check: Regex,
}

fn directive_pattern(token: &str) -> Regex {
  Regex::new(&format!(r"{}\s+(.+)", regex::escape(token))).expect("directive pattern")
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
  kinds: ConstructKind::ALL
    .iter()
    .map(|k| (*k, Regex::new(&format!(r"\b{}\s+\w+", k.keyword())).expect("construct pattern")))
    .collect(),
  eval: directive_pattern(EVAL_DIRECTIVE.0),
  check: directive_pattern(CHECK_DIRECTIVE.0),
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulatedRun {
  pub compiler_messages: Vec<String>,
  pub eval_lines: Vec<String>,
  pub warnings: Vec<String>,
}

impl SimulatedRun {
  /// Compiler messages followed by directive output.
  pub fn output_lines(&self) -> impl Iterator<Item = &str> {
    self.compiler_messages.iter().chain(self.eval_lines.iter()).map(String::as_str)
  }
}

pub fn construct_kinds(text: &str) -> Vec<ConstructKind> {
  PATTERNS.kinds.iter().filter(|(_, re)| re.is_match(text)).map(|(k, _)| *k).collect()
}

fn echo_directives(re: &Regex, (token, marker): (&str, &str), text: &str, out: &mut Vec<String>) {
  for caps in re.captures_iter(text) {
    out.push(format!("{} {}: {}", token, caps[1].trim(), marker));
  }
}

/// Assumes the syntax check already passed; never produces errors.
pub fn report(text: &str) -> SimulatedRun {
  let compiler_messages = construct_kinds(text)
    .into_iter()
    .map(|k| k.acceptance_message().to_string())
    .collect();

  let mut eval_lines = Vec::new();
  echo_directives(&PATTERNS.eval, EVAL_DIRECTIVE, text, &mut eval_lines);
  echo_directives(&PATTERNS.check, CHECK_DIRECTIVE, text, &mut eval_lines);

  let warnings = markers_in(text).into_iter().map(|m| m.warning()).collect();

  SimulatedRun { compiler_messages, eval_lines, warnings }
}
