//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Reference solutions never appear in lesson/exercise DTOs; they are only
//! sent by the explicit solution request.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Exercise, Lesson, Section};
use crate::grader::GradingReport;
use crate::progress::LearnerProgress;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Submit {
        #[serde(rename = "exerciseId")]
        exercise_id: String,
        code: String,
        #[serde(rename = "learnerId", default)]
        learner_id: Option<String>,
    },
    Run {
        code: String,
    },
    Hint {
        #[serde(rename = "exerciseId")]
        exercise_id: String,
        #[serde(default)]
        index: Option<usize>,
    },
    Solution {
        #[serde(rename = "exerciseId")]
        exercise_id: String,
    },
    Progress {
        #[serde(rename = "learnerId", default)]
        learner_id: Option<String>,
    },
}

impl ClientWsMessage {
    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientWsMessage::Ping => "ping",
            ClientWsMessage::Submit { .. } => "submit",
            ClientWsMessage::Run { .. } => "run",
            ClientWsMessage::Hint { .. } => "hint",
            ClientWsMessage::Solution { .. } => "solution",
            ClientWsMessage::Progress { .. } => "progress",
        }
    }

    /// Length of the submitted code, if the message carries any. Logs get
    /// this instead of the code itself.
    pub fn code_len(&self) -> Option<usize> {
        match self {
            ClientWsMessage::Submit { code, .. } | ClientWsMessage::Run { code } => Some(code.len()),
            _ => None,
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    SubmitResult {
        result: SubmissionOutcome,
    },
    RunResult {
        report: GradingReport,
    },
    Hint {
        hint: HintOut,
    },
    Solution {
        solution: SolutionOut,
    },
    Progress {
        progress: ProgressOut,
    },
    Error {
        message: String,
    },
}

//
// Catalog DTOs
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummaryOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub order: u32,
    pub exercise_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub order: u32,
    pub sections: Vec<SectionOut>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionOut {
    Content { title: String, body: String },
    Exercise { title: String, exercise: ExerciseOut },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOut {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub description: String,
    pub starter: String,
    pub hint_count: usize,
    /// Requirement descriptions, in grading order.
    pub requirements: Vec<String>,
}

pub fn lesson_summary(l: &Lesson) -> LessonSummaryOut {
    LessonSummaryOut {
        id: l.id.clone(),
        title: l.title.clone(),
        description: l.description.clone(),
        category: l.category,
        order: l.order,
        exercise_count: l.exercises().count(),
    }
}

pub fn exercise_out(lesson_id: &str, e: &Exercise) -> ExerciseOut {
    ExerciseOut {
        id: e.id.clone(),
        lesson_id: lesson_id.to_string(),
        title: e.title.clone(),
        description: e.description.clone(),
        starter: e.starter.clone(),
        hint_count: e.hints.len(),
        requirements: e.checks.iter().map(|c| c.description.clone()).collect(),
    }
}

pub fn lesson_out(l: &Lesson) -> LessonOut {
    LessonOut {
        id: l.id.clone(),
        title: l.title.clone(),
        description: l.description.clone(),
        category: l.category,
        order: l.order,
        sections: l
            .sections
            .iter()
            .map(|s| match s {
                Section::Content { title, body } => SectionOut::Content { title: title.clone(), body: body.clone() },
                Section::Exercise { title, exercise } => SectionOut::Exercise {
                    title: title.clone(),
                    exercise: exercise_out(&l.id, exercise),
                },
            })
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    pub index: Option<usize>,
}
#[derive(Debug, Serialize)]
pub struct HintOut {
    pub index: usize,
    pub total: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionOut {
    pub exercise_id: String,
    pub solution: String,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitIn {
    #[serde(rename = "learnerId", default)]
    pub learner_id: Option<String>,
    pub code: String,
}

/// Result of a graded submission after the progress notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub exercise_id: String,
    pub report: GradingReport,
    /// The lesson holding this exercise is complete for this learner.
    pub lesson_completed: bool,
    pub total_points: u32,
}

#[derive(Debug, Deserialize)]
pub struct RunIn {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LearnerQuery {
    #[serde(rename = "learnerId")]
    pub learner_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetIn {
    #[serde(rename = "learnerId", default)]
    pub learner_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
    pub learner_id: String,
    #[serde(flatten)]
    pub progress: LearnerProgress,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}
