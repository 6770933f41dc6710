//! Quiz sessions
//!
//! - [`practice`] - one question at a time with immediate feedback
//! - [`full_test`] - timed, freely navigable, batch submission
//! - [`timer`] - countdown primitives for the full test
//!
//! Sessions only hold state. Mastery updates and history appends are applied by
//! [`crate::engine::QuizEngine`], which drives these state machines.

pub mod practice;
pub mod timer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{SessionLength, SessionMode};

pub use full_test::{FullTestSession, FullTestState, ReviewRow, TestReport};
pub use practice::{Feedback, PracticeSession, PracticeState};
pub use timer::{Countdown, CountdownEvent, CountdownState, CountdownTask, TickOutcome};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a starter tier must be chosen before starting a session")]
    StarterTierRequired,
    #[error("no answer selected")]
    NoAnswerSelected,
    #[error("answer already submitted for this question")]
    AnswerLocked,
    #[error("feedback must be shown before advancing")]
    FeedbackPending,
    #[error("session is complete")]
    Complete,
    #[error("test has not been started")]
    NotStarted,
    #[error("test already started")]
    AlreadyStarted,
    #[error("test already submitted")]
    AlreadySubmitted,
    #[error("question index {index} out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

/// Session metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub mode: SessionMode,
    /// Requested length; the actual question count may be smaller
    pub requested: SessionLength,
    pub question_count: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionInfo {
    pub(crate) fn new(mode: SessionMode, requested: SessionLength, question_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            requested,
            question_count,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub(crate) fn end(&mut self, at: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(at);
        }
    }
}
