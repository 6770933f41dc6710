//! Practice session
//!
//! `AwaitingAnswer -> ShowingFeedback -> AwaitingAnswer ... -> Complete`
//!
//! Submitting locks the selected choice for the current question. The engine
//! applies the mastery update and history append, then feedback is shown until
//! the learner advances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionError, SessionInfo};
use crate::types::{AnswerRecord, Choice, Question, SessionLength, SessionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PracticeState {
    AwaitingAnswer,
    ShowingFeedback,
    Complete,
}

/// What the learner sees after submitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub question_id: String,
    pub selected: Choice,
    pub correct_answer: Choice,
    pub is_correct: bool,
    /// Explanation attached to the learner's choice
    pub selected_explanation: String,
    /// Why the correct answer is right
    pub correct_explanation: String,
    /// Mastery after the update
    pub mastery_after: f64,
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    info: SessionInfo,
    questions: Vec<Question>,
    current: usize,
    selected: Option<Choice>,
    state: PracticeState,
    feedback: Option<Feedback>,
    correct_count: usize,
    answered_count: usize,
}

impl PracticeSession {
    pub(crate) fn new(requested: SessionLength, questions: Vec<Question>) -> Self {
        let mut info = SessionInfo::new(SessionMode::Practice, requested, questions.len());
        let state = if questions.is_empty() {
            info.end(info.started_at);
            PracticeState::Complete
        } else {
            PracticeState::AwaitingAnswer
        };

        Self {
            info,
            questions,
            current: 0,
            selected: None,
            state,
            feedback: None,
            correct_count: 0,
            answered_count: 0,
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn state(&self) -> PracticeState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            PracticeState::Complete => None,
            _ => self.questions.get(self.current),
        }
    }

    pub fn selected(&self) -> Option<Choice> {
        self.selected
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Pick (or re-pick) a choice for the current question; locked after submit
    pub fn select_answer(&mut self, choice: Choice) -> Result<(), SessionError> {
        match self.state {
            PracticeState::AwaitingAnswer => {
                self.selected = Some(choice);
                Ok(())
            }
            PracticeState::ShowingFeedback => Err(SessionError::AnswerLocked),
            PracticeState::Complete => Err(SessionError::Complete),
        }
    }

    /// Lock the selected choice and produce the history record
    pub(crate) fn lock_answer(&mut self, at: DateTime<Utc>) -> Result<AnswerRecord, SessionError> {
        match self.state {
            PracticeState::AwaitingAnswer => {}
            PracticeState::ShowingFeedback => return Err(SessionError::AnswerLocked),
            PracticeState::Complete => return Err(SessionError::Complete),
        }

        let choice = self.selected.ok_or(SessionError::NoAnswerSelected)?;
        let question = &self.questions[self.current];
        let record = AnswerRecord::new(question, choice, at);

        self.answered_count += 1;
        if record.is_correct {
            self.correct_count += 1;
        }
        self.state = PracticeState::ShowingFeedback;

        Ok(record)
    }

    /// Build and store feedback for the locked answer
    pub(crate) fn show_feedback(&mut self, record: &AnswerRecord, mastery_after: f64) -> Feedback {
        let question = &mut self.questions[self.current];
        question.mastery = mastery_after;

        let feedback = Feedback {
            question_id: record.question_id.clone(),
            selected: record.selected_answer,
            correct_answer: question.correct_answer,
            is_correct: record.is_correct,
            selected_explanation: question.explanation(record.selected_answer).to_string(),
            correct_explanation: question.explanation(question.correct_answer).to_string(),
            mastery_after,
        };
        self.feedback = Some(feedback.clone());
        feedback
    }

    /// Move to the next question, completing the session after the last one
    pub fn advance(&mut self) -> Result<PracticeState, SessionError> {
        match self.state {
            PracticeState::AwaitingAnswer => return Err(SessionError::FeedbackPending),
            PracticeState::Complete => return Err(SessionError::Complete),
            PracticeState::ShowingFeedback => {}
        }

        self.selected = None;
        self.feedback = None;

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.state = PracticeState::AwaitingAnswer;
        } else {
            self.state = PracticeState::Complete;
            self.info.end(Utc::now());
        }

        Ok(self.state)
    }

    pub fn is_complete(&self) -> bool {
        self.state == PracticeState::Complete
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    /// Position-based progress in percent, counting the current question
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 100.0;
        }
        let position = match self.state {
            PracticeState::Complete => self.questions.len(),
            _ => self.current + 1,
        };
        position as f64 / self.questions.len() as f64 * 100.0
    }
}
