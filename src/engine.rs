//! Session orchestration
//!
//! [`QuizEngine`] owns the learner's question pool and sequences:
//! starter calibration (once) -> weighted selection -> shuffle -> answers ->
//! mastery update + history append.
//!
//! Persistence goes through the injected [`QuizRepository`]. A failing
//! repository is logged and otherwise ignored; the in-memory pool stays
//! authoritative for the rest of the process.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::bank::merge_stored_mastery;
use crate::calibration::apply_starter_tier;
use crate::config::QuizConfig;
use crate::mastery::update_mastery;
use crate::repository::QuizRepository;
use crate::selector::WeightedSelector;
use crate::session::{Feedback, FullTestSession, PracticeSession, SessionError, TestReport};
use crate::types::{AnswerRecord, Question, SessionLength, StarterTier};

pub struct QuizEngine<R: QuizRepository> {
    repository: R,
    questions: Vec<Question>,
    selector: WeightedSelector,
    starter_tier: Option<StarterTier>,
    /// Stored mastery or history existed, or calibration already ran
    has_prior_state: bool,
    test_duration_secs: u64,
}

impl<R: QuizRepository> QuizEngine<R> {
    /// Load stored state for a learner over the given bank content
    pub fn new(questions: Vec<Question>, repository: R, config: &QuizConfig) -> Self {
        Self::with_selector(
            questions,
            repository,
            WeightedSelector::with_options(config.selector_options()),
            config.test_duration_secs(),
        )
    }

    pub fn with_selector(
        questions: Vec<Question>,
        repository: R,
        selector: WeightedSelector,
        test_duration_secs: u64,
    ) -> Self {
        let stored = repository.load_masteries().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load stored mastery");
            HashMap::new()
        });
        let history_len = repository
            .load_history()
            .map(|history| history.len())
            .unwrap_or_else(|err| {
                warn!(error = %err, "failed to load answer history");
                0
            });

        let starter_tier = match repository.load_starter_tier() {
            Ok(Some(raw)) => {
                let parsed = StarterTier::parse(&raw);
                if parsed.is_none() {
                    debug!(stored = %raw, "unrecognized starter tier, treating as absent");
                }
                parsed
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to load starter tier");
                None
            }
        };

        let mut engine = Self {
            questions: merge_stored_mastery(&questions, &stored),
            repository,
            selector,
            starter_tier: None,
            has_prior_state: !stored.is_empty() || history_len > 0,
            test_duration_secs,
        };

        if let Some(tier) = starter_tier {
            engine.finish_setup(tier);
        }

        engine
    }

    fn finish_setup(&mut self, tier: StarterTier) {
        if !self.has_prior_state {
            self.questions = apply_starter_tier(&self.questions, tier);
            self.has_prior_state = true;
            info!(tier = tier.as_str(), questions = self.questions.len(), "starter calibration applied");
        }
        self.starter_tier = Some(tier);

        let all: Vec<(String, f64)> = self
            .questions
            .iter()
            .map(|q| (q.id.clone(), q.mastery))
            .collect();
        if let Err(err) = self.repository.save_masteries(&all) {
            warn!(error = %err, "failed to persist initial mastery");
        }
    }

    // ==================== Accessors ====================

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn starter_tier(&self) -> Option<StarterTier> {
        self.starter_tier
    }

    pub fn needs_starter_tier(&self) -> bool {
        self.starter_tier.is_none()
    }

    pub fn test_duration_secs(&self) -> u64 {
        self.test_duration_secs
    }

    /// Stored history; empty if the repository fails
    pub fn history(&self) -> Vec<AnswerRecord> {
        self.repository.load_history().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load answer history");
            Vec::new()
        })
    }

    // ==================== Starter tier ====================

    /// Record the learner's tier. The first choice is final; later calls are ignored.
    /// Calibration runs only if no prior state exists.
    pub fn choose_starter_tier(&mut self, tier: StarterTier) {
        if let Some(current) = self.starter_tier {
            debug!(
                current = current.as_str(),
                requested = tier.as_str(),
                "starter tier already chosen, ignoring"
            );
            return;
        }
        if let Err(err) = self.repository.save_starter_tier(tier) {
            warn!(error = %err, "failed to persist starter tier");
        }
        self.finish_setup(tier);
    }

    // ==================== Mastery ====================

    /// Apply one answer to a question's mastery and persist it.
    /// Unknown ids are a no-op.
    pub fn apply_answer(&mut self, question_id: &str, is_correct: bool) -> Option<f64> {
        let Some(question) = self.questions.iter_mut().find(|q| q.id == question_id) else {
            debug!(question_id, "mastery update for unknown question ignored");
            return None;
        };

        let before = question.mastery;
        question.mastery = update_mastery(before, is_correct);
        let after = question.mastery;
        debug!(question_id, before, after, is_correct, "mastery updated");

        if let Err(err) = self.repository.save_mastery(question_id, after) {
            warn!(error = %err, question_id, "failed to persist mastery");
        }
        Some(after)
    }

    fn append_history(&self, record: &AnswerRecord) {
        if let Err(err) = self.repository.append_answer(record) {
            warn!(error = %err, question_id = %record.question_id, "failed to append answer history");
        }
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        if self.starter_tier.is_none() {
            return Err(SessionError::StarterTierRequired);
        }
        Ok(())
    }

    // ==================== Practice ====================

    pub fn start_practice(&mut self, length: SessionLength) -> Result<PracticeSession, SessionError> {
        self.ensure_ready()?;
        let selected = self.selector.select_and_shuffle(&self.questions, length.count());
        let session = PracticeSession::new(length, selected);
        info!(
            session_id = %session.info().id,
            requested = length.count(),
            selected = session.questions().len(),
            "practice session started"
        );
        Ok(session)
    }

    /// Lock the current answer, update mastery, append history, return feedback
    pub fn submit_practice_answer(&mut self, session: &mut PracticeSession) -> Result<Feedback, SessionError> {
        let record = session.lock_answer(Utc::now())?;

        let mastery_after = match self.apply_answer(&record.question_id, record.is_correct) {
            Some(mastery) => mastery,
            None => session
                .current_question()
                .map(|q| q.mastery)
                .unwrap_or_default(),
        };
        self.append_history(&record);

        Ok(session.show_feedback(&record, mastery_after))
    }

    // ==================== Full test ====================

    pub fn start_full_test(&mut self, length: SessionLength) -> Result<FullTestSession, SessionError> {
        self.ensure_ready()?;
        let selected = self.selector.select_and_shuffle(&self.questions, length.count());
        let session = FullTestSession::new(length, selected, self.test_duration_secs);
        info!(
            session_id = %session.info().id,
            requested = length.count(),
            selected = session.questions().len(),
            duration_secs = self.test_duration_secs,
            "full test prepared"
        );
        Ok(session)
    }

    /// Manual submission
    pub fn submit_full_test(&mut self, session: &mut FullTestSession) -> Result<TestReport, SessionError> {
        self.finish_full_test(session, false)
    }

    /// One second elapsed. Returns the report on the tick that times the test
    /// out, `None` otherwise (including every tick after submission).
    pub fn tick_full_test(&mut self, session: &mut FullTestSession) -> Option<TestReport> {
        if !session.tick() {
            return None;
        }
        match self.finish_full_test(session, true) {
            Ok(report) => Some(report),
            Err(err) => {
                debug!(error = %err, "auto-submit skipped");
                None
            }
        }
    }

    fn finish_full_test(&mut self, session: &mut FullTestSession, timed_out: bool) -> Result<TestReport, SessionError> {
        let submitted_at = Utc::now();
        let report = session.finish(timed_out, submitted_at)?.clone();

        let mut updates = Vec::with_capacity(report.rows.len());
        for (index, row) in report.rows.iter().enumerate() {
            match self.questions.iter_mut().find(|q| q.id == row.question.id) {
                Some(question) => {
                    question.mastery = update_mastery(question.mastery, row.is_correct);
                    updates.push((question.id.clone(), question.mastery));
                    session.set_mastery_after(index, question.mastery);
                }
                None => debug!(question_id = %row.question.id, "mastery update for unknown question ignored"),
            }
        }
        if let Err(err) = self.repository.save_masteries(&updates) {
            warn!(error = %err, count = updates.len(), "failed to persist mastery batch");
        }

        for row in &report.rows {
            if let Some(choice) = row.selected {
                self.append_history(&AnswerRecord::new(&row.question, choice, submitted_at));
            }
        }

        info!(
            session_id = %report.session_id,
            correct = report.correct,
            total = report.total,
            timed_out,
            "full test submitted"
        );

        Ok(session.report().cloned().unwrap_or(report))
    }
}
