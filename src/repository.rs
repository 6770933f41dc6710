//! Persistence collaborator
//!
//! The engine talks to storage only through [`QuizRepository`]. Failures are
//! reported to the caller, which logs them and continues from in-memory state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{AnswerRecord, StarterTier};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lock error: {0}")]
    Lock(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Stored learner state: mastery overrides, answer history, starter tier
pub trait QuizRepository {
    /// Mastery overrides keyed by question id; empty when nothing is stored
    fn load_masteries(&self) -> RepositoryResult<HashMap<String, f64>>;

    fn save_mastery(&self, question_id: &str, mastery: f64) -> RepositoryResult<()>;

    fn save_masteries(&self, updates: &[(String, f64)]) -> RepositoryResult<()>;

    /// Chronological answer history
    fn load_history(&self) -> RepositoryResult<Vec<AnswerRecord>>;

    fn append_answer(&self, record: &AnswerRecord) -> RepositoryResult<()>;

    /// Raw stored tier; parsed leniently by the caller
    fn load_starter_tier(&self) -> RepositoryResult<Option<String>>;

    fn save_starter_tier(&self, tier: StarterTier) -> RepositoryResult<()>;
}

// ==================== In-memory ====================

#[derive(Debug, Default)]
struct MemoryState {
    masteries: HashMap<String, f64>,
    history: Vec<AnswerRecord>,
    starter_tier: Option<String>,
    fail_writes: bool,
}

/// In-memory repository; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored state, e.g. a returning learner
    pub fn with_state(
        masteries: HashMap<String, f64>,
        history: Vec<AnswerRecord>,
        starter_tier: Option<String>,
    ) -> Self {
        let repo = Self::new();
        if let Ok(mut state) = repo.state.lock() {
            state.masteries = masteries;
            state.history = history;
            state.starter_tier = starter_tier;
        }
        repo
    }

    /// Make every write fail with `Unavailable` (outage simulation)
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|e| RepositoryError::Lock(e.to_string()))
    }

    fn lock_for_write(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock()?;
        if state.fail_writes {
            return Err(RepositoryError::Unavailable("writes disabled".to_string()));
        }
        Ok(state)
    }
}

impl QuizRepository for InMemoryRepository {
    fn load_masteries(&self) -> RepositoryResult<HashMap<String, f64>> {
        Ok(self.lock()?.masteries.clone())
    }

    fn save_mastery(&self, question_id: &str, mastery: f64) -> RepositoryResult<()> {
        self.lock_for_write()?
            .masteries
            .insert(question_id.to_string(), mastery);
        Ok(())
    }

    fn save_masteries(&self, updates: &[(String, f64)]) -> RepositoryResult<()> {
        let mut state = self.lock_for_write()?;
        for (id, mastery) in updates {
            state.masteries.insert(id.clone(), *mastery);
        }
        Ok(())
    }

    fn load_history(&self) -> RepositoryResult<Vec<AnswerRecord>> {
        Ok(self.lock()?.history.clone())
    }

    fn append_answer(&self, record: &AnswerRecord) -> RepositoryResult<()> {
        self.lock_for_write()?.history.push(record.clone());
        Ok(())
    }

    fn load_starter_tier(&self) -> RepositoryResult<Option<String>> {
        Ok(self.lock()?.starter_tier.clone())
    }

    fn save_starter_tier(&self, tier: StarterTier) -> RepositoryResult<()> {
        self.lock_for_write()?.starter_tier = Some(tier.as_str().to_string());
        Ok(())
    }
}
