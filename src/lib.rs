//! # quizmaxx-core - adaptive quiz core
//!
//! Decides which questions a learner sees and tracks how well each one is known:
//!
//! - **Mastery model** - per-question score in [0, 100], +10 on correct, -15 on incorrect
//! - **Starter calibration** - one-time adjustment from a self-reported tier
//! - **Weighted selection** - sampling without replacement, biased toward weak questions
//! - **Sessions** - practice with immediate feedback, timed full test with batch scoring
//!
//! ## Module layout
//!
//! - [`types`] - questions, choices, answers and shared constants
//! - [`mastery`] - update rule and selection weight bands
//! - [`calibration`] - starter tier table
//! - [`selector`] - weighted sampling (successive draws, reservoir for large pools)
//! - [`shuffle`] - Fisher-Yates
//! - [`session`] - practice / full test state machines and countdowns
//! - [`engine`] - orchestration over a [`repository::QuizRepository`]
//! - [`bank`] - question bank ingestion
//! - [`config`] / [`logging`] - environment config and tracing setup
//!
//! ## Example
//!
//! ```rust
//! use quizmaxx_core::{
//!     Choice, InMemoryRepository, QuestionBank, QuizConfig, QuizEngine, SessionLength, StarterTier,
//! };
//!
//! let bank = QuestionBank::from_json_str(r#"{
//!     "cluster": "Finance",
//!     "questions": [
//!         {"id": "FIN-1", "question": "?", "options": {"A": "a", "B": "b", "C": "c", "D": "d"}, "answer": "A"}
//!     ]
//! }"#).unwrap();
//!
//! let config = QuizConfig { seed: Some(7), ..QuizConfig::default() };
//! let mut engine = QuizEngine::new(bank.questions, InMemoryRepository::new(), &config);
//! engine.choose_starter_tier(StarterTier::Beginner);
//!
//! let mut session = engine.start_practice(SessionLength::Ten).unwrap();
//! session.select_answer(Choice::A).unwrap();
//! let feedback = engine.submit_practice_answer(&mut session).unwrap();
//! assert!(feedback.is_correct);
//! ```

#![deny(clippy::all)]

// ============================================================================
// Modules
// ============================================================================

pub mod bank;
pub mod calibration;
pub mod config;
pub mod engine;
pub mod logging;
pub mod mastery;
pub mod repository;
pub mod selector;
pub mod session;
pub mod shuffle;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use bank::{merge_stored_mastery, BankError, QuestionBank};
pub use calibration::{apply_starter_tier, calibrate_mastery};
pub use config::QuizConfig;
pub use engine::QuizEngine;
pub use logging::{init_tracing, LogSettings};
pub use mastery::{clamp_mastery, is_high_mastery, is_mastered, selection_weight, update_mastery};
pub use repository::{InMemoryRepository, QuizRepository, RepositoryError, RepositoryResult};
pub use selector::{select_questions, SelectorOptions, WeightedSelector, DEFAULT_RESERVOIR_THRESHOLD};
pub use session::{
    Countdown, CountdownEvent, CountdownState, CountdownTask, Feedback, FullTestSession, FullTestState,
    PracticeSession, PracticeState, ReviewRow, SessionError, SessionInfo, TestReport, TickOutcome,
};
pub use shuffle::{shuffle, shuffled};
pub use types::*;
