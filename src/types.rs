//! Common Types and Constants
//!
//! Shared data structures used across the mastery, selection and session modules.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Points gained for a correct answer
pub const MASTERY_INCREMENT: f64 = 10.0;

/// Points lost for an incorrect answer
pub const MASTERY_DECREMENT: f64 = 15.0;

/// Lower mastery bound
pub const MIN_MASTERY: f64 = 0.0;

/// Upper mastery bound
pub const MAX_MASTERY: f64 = 100.0;

/// Questions at or above this rarely appear
pub const MASTERY_THRESHOLD_HIGH: f64 = 80.0;

/// Questions at or above this are considered mastered
pub const MASTERY_THRESHOLD_MASTERED: f64 = 90.0;

/// Default full test duration (minutes)
pub const DEFAULT_TEST_DURATION_MINUTES: u64 = 60;

// ==================== Question Types ====================

/// Choice label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Choice::A),
            "B" => Some(Choice::B),
            "C" => Some(Choice::C),
            "D" => Some(Choice::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }

    pub fn to_index(&self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-choice text, indexed by [`Choice`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ChoiceTexts {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl ChoiceTexts {
    pub fn new(a: impl Into<String>, b: impl Into<String>, c: impl Into<String>, d: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    /// Same text for every choice
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            a: text.clone(),
            b: text.clone(),
            c: text.clone(),
            d: text,
        }
    }

    pub fn get(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.a,
            Choice::B => &self.b,
            Choice::C => &self.c,
            Choice::D => &self.d,
        }
    }
}

/// Question difficulty tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse; unknown values are treated as absent
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A multiple-choice question
///
/// Everything except `mastery` is immutable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable opaque identity
    pub id: String,
    /// Prompt text
    #[serde(rename = "question")]
    pub prompt: String,
    /// Choice texts A-D
    pub choices: ChoiceTexts,
    /// The correct choice
    pub correct_answer: Choice,
    /// Explanation per choice
    pub explanations: ChoiceTexts,
    /// Topic label
    pub topic: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Mastery score [0, 100]
    pub mastery: f64,
}

impl Question {
    pub fn is_correct(&self, choice: Choice) -> bool {
        self.correct_answer == choice
    }

    pub fn explanation(&self, choice: Choice) -> &str {
        self.explanations.get(choice)
    }
}

// ==================== Learner Types ====================

/// One-time starter calibration bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarterTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl StarterTier {
    /// Lenient parse; malformed stored values are treated as absent
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(StarterTier::Beginner),
            "intermediate" => Some(StarterTier::Intermediate),
            "advanced" => Some(StarterTier::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StarterTier::Beginner => "beginner",
            StarterTier::Intermediate => "intermediate",
            StarterTier::Advanced => "advanced",
        }
    }
}

/// Immutable answer history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected_answer: Choice,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    /// Build a record for `question`, deriving correctness from its answer key.
    /// The timestamp is kept to millisecond precision.
    pub fn new(question: &Question, selected: Choice, timestamp: DateTime<Utc>) -> Self {
        Self {
            question_id: question.id.clone(),
            selected_answer: selected,
            is_correct: question.is_correct(selected),
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}

// ==================== Session Types ====================

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    Practice,
    FullTest,
}

/// Allowed session lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub enum SessionLength {
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl SessionLength {
    pub const ALL: [SessionLength; 4] = [
        SessionLength::Ten,
        SessionLength::TwentyFive,
        SessionLength::Fifty,
        SessionLength::Hundred,
    ];

    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            10 => Some(SessionLength::Ten),
            25 => Some(SessionLength::TwentyFive),
            50 => Some(SessionLength::Fifty),
            100 => Some(SessionLength::Hundred),
            _ => None,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            SessionLength::Ten => 10,
            SessionLength::TwentyFive => 25,
            SessionLength::Fifty => 50,
            SessionLength::Hundred => 100,
        }
    }
}

impl From<SessionLength> for usize {
    fn from(length: SessionLength) -> usize {
        length.count()
    }
}

impl TryFrom<usize> for SessionLength {
    type Error = String;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        SessionLength::from_count(count).ok_or_else(|| format!("unsupported session length: {count}"))
    }
}
