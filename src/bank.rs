//! Question bank ingestion
//!
//! Converts the upstream bank JSON (`options` / `answer` / `explanation`) into
//! [`Question`] records and merges persisted mastery overrides by id.
//!
//! Upstream banks carry a single explanation per question; it is copied to every
//! choice. Missing values default to: topic = id prefix before the first `-`
//! (else "General"), difficulty = medium, mastery = 0, version = "1.0".

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::mastery::clamp_mastery;
use crate::types::{Choice, ChoiceTexts, Difficulty, Question};

const DEFAULT_TOPIC: &str = "General";
const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question {id}: missing option {choice}")]
    MissingOption { id: String, choice: Choice },
    #[error("question {id}: invalid answer {answer:?}")]
    InvalidAnswer { id: String, answer: String },
    #[error("duplicate question id: {0}")]
    DuplicateId(String),
}

// ==================== Raw format ====================

#[derive(Debug, Deserialize)]
struct RawBank {
    cluster: String,
    version: Option<String>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: String,
    question: String,
    #[serde(default)]
    options: HashMap<String, String>,
    answer: String,
    explanation: Option<String>,
    topic: Option<String>,
    difficulty: Option<String>,
    mastery: Option<f64>,
}

// ==================== Bank ====================

#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub cluster: String,
    pub version: String,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let raw: RawBank = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, BankError> {
        let raw: RawBank = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawBank) -> Result<Self, BankError> {
        let mut seen = std::collections::HashSet::new();
        let mut questions = Vec::with_capacity(raw.questions.len());

        for raw_question in raw.questions {
            if !seen.insert(raw_question.id.clone()) {
                return Err(BankError::DuplicateId(raw_question.id));
            }
            questions.push(convert_question(raw_question)?);
        }

        debug!(cluster = %raw.cluster, count = questions.len(), "question bank loaded");

        Ok(Self {
            cluster: raw.cluster,
            version: raw.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            questions,
        })
    }
}

fn convert_question(raw: RawQuestion) -> Result<Question, BankError> {
    let option = |choice: Choice| -> Result<String, BankError> {
        raw.options
            .get(choice.as_str())
            .cloned()
            .ok_or_else(|| BankError::MissingOption {
                id: raw.id.clone(),
                choice,
            })
    };
    let choices = ChoiceTexts::new(
        option(Choice::A)?,
        option(Choice::B)?,
        option(Choice::C)?,
        option(Choice::D)?,
    );

    let correct_answer = Choice::parse(&raw.answer).ok_or_else(|| BankError::InvalidAnswer {
        id: raw.id.clone(),
        answer: raw.answer.clone(),
    })?;

    let explanations = match raw.explanation.as_deref().filter(|text| !text.trim().is_empty()) {
        Some(text) => ChoiceTexts::uniform(text),
        None => ChoiceTexts::new(
            fallback_explanation(Choice::A),
            fallback_explanation(Choice::B),
            fallback_explanation(Choice::C),
            fallback_explanation(Choice::D),
        ),
    };

    let topic = raw
        .topic
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| topic_from_id(&raw.id));

    let difficulty = match raw.difficulty.as_deref() {
        None => Difficulty::default(),
        Some(value) => Difficulty::parse(value).unwrap_or_else(|| {
            warn!(question_id = %raw.id, difficulty = value, "unknown difficulty, using medium");
            Difficulty::default()
        }),
    };

    Ok(Question {
        id: raw.id,
        prompt: raw.question,
        choices,
        correct_answer,
        explanations,
        topic,
        difficulty,
        mastery: clamp_mastery(raw.mastery.unwrap_or(0.0)),
    })
}

fn fallback_explanation(choice: Choice) -> String {
    format!("Explanation for option {choice}")
}

fn topic_from_id(id: &str) -> String {
    match id.split('-').next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => DEFAULT_TOPIC.to_string(),
    }
}

/// Overlay stored mastery onto bank content, matching by id.
/// Content always comes from the bank; unknown stored ids are ignored.
pub fn merge_stored_mastery(questions: &[Question], stored: &HashMap<String, f64>) -> Vec<Question> {
    questions
        .iter()
        .map(|question| match stored.get(&question.id) {
            Some(&mastery) => Question {
                mastery: clamp_mastery(mastery),
                ..question.clone()
            },
            None => question.clone(),
        })
        .collect()
}
