//! Starter Calibration
//!
//! One-shot transform of initial mastery based on the learner's chosen starter tier.
//! Harder tiers start lower (more early practice pressure); the beginner tier lifts
//! easy content so the first sessions focus on medium and hard questions.
//!
//! | tier         | easy             | medium          | hard          |
//! |--------------|------------------|-----------------|---------------|
//! | beginner     | max(m, 60)       | max(m - 5, 45)  | min(m, 40)    |
//! | intermediate | max(m - 5, 50)   | m               | min(m, 45)    |
//! | advanced     | min(m, 50)       | min(m, 40)      | min(m, 30)    |

use tracing::debug;

use crate::mastery::clamp_mastery;
use crate::types::{Difficulty, Question, StarterTier};

/// Calibrated mastery for a single (tier, difficulty) pair
pub fn calibrate_mastery(mastery: f64, difficulty: Difficulty, tier: StarterTier) -> f64 {
    let adjusted = match (tier, difficulty) {
        (StarterTier::Beginner, Difficulty::Easy) => mastery.max(60.0),
        (StarterTier::Beginner, Difficulty::Medium) => (mastery - 5.0).max(45.0),
        (StarterTier::Beginner, Difficulty::Hard) => mastery.min(40.0),

        (StarterTier::Intermediate, Difficulty::Easy) => (mastery - 5.0).max(50.0),
        (StarterTier::Intermediate, Difficulty::Medium) => mastery,
        (StarterTier::Intermediate, Difficulty::Hard) => mastery.min(45.0),

        (StarterTier::Advanced, Difficulty::Easy) => mastery.min(50.0),
        (StarterTier::Advanced, Difficulty::Medium) => mastery.min(40.0),
        (StarterTier::Advanced, Difficulty::Hard) => mastery.min(30.0),
    };

    clamp_mastery(adjusted)
}

/// Apply the starter tier to every question, returning the calibrated pool
pub fn apply_starter_tier(questions: &[Question], tier: StarterTier) -> Vec<Question> {
    debug!(tier = tier.as_str(), count = questions.len(), "applying starter calibration");

    questions
        .iter()
        .map(|question| Question {
            mastery: calibrate_mastery(question.mastery, question.difficulty, tier),
            ..question.clone()
        })
        .collect()
}
