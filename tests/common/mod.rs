#![allow(dead_code)]

use quizmaxx_core::{
    Choice, ChoiceTexts, Difficulty, InMemoryRepository, Question, QuizEngine, StarterTier, WeightedSelector,
};

pub fn question(id: &str, difficulty: Difficulty, mastery: f64) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("Prompt for {id}"),
        choices: ChoiceTexts::new("alpha", "beta", "gamma", "delta"),
        correct_answer: Choice::B,
        explanations: ChoiceTexts::new("why A", "why B", "why C", "why D"),
        topic: "Integration".to_string(),
        difficulty,
        mastery,
    }
}

pub fn pool_with_masteries(masteries: &[f64]) -> Vec<Question> {
    masteries
        .iter()
        .enumerate()
        .map(|(i, &m)| question(&format!("q{i}"), Difficulty::Medium, m))
        .collect()
}

pub fn ready_engine(
    questions: Vec<Question>,
    repo: InMemoryRepository,
    seed: u64,
    test_duration_secs: u64,
) -> QuizEngine<InMemoryRepository> {
    let mut engine = QuizEngine::with_selector(questions, repo, WeightedSelector::with_seed(seed), test_duration_secs);
    if engine.needs_starter_tier() {
        engine.choose_starter_tier(StarterTier::Intermediate);
    }
    engine
}
