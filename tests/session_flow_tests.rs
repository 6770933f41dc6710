//! End-to-end session flows through QuizEngine

mod common;

use std::collections::HashMap;

use quizmaxx_core::{
    update_mastery, Choice, CountdownEvent, Difficulty, FullTestState, InMemoryRepository,
    PracticeState, QuizEngine, QuizRepository, SessionLength, StarterTier, WeightedSelector,
};

use common::{pool_with_masteries, question, ready_engine};

#[test]
fn test_weak_questions_dominate_selection() {
    let pool = pool_with_masteries(&[10.0, 50.0, 90.0, 100.0]);
    let mut selector = WeightedSelector::with_seed(2024);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..1000 {
        for q in selector.select(&pool, 2) {
            *counts.entry(q.id).or_default() += 1;
        }
    }

    let weak = counts.get("q0").copied().unwrap_or(0);
    let strong = counts.get("q3").copied().unwrap_or(0);
    assert!(weak > 800, "weak question selected {weak} times");
    assert!(strong >= 1, "mastered question never selected");
    assert!(strong < 500, "mastered question selected {strong} times");
}

#[test]
fn test_practice_session_runs_to_completion() {
    let repo = InMemoryRepository::new();
    let questions: Vec<_> = (0..12).map(|i| question(&format!("p{i}"), Difficulty::Medium, 40.0)).collect();
    let mut engine = ready_engine(questions, repo.clone(), 11, 60);

    let mut session = engine.start_practice(SessionLength::Ten).unwrap();
    assert_eq!(session.questions().len(), 10);

    let mut step = 0;
    while !session.is_complete() {
        let choice = if step % 2 == 0 { Choice::B } else { Choice::C };
        session.select_answer(choice).unwrap();
        let feedback = engine.submit_practice_answer(&mut session).unwrap();
        assert_eq!(feedback.is_correct, choice == Choice::B);
        assert_eq!(feedback.correct_explanation, "why B");
        session.advance().unwrap();
        step += 1;
    }

    assert_eq!(session.state(), PracticeState::Complete);
    assert_eq!(session.answered_count(), 10);
    assert_eq!(session.correct_count(), 5);
    assert_eq!(repo.load_history().unwrap().len(), 10);

    let stored = repo.load_masteries().unwrap();
    for q in session.questions() {
        assert_eq!(stored[&q.id], engine.question(&q.id).unwrap().mastery);
    }
}

#[test]
fn test_short_pool_yields_short_session() {
    let mut engine = ready_engine(pool_with_masteries(&[20.0, 30.0, 40.0]), InMemoryRepository::new(), 3, 60);
    let session = engine.start_practice(SessionLength::Hundred).unwrap();
    assert_eq!(session.questions().len(), 3);
    assert_eq!(session.info().requested, SessionLength::Hundred);
}

#[test]
fn test_hour_long_test_auto_submits_once() {
    let repo = InMemoryRepository::new();
    let mut engine = ready_engine(pool_with_masteries(&[50.0; 25]), repo.clone(), 5, 3600);

    let mut test = engine.start_full_test(SessionLength::TwentyFive).unwrap();
    // ticks before start are ignored
    assert!(engine.tick_full_test(&mut test).is_none());
    test.start().unwrap();
    test.answer(3, Choice::B).unwrap();

    let mut reports = Vec::new();
    for second in 1..=3700 {
        if let Some(report) = engine.tick_full_test(&mut test) {
            assert_eq!(second, 3600);
            reports.push(report);
        }
    }

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.timed_out);
    assert_eq!(report.correct, 1);
    assert_eq!(report.total, 25);
    assert_eq!(test.state(), FullTestState::TimedOut);
    assert_eq!(repo.load_history().unwrap().len(), 1);

    let answered = &report.rows[3];
    assert_eq!(answered.question.mastery, update_mastery(50.0, true));
    assert_eq!(report.rows[0].question.mastery, update_mastery(50.0, false));
}

#[test]
fn test_calibration_skipped_when_history_exists() {
    let earlier = question("h0", Difficulty::Easy, 10.0);
    let record = quizmaxx_core::AnswerRecord::new(&earlier, Choice::B, chrono::Utc::now());
    let repo = InMemoryRepository::with_state(HashMap::new(), vec![record], None);

    let mut engine = QuizEngine::with_selector(vec![earlier], repo, WeightedSelector::with_seed(1), 60);
    engine.choose_starter_tier(StarterTier::Beginner);

    assert_eq!(engine.question("h0").unwrap().mastery, 10.0);
}

#[test]
fn test_stored_tier_restores_without_prompt() {
    let repo = InMemoryRepository::new();
    {
        let mut first = ready_engine(pool_with_masteries(&[30.0]), repo.clone(), 1, 60);
        first.apply_answer("q0", true);
    }

    let second = QuizEngine::with_selector(pool_with_masteries(&[30.0]), repo, WeightedSelector::with_seed(1), 60);
    assert!(!second.needs_starter_tier());
    assert_eq!(second.starter_tier(), Some(StarterTier::Intermediate));
    assert_eq!(second.question("q0").unwrap().mastery, 40.0);
}

#[test]
fn test_storage_outage_does_not_break_session() {
    let repo = InMemoryRepository::new();
    let mut engine = ready_engine(pool_with_masteries(&[0.0, 0.0]), repo.clone(), 8, 60);
    repo.set_fail_writes(true);

    let mut session = engine.start_practice(SessionLength::Ten).unwrap();
    session.select_answer(Choice::B).unwrap();
    let feedback = engine.submit_practice_answer(&mut session).unwrap();

    assert_eq!(feedback.mastery_after, 10.0);
    assert_eq!(engine.question(&feedback.question_id).unwrap().mastery, 10.0);
    assert!(repo.load_history().unwrap().is_empty());
    assert_eq!(repo.load_masteries().unwrap()[&feedback.question_id], 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_task_drives_auto_submit() {
    let repo = InMemoryRepository::new();
    let mut engine = ready_engine(pool_with_masteries(&[60.0; 10]), repo, 4, 3);

    let mut test = engine.start_full_test(SessionLength::Ten).unwrap();
    test.start().unwrap();
    let mut events = test.spawn_countdown().unwrap();

    let mut report = None;
    let mut saw_expired = false;
    while let Some(event) = events.recv().await {
        if event == CountdownEvent::Expired {
            saw_expired = true;
        }
        if let Some(r) = engine.tick_full_test(&mut test) {
            report = Some(r);
        }
    }

    assert!(saw_expired);
    let report = report.expect("test should time out");
    assert!(report.timed_out);
    assert_eq!(report.correct, 0);
    assert!(!test.has_countdown_task());
}

#[tokio::test(start_paused = true)]
async fn test_manual_submit_cancels_countdown() {
    let mut engine = ready_engine(pool_with_masteries(&[60.0; 10]), InMemoryRepository::new(), 4, 5);

    let mut test = engine.start_full_test(SessionLength::Ten).unwrap();
    test.start().unwrap();
    let mut events = test.spawn_countdown().unwrap();

    assert_eq!(events.recv().await, Some(CountdownEvent::Tick { remaining_secs: 4 }));
    assert!(engine.tick_full_test(&mut test).is_none());

    test.select_answer(Choice::B).unwrap();
    let report = engine.submit_full_test(&mut test).unwrap();
    assert!(!report.timed_out);

    while let Some(event) = events.recv().await {
        assert_ne!(event, CountdownEvent::Expired);
        assert!(engine.tick_full_test(&mut test).is_none(), "unexpected report after {event:?}");
    }
    assert_eq!(test.state(), FullTestState::Submitted);
}

#[test]
fn test_first_starter_tier_is_final() {
    let repo = InMemoryRepository::new();
    let mut engine = QuizEngine::with_selector(
        vec![question("easy", Difficulty::Easy, 30.0)],
        repo.clone(),
        WeightedSelector::with_seed(1),
        60,
    );
    engine.choose_starter_tier(StarterTier::Beginner);
    engine.choose_starter_tier(StarterTier::Advanced);

    assert_eq!(engine.starter_tier(), Some(StarterTier::Beginner));
    assert_eq!(repo.load_starter_tier().unwrap().as_deref(), Some("beginner"));
    assert_eq!(engine.question("easy").unwrap().mastery, 60.0);
}
